//! Plain entity records. Persistence lives in [`crate::repositories`].

pub mod category;
pub mod series;
pub mod user;

pub use category::Category;
pub use series::Series;
pub use user::{PasswordHashError, User};
