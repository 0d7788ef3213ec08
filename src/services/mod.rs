pub mod reset_password;

pub use reset_password::{ResetPassword, ResetPasswordError};
