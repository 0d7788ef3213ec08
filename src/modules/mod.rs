pub mod accounts;
pub mod categories;
pub mod series;

use italia_authz::TokenAuthenticator;
use italia_kernel::{settings::Settings, ModuleRegistry};
use sqlx::SqlitePool;

use crate::repositories::{
    CategoryRepository, PasswordResetRepository, SeriesRepository, UserRepository,
};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool, settings: &Settings) {
    let authenticator = TokenAuthenticator::from_settings(&settings.auth);

    registry.register_custom(accounts::create_module(
        UserRepository::new(pool.clone()),
        PasswordResetRepository::new(pool.clone()),
    ));
    registry.register_custom(categories::create_module(
        CategoryRepository::new(pool.clone()),
        authenticator.clone(),
    ));
    registry.register_custom(series::create_module(
        SeriesRepository::new(pool.clone()),
        authenticator,
    ));
}
