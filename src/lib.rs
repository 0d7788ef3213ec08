//! Forum administrative back-office
//!
//! Series and category management plus the password reset workflow, packaged
//! as modules of the italia framework.

pub mod domain;
pub mod modules;
pub mod repositories;
pub mod services;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sqlx::SqlitePool;

use italia_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// A booted application: pool connected, modules initialized, migrated and
/// started.
pub struct App {
    pub settings: Settings,
    pub pool: SqlitePool,
    pub registry: ModuleRegistry,
}

impl App {
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let pool = italia_db::connect(&settings.database)
            .await
            .context("failed to open the database")?;

        let mut registry = ModuleRegistry::new();
        registry.register_core(Arc::new(italia_db::DatabaseModule::new(pool.clone())));
        modules::register_all(&mut registry, &pool, &settings);

        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };
        registry.init_all(&ctx).await?;

        let applied = italia_db::run_migrations(&pool, &registry)
            .await
            .context("failed to run migrations")?;
        tracing::info!(applied, "migrations complete");

        registry.start_all(&ctx).await?;

        Ok(Self {
            settings,
            pool,
            registry,
        })
    }

    pub fn router(&self) -> Router {
        italia_http::build_router(&self.registry, &self.settings)
    }

    /// Serve until Ctrl-C, then stop every module
    pub async fn serve(self) -> anyhow::Result<()> {
        italia_http::start_server(&self.registry, &self.settings, shutdown_signal()).await?;
        self.registry.stop_all().await
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;

    use italia_kernel::settings::Settings;
    use italia_kernel::ModuleRegistry;

    /// Fresh in-memory database carrying every module's schema
    pub async fn migrated_pool() -> SqlitePool {
        let pool = italia_db::connect_in_memory().await.unwrap();
        let mut registry = ModuleRegistry::new();
        super::modules::register_all(&mut registry, &pool, &Settings::default());
        italia_db::run_migrations(&pool, &registry).await.unwrap();
        pool
    }
}
