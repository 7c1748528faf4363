//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::DbConn;
use tera::Tera;

use blogly_core::ports::{PostRepository, TagRepository, UserRepository};
use blogly_infra::{DbPostRepository, DbTagRepository, DbUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Wire repositories and templates around an open connection.
    pub fn new(db: DbConn, templates: Tera) -> Self {
        Self {
            users: Arc::new(DbUserRepository::new(db.clone())),
            posts: Arc::new(DbPostRepository::new(db.clone())),
            tags: Arc::new(DbTagRepository::new(db.clone())),
            templates: Arc::new(templates),
            db,
        }
    }

    /// Connect to the database, migrate it if configured, and load templates.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = blogly_infra::connect(&config.database)
            .await
            .context("failed to connect to database")?;

        if config.run_migrations {
            Migrator::up(&db, None)
                .await
                .context("failed to apply migrations")?;
            tracing::info!("Database migrations applied");
        }

        let templates = load_templates(&config.templates_dir)?;

        tracing::info!("Application state initialized");
        Ok(Self::new(db, templates))
    }
}

/// Load every `*.html` template below `dir`.
pub fn load_templates(dir: &str) -> anyhow::Result<Tera> {
    let tera = Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))
        .with_context(|| format!("failed to load templates from {dir}"))?;
    tracing::debug!(count = tera.get_template_names().count(), "Templates loaded");
    Ok(tera)
}
