/**
 * Server Configuration
 *
 * Loads the optional PostgreSQL pool and the media-store collaborator from
 * the environment. Configuration failures are logged and degrade the
 * server rather than preventing startup: without `DATABASE_URL` state is
 * held in memory for the lifetime of the process, and without
 * `MEDIA_UPLOAD_URL` images land in a local directory.
 */

use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::media::{HttpMediaStore, LocalMediaStore, MediaStore};

/// Database configuration result
pub type DatabaseConfig = Option<PgPool>;

/// Load and initialize the database connection pool
///
/// Reads `DATABASE_URL`, connects, and runs the embedded migrations.
/// Returns `None` (and logs why) when the database is unavailable; the
/// caller falls back to the in-memory store.
pub async fn load_database() -> DatabaseConfig {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; state will be held in memory only");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory state");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // Might already be applied by an earlier deployment
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing; database might not be up to date");
        }
    }

    Some(pool)
}

/// Build the media-store collaborator
///
/// `MEDIA_UPLOAD_URL` selects the remote blob service; otherwise images go
/// to `MEDIA_DIR` (default `./media`) and are served from
/// `MEDIA_PUBLIC_BASE` (default `/media`).
pub fn load_media_store() -> Arc<dyn MediaStore> {
    if let Ok(endpoint) = std::env::var("MEDIA_UPLOAD_URL") {
        tracing::info!(%endpoint, "using remote media store");
        return Arc::new(HttpMediaStore::new(endpoint));
    }

    let dir = std::env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".to_string());
    let public_base = std::env::var("MEDIA_PUBLIC_BASE").unwrap_or_else(|_| "/media".to_string());
    tracing::info!(%dir, "using local media store");
    Arc::new(LocalMediaStore::new(dir, public_base))
}
