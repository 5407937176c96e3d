//! Persistence for users, tracks and likes.
//!
//! Handlers talk to an `Arc<dyn Store>`; `PgStore` backs it in production and
//! `MemoryStore` when `database.url` uses the `memory:` scheme.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use memory::MemoryStore;
pub use models::{LikeOutcome, LikedTrack, NewTrack, Track, User};
pub use postgres::PgStore;
pub use repository::{Store, TrackRepository, UserRepository};

use crate::config::Settings;
use crate::Result;

/// Opens the configured store and makes sure its schema exists.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn Store>> {
    if settings.is_in_memory() {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::new_with_options(
        &settings.database.url,
        settings.database.max_connections,
        Duration::from_secs(settings.database.acquire_timeout_secs),
    )
    .await?;
    store.ensure_schema().await?;
    info!(max_connections = settings.database.max_connections, "Connected to Postgres");

    Ok(Arc::new(store))
}
