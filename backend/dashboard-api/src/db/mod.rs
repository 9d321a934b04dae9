mod memory;
mod postgres;
mod repository;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::*;

use std::ops::Deref;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

/// Handle to the configured store, cheap to clone into each service.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn Store>,
    pg: Option<PgPool>,
}

impl Database {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            return Ok(Self::in_memory());
        }

        let pg = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self {
            store: Arc::new(PgStore::new(pg.clone())),
            pg: Some(pg),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            pg: None,
        }
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let Some(pg) = &self.pg else {
            return Ok(());
        };

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(pg).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

impl Deref for Database {
    type Target = dyn Store;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
