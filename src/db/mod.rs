pub mod memory;
pub mod models;

use std::{future::Future, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tokio::time;

use crate::config::Config;

pub use self::memory::MemoryStore;
use self::models::Reading;

pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_timeout)
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "failed to connect to database {} at {}:{}",
                config.db_name, config.db_host, config.db_port
            )
        })?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Append-only persistence for readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Store one reading taken at `recorded_at` and return the stored row.
    async fn insert(&self, level: f64, recorded_at: DateTime<Utc>) -> Result<Reading>;

    /// All readings with `timestamp >= since`, oldest first.
    async fn readings_since(&self, since: DateTime<Utc>) -> Result<Vec<Reading>>;
}

/// `ReadingStore` backed by the `water_levels` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        time::timeout(self.op_timeout, fut)
            .await
            .with_context(|| format!("{op} timed out after {:?}", self.op_timeout))?
            .with_context(|| format!("{op} failed"))
    }
}

#[async_trait]
impl ReadingStore for PgStore {
    async fn insert(&self, level: f64, recorded_at: DateTime<Utc>) -> Result<Reading> {
        let query = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO water_levels (level, "timestamp")
            VALUES ($1, $2)
            RETURNING id, level, "timestamp"
            "#,
        )
        .bind(level)
        .bind(recorded_at)
        .fetch_one(&self.pool);

        self.bounded("insert reading", query).await
    }

    async fn readings_since(&self, since: DateTime<Utc>) -> Result<Vec<Reading>> {
        let query = sqlx::query_as::<_, Reading>(
            r#"
            SELECT id, level, "timestamp"
            FROM water_levels
            WHERE "timestamp" >= $1
            ORDER BY "timestamp" ASC, id ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool);

        self.bounded("query readings", query).await
    }
}
