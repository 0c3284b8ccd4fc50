use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{models::Reading, ReadingStore};

/// In-process `ReadingStore` with the same filtering and ordering rules as
/// the Postgres store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Vec<Reading>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored reading in insertion order.
    pub async fn all(&self) -> Vec<Reading> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn insert(&self, level: f64, recorded_at: DateTime<Utc>) -> Result<Reading> {
        let mut rows = self.inner.write().await;
        let reading = Reading {
            id: rows.len() as i64 + 1,
            level,
            timestamp: recorded_at,
        };
        rows.push(reading.clone());
        Ok(reading)
    }

    async fn readings_since(&self, since: DateTime<Utc>) -> Result<Vec<Reading>> {
        let mut rows: Vec<Reading> = self
            .inner
            .read()
            .await
            .iter()
            .filter(|r| r.timestamp >= since)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.timestamp, r.id));
        Ok(rows)
    }
}
