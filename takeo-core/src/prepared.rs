use crate::{Driver, Error, Executor, Query, Result};
use std::{collections::HashMap, fmt::Display};
use tokio::sync::RwLock;

/// A backend prepared statement handle.
///
/// Cloning must be cheap and share the same server side statement.
pub trait Prepared: Clone + Send + Sync + Display {}

/// Prepared statements memoized by SQL text.
///
/// A miss is compiled with "check, lock, re-check, compile": an optimistic
/// read first, then the exclusive lock, a second lookup, and only then the
/// preparation. Concurrent first callers therefore prepare a statement once.
/// Entries are never expired individually, [`PreparedCache::clear`] drops
/// (and so closes) all of them together.
pub struct PreparedCache<D: Driver> {
    entries: RwLock<HashMap<String, D::Prepared>>,
}

impl<D: Driver> PreparedCache<D> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, sql: &str) -> Option<D::Prepared> {
        self.entries.read().await.get(sql).cloned()
    }

    pub async fn get_or_prepare<E>(&self, executor: &E, sql: &str) -> Result<D::Prepared>
    where
        E: Executor<Driver = D>,
    {
        if let Some(prepared) = self.get(sql).await {
            return Ok(prepared);
        }
        let mut entries = self.entries.write().await;
        if let Some(prepared) = entries.get(sql) {
            return Ok(prepared.clone());
        }
        log::debug!("Preparing statement: {}", sql);
        let Query::Prepared(prepared) = executor.prepare(sql.to_owned()).await? else {
            return Err(Error::msg(format!(
                "The driver `{}` did not return a prepared statement for:\n{}",
                D::NAME,
                sql
            )));
        };
        entries.insert(sql.to_owned(), prepared.clone());
        Ok(prepared)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry, returns how many were held.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let len = entries.len();
        entries.clear();
        len
    }
}

impl<D: Driver> Default for PreparedCache<D> {
    fn default() -> Self {
        Self::new()
    }
}
