use crate::{ConnectionConfig, Executor, Result, Transaction};
use std::future::Future;

/// Live handle to a relational store.
pub trait Connection: Executor + Sized {
    type Transaction: Transaction<Driver = Self::Driver>;

    /// Open a connection, failing when the store cannot be reached.
    fn connect(config: &ConnectionConfig) -> impl Future<Output = Result<Self>> + Send;

    /// Check the store is still reachable.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    /// Start a transaction scope. Statements run on the returned value belong to it.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction>> + Send;

    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
