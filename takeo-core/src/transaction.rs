use crate::{Executor, Result};
use std::future::Future;

/// A transaction scope on a connection. Dropping it without committing rolls it back.
pub trait Transaction: Executor + Sized {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}
