use crate::{
    Driver, Query, QueryResult, Result, RowLabeled, RowsAffected, Value,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::{future::Future, pin::pin};

/// Anything able to run statements: a connection or a transaction.
///
/// Methods take `&self`, implementations synchronize internally so that many
/// callers can share one executor.
pub trait Executor: Send + Sync {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Prepare `sql` on the backend.
    fn prepare(&self, sql: String) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// General method to send any query and return any result type (either row or count).
    fn run<'s>(
        &'s self,
        query: Query<Self::Driver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's;

    /// Execute the query and return the rows.
    fn fetch<'s>(
        &'s self,
        query: Query<Self::Driver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + 's {
        self.run(query, params).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the first row, if any.
    fn fetch_one(
        &self,
        query: Query<Self::Driver>,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Option<RowLabeled>>> + Send {
        async move {
            let mut stream = pin!(self.fetch(query, params));
            stream.next().await.transpose()
        }
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(
        &self,
        query: Query<Self::Driver>,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query, params)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}
