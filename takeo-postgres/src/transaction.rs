use crate::{
    PostgresDriver,
    util::{prepare, stream_query},
};
use std::sync::Arc;
use takeo_core::{
    Error, Executor, Query, QueryResult, Result, Transaction, Value,
    future::Either,
    stream::{self, Stream},
};
use tokio::{
    runtime::Handle,
    sync::{Mutex, OwnedMutexGuard},
};
use tokio_postgres::Client;

/// A transaction owning the session until it is committed or rolled back.
///
/// When dropped unfinished a `ROLLBACK` is sent from a background task, the
/// session stays locked until it completes.
pub struct PostgresTransaction {
    client: Option<OwnedMutexGuard<Client>>,
    driver: PostgresDriver,
}

impl PostgresTransaction {
    pub(crate) async fn begin(client: Arc<Mutex<Client>>) -> Result<Self> {
        let client = client.lock_owned().await;
        client.batch_execute("BEGIN").await.map_err(|e| {
            let e = Error::new(e).context("While starting a transaction");
            log::error!("{:#}", e);
            e
        })?;
        Ok(Self {
            client: Some(client),
            driver: PostgresDriver::new(),
        })
    }

    async fn finish(mut self, sql: &'static str) -> Result<()> {
        let Some(client) = self.client.take() else {
            return Err(Error::msg("The transaction is already finished"));
        };
        client.batch_execute(sql).await.map_err(|e| {
            let e = Error::new(e).context(format!("While running `{}`", sql));
            log::error!("{:#}", e);
            e
        })
    }
}

impl Executor for PostgresTransaction {
    type Driver = PostgresDriver;

    fn driver(&self) -> &PostgresDriver {
        &self.driver
    }

    async fn prepare(&self, sql: String) -> Result<Query<PostgresDriver>> {
        let Some(client) = self.client.as_deref() else {
            return Err(Error::msg("The transaction is already finished"));
        };
        prepare(client, sql).await
    }

    fn run<'s>(
        &'s self,
        query: Query<PostgresDriver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        match self.client.as_deref() {
            Some(client) => Either::Left(stream_query(client, query, params)),
            None => Either::Right(stream::once(async {
                Err::<QueryResult, _>(Error::msg("The transaction is already finished"))
            })),
        }
    }
}

impl Transaction for PostgresTransaction {
    async fn commit(self) -> Result<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(self) -> Result<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PostgresTransaction {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = client.batch_execute("ROLLBACK").await {
                        log::error!("Could not roll back a dropped transaction: {:#}", e);
                    }
                });
            }
            Err(..) => {
                log::error!("A transaction was dropped outside of a runtime, it cannot be rolled back")
            }
        }
    }
}
