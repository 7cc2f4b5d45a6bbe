#![allow(dead_code)]
use std::{
    fmt::{self, Display},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use takeo_core::{
    Connection, ConnectionConfig, Driver, Executor, GenericSqlWriter, Prepared, Query,
    QueryResult, Result, RowLabeled, RowsAffected, Transaction, Value,
    stream::{self, Stream},
};

#[derive(Default, Debug, Clone, Copy)]
pub struct MockDriver;

impl Driver for MockDriver {
    type Prepared = MockPrepared;
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "mock";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

#[derive(Debug, Clone)]
pub struct MockPrepared {
    pub id: usize,
    pub sql: Arc<str>,
}

impl Display for MockPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl Prepared for MockPrepared {}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Prepare(String),
    Run { sql: String, params: Vec<Value> },
    Begin,
    Commit,
    Rollback,
    Ping,
    Disconnect,
}

type Handler = Box<dyn Fn(&str, &[Value]) -> Result<Vec<QueryResult>> + Send + Sync>;

struct Shared {
    events: Mutex<Vec<Event>>,
    handler: Handler,
    prepared: AtomicUsize,
}

/// In-process connection: records every call and answers statements through a handler.
#[derive(Clone)]
pub struct MockConnection {
    shared: Arc<Shared>,
}

impl MockConnection {
    pub fn new(
        handler: impl Fn(&str, &[Value]) -> Result<Vec<QueryResult>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                events: Mutex::new(Vec::new()),
                handler: Box::new(handler),
                prepared: AtomicUsize::new(0),
            }),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.shared.events.lock().unwrap().clear();
    }

    /// SQL text of every executed statement, in order.
    pub fn statements(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Run { sql, .. } => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn prepared_count(&self) -> usize {
        self.shared.prepared.load(Ordering::SeqCst)
    }

    fn push(&self, event: Event) {
        self.shared.events.lock().unwrap().push(event);
    }

    async fn do_prepare(&self, sql: String) -> Result<Query<MockDriver>> {
        tokio::task::yield_now().await;
        let id = self.shared.prepared.fetch_add(1, Ordering::SeqCst);
        self.push(Event::Prepare(sql.clone()));
        Ok(Query::Prepared(MockPrepared {
            id,
            sql: sql.into(),
        }))
    }

    fn do_run(
        &self,
        query: Query<MockDriver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 'static {
        let sql = match query {
            Query::Raw(sql) => sql,
            Query::Prepared(prepared) => prepared.sql.to_string(),
        };
        let results = (self.shared.handler)(&sql, &params);
        self.push(Event::Run { sql, params });
        let items: Vec<Result<QueryResult>> = match results {
            Ok(results) => results.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(items)
    }
}

impl Executor for MockConnection {
    type Driver = MockDriver;

    fn driver(&self) -> &MockDriver {
        &MockDriver
    }

    async fn prepare(&self, sql: String) -> Result<Query<MockDriver>> {
        self.do_prepare(sql).await
    }

    fn run<'s>(
        &'s self,
        query: Query<MockDriver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        self.do_run(query, params)
    }
}

impl Connection for MockConnection {
    type Transaction = MockTransaction;

    async fn connect(_config: &ConnectionConfig) -> Result<Self> {
        Ok(MockConnection::new(|_, _| Ok(Vec::new())))
    }

    async fn ping(&self) -> Result<()> {
        self.push(Event::Ping);
        Ok(())
    }

    async fn begin(&self) -> Result<MockTransaction> {
        self.push(Event::Begin);
        Ok(MockTransaction {
            connection: self.clone(),
            finished: false,
        })
    }

    async fn disconnect(self) -> Result<()> {
        self.push(Event::Disconnect);
        Ok(())
    }
}

pub struct MockTransaction {
    connection: MockConnection,
    finished: bool,
}

impl Executor for MockTransaction {
    type Driver = MockDriver;

    fn driver(&self) -> &MockDriver {
        &MockDriver
    }

    async fn prepare(&self, sql: String) -> Result<Query<MockDriver>> {
        self.connection.do_prepare(sql).await
    }

    fn run<'s>(
        &'s self,
        query: Query<MockDriver>,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send + 's {
        self.connection.do_run(query, params)
    }
}

impl Transaction for MockTransaction {
    async fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.connection.push(Event::Commit);
        Ok(())
    }

    async fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.connection.push(Event::Rollback);
        Ok(())
    }
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.connection.push(Event::Rollback);
        }
    }
}

pub fn row(labels: &[&str], values: Vec<Value>) -> QueryResult {
    RowLabeled::new(
        labels.iter().map(|v| v.to_string()).collect(),
        values.into_boxed_slice(),
    )
    .into()
}

pub fn affected(rows_affected: u64) -> QueryResult {
    RowsAffected {
        rows_affected,
    }
    .into()
}

pub fn init_logs() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Warn)
        .try_init();
}
