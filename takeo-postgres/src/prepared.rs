use std::{
    fmt::{self, Display},
    sync::Arc,
};
use takeo_core::{Prepared, truncate_long};
use tokio_postgres::Statement;

/// A server side statement. Clones share it, it is closed when the last one is dropped.
#[derive(Clone)]
pub struct PostgresPrepared {
    pub(crate) statement: Statement,
    pub(crate) sql: Arc<str>,
}

impl PostgresPrepared {
    pub(crate) fn new(statement: Statement, sql: impl Into<Arc<str>>) -> Self {
        Self {
            statement,
            sql: sql.into(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Prepared for PostgresPrepared {}

impl Display for PostgresPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
