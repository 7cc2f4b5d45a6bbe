use crate::{Prepared, SqlWriter};

/// Backend description: its prepared handle and SQL dialect.
pub trait Driver: Send + Sync + 'static {
    type Prepared: Prepared;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
