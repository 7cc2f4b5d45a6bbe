mod connection;
mod driver;
mod prepared;
mod sql_writer;
mod transaction;
mod util;
mod value_holder;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub use sql_writer::*;
pub use transaction::*;
pub use value_holder::postgres_type_to_value;

/// A [`takeo_core::Manager`] over a Postgres connection.
pub type PostgresManager = takeo_core::Manager<PostgresConnection>;
