use crate::{EntityMetadata, FromRow, Record, Result};

/// A struct mapped to a table, usually implemented by `#[derive(Entity)]`.
///
/// Its metadata is registered with [`Manager::register`](crate::Manager::register)
/// and instances flow through the manager as structured records.
pub trait Entity: Record + FromRow {
    /// Name the entity is registered under.
    fn entity_name() -> &'static str;

    fn entity_metadata() -> Result<EntityMetadata>;
}
