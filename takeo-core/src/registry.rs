use crate::{EntityMetadata, Error, OrmError, Result};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// Name keyed store of [`EntityMetadata`].
///
/// Metadata is installed behind an `Arc`, a lookup clones the pointer: a
/// reader holds either the previous or the new metadata, never a mix.
#[derive(Default, Debug)]
pub struct EntityRegistry {
    entities: RwLock<HashMap<String, Arc<EntityMetadata>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Install `metadata` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, metadata: EntityMetadata) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::new(OrmError::validation(
                metadata.table_name(),
                "the entity name is empty",
            )));
        }
        log::info!(
            "Registering entity `{}` on table `{}` ({} columns)",
            name,
            metadata.table_name(),
            metadata.column_order().len()
        );
        if let Some(previous) = self.entities.write().insert(name.clone(), Arc::new(metadata)) {
            log::debug!(
                "Entity `{}` replaced its previous metadata on table `{}`",
                name,
                previous.table_name()
            );
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<EntityMetadata>> {
        self.entities.read().get(name).cloned().ok_or_else(|| {
            Error::new(OrmError::UnknownEntity {
                entity: name.to_owned(),
            })
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entities.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}
