use crate::{Entity, Result, TableSchema};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Cache of built [`TableSchema`]s, keyed by entity type.
///
/// Created alongside the facade and shared by every session spawned from it.
/// First access builds the schema; concurrent first access may build the same
/// immutable schema twice, in which case one copy wins and the other is
/// dropped. Build failures are not cached, a later resolve retries.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: Mutex<HashMap<TypeId, Arc<TableSchema>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<E: Entity>(&self) -> Result<Arc<TableSchema>> {
        let id = TypeId::of::<E>();
        if let Some(schema) = self
            .schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(schema.clone());
        }
        // Built outside the lock so a slow declaration does not serialize
        // unrelated types.
        let schema = Arc::new(E::declare()?);
        Ok(self
            .schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert(schema)
            .clone())
    }
}
