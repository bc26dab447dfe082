//! Load-time registry of tracked asset types.
//!
//! Replaces runtime type introspection: each tracked type is registered once
//! with its type identity and the ordered list of fields whose in-session
//! values should survive a restore. The snapshot path only ever consults this
//! data, never a reflection API.

use std::collections::HashMap;

/// A persistent-object type opted into snapshot/restore
#[derive(Debug, Clone)]
pub struct TrackedType {
    type_identity: String,
    persist_fields: Vec<String>,
}

impl TrackedType {
    /// Declare a tracked type by its globally-resolvable type name
    pub fn new(type_identity: impl Into<String>) -> Self {
        Self {
            type_identity: type_identity.into(),
            persist_fields: Vec::new(),
        }
    }

    /// Mark a field whose in-session value persists across a restore
    pub fn persist_field(mut self, name: impl Into<String>) -> Self {
        self.persist_fields.push(name.into());
        self
    }

    pub fn type_identity(&self) -> &str {
        &self.type_identity
    }

    pub fn persist_fields(&self) -> &[String] {
        &self.persist_fields
    }
}

/// Registry mapping type identity to its tracked-type declaration
#[derive(Debug, Clone, Default)]
pub struct TrackedTypeRegistry {
    types: HashMap<String, TrackedType>,
}

impl TrackedTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tracked type, replacing any prior declaration for the same
    /// type identity
    pub fn register(&mut self, tracked: TrackedType) {
        self.types
            .insert(tracked.type_identity.clone(), tracked);
    }

    /// Whether the given type identity is opted into snapshot/restore
    pub fn is_tracked(&self, type_identity: &str) -> bool {
        self.types.contains_key(type_identity)
    }

    pub fn get(&self, type_identity: &str) -> Option<&TrackedType> {
        self.types.get(type_identity)
    }

    /// Persist-field names for a type, empty for unregistered types
    pub fn persist_fields(&self, type_identity: &str) -> &[String] {
        self.types
            .get(type_identity)
            .map(|tracked| tracked.persist_fields())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
