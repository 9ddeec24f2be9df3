//! Entity capability trait

use crate::types::EntityKey;

/// An entity addressable within a key-partitioned store
///
/// Implementors expose the composite identity that locates them: the
/// partition key groups related entities, the row key is unique within a
/// partition. `Clone + Send + Sync` let entities cross attempt boundaries
/// and batch submissions own their inputs.
///
/// # Example
///
/// ```rust
/// use tessera_store::TableEntity;
///
/// #[derive(Clone)]
/// struct Reading {
///     sensor: String,
///     at: String,
///     value: f64,
/// }
///
/// impl TableEntity for Reading {
///     fn partition_key(&self) -> &str {
///         &self.sensor
///     }
///
///     fn row_key(&self) -> &str {
///         &self.at
///     }
/// }
/// ```
pub trait TableEntity: Clone + Send + Sync {
    /// The partition this entity belongs to
    fn partition_key(&self) -> &str;

    /// The entity's unique key within its partition
    fn row_key(&self) -> &str;

    /// The composite identity as an owned key
    fn key(&self) -> EntityKey {
        EntityKey::new(self.partition_key(), self.row_key())
    }
}
