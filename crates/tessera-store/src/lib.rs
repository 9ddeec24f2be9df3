//! # tessera-store
//!
//! Key-partitioned table-store access for Tessera:
//! - The [`TableStore`] interface: point CRUD, filtered reads, paging, and
//!   streaming scans over entities addressed by partition key and row key
//! - [`ResilientTableStore`], a decorator that routes every point operation
//!   through the retry engine with a read or write attempt budget, and
//!   forwards streaming operations untouched
//! - [`StoreError`], the failure taxonomy the default classifier understands
//! - [`MemoryTableStore`], a deterministic in-memory backend

pub mod entity;
pub mod error;
pub mod memory;
pub mod resilient;
pub mod store;
pub mod types;

pub use entity::TableEntity;
pub use error::{StoreClassifier, StoreError, StoreResult};
pub use memory::MemoryTableStore;
pub use resilient::ResilientTableStore;
pub use store::TableStore;
pub use types::{
    AsyncPredicate, BatchOp, ChunkConsumer, ETag, EntityKey, Page, PageToken, Query, RowConsumer,
    SyncPredicate,
};
