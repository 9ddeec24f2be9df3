//! Shared types for the table-store surface

use futures::future::BoxFuture;
use std::fmt;
use std::ops::ControlFlow;

/// Composite identity of one entity: partition key plus row key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    /// Groups related entities
    pub partition_key: String,
    /// Unique within the partition
    pub row_key: String,
}

impl EntityKey {
    /// Create a key from its two components
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}

/// Opaque version token for conditional writes
///
/// Produced by the backing store; a conditional write succeeds only while
/// the stored entity still carries the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ETag(String);

impl ETag {
    /// Wrap a backend-issued tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The raw tag value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque continuation token for paged iteration
///
/// Only the backend that issued a token can interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken(String);

impl PageToken {
    /// Wrap a backend-issued token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of results plus the token for the next fetch
#[derive(Debug, Clone)]
pub struct Page<E> {
    /// Entities in this page, in backend iteration order
    pub items: Vec<E>,
    /// Token for the next page; `None` when iteration is complete
    pub token: Option<PageToken>,
}

impl<E> Page<E> {
    /// True when no further pages remain
    pub fn is_last(&self) -> bool {
        self.token.is_none()
    }
}

/// Opaque raw query text, interpreted by the backend
///
/// The query language itself is a backend concern; this layer only carries
/// the text through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Wrap raw query text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw query text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One mutation inside a batch submission
///
/// A batch is applied as a unit: either every operation takes effect or
/// none does.
#[derive(Debug, Clone)]
pub enum BatchOp<E> {
    /// Insert; fails on an existing key
    Insert(E),
    /// Insert or merge into an existing entity
    InsertOrMerge(E),
    /// Insert or replace an existing entity
    InsertOrReplace(E),
    /// Replace; fails on a missing key
    Replace(E),
    /// Delete; fails on a missing key
    Delete(EntityKey),
}

/// Synchronous row filter
pub type SyncPredicate<'a, E> = &'a (dyn Fn(&E) -> bool + Send + Sync);

/// Asynchronous row filter; awaited once per candidate row
pub type AsyncPredicate<'a, E> =
    &'a (dyn for<'e> Fn(&'e E) -> BoxFuture<'e, bool> + Send + Sync);

/// Caller-supplied consumer for chunked iteration
///
/// Return `ControlFlow::Break(())` to stop the scan after the current chunk.
pub type ChunkConsumer<'a, E> = &'a mut (dyn FnMut(Vec<E>) -> ControlFlow<()> + Send);

/// Caller-supplied consumer for row-at-a-time query execution
///
/// Return `ControlFlow::Break(())` to stop after the current row.
pub type RowConsumer<'a, E> = &'a mut (dyn FnMut(E) -> ControlFlow<()> + Send);
