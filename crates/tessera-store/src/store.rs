//! The table-store interface
//!
//! One trait covers the whole operation surface of a key-partitioned store:
//! point writes, point and filtered reads, and streaming scans that feed
//! caller-supplied consumers. Backends implement it directly;
//! [`ResilientTableStore`](crate::resilient::ResilientTableStore) wraps any
//! implementation with retry behavior without changing the surface.

use async_trait::async_trait;

use crate::entity::TableEntity;
use crate::error::StoreResult;
use crate::types::{
    AsyncPredicate, BatchOp, ChunkConsumer, ETag, EntityKey, Page, PageToken, Query, RowConsumer,
    SyncPredicate,
};

/// Data access over entities addressed by partition key and row key
///
/// Point operations act on one entity (or one explicit set of entities) and
/// complete before returning. Streaming operations (`for_each_chunk`,
/// `for_each_partition_chunk`, `scan_for_first`, `execute_query`,
/// `next_page`) deliver results incrementally to caller-supplied consumers;
/// resilience layers must forward them untouched, since replaying them would
/// re-deliver chunks a consumer has already processed.
#[async_trait]
pub trait TableStore<E: TableEntity>: Send + Sync {
    /// The name of the backing table
    fn table_name(&self) -> &str;

    // ------------------------------------------------------------------
    // Point writes
    // ------------------------------------------------------------------

    /// Insert a new entity; fails with a conflict if the key exists
    async fn insert(&self, entity: &E) -> StoreResult<()>;

    /// Insert the entity, or merge it into the existing one
    async fn insert_or_merge(&self, entity: &E) -> StoreResult<()>;

    /// Insert the entity, or replace the existing one
    async fn insert_or_replace(&self, entity: &E) -> StoreResult<()>;

    /// Replace an existing entity; fails if the key is absent
    async fn replace(&self, entity: &E) -> StoreResult<()>;

    /// Merge into an existing entity; fails if the key is absent
    async fn merge(&self, entity: &E) -> StoreResult<()>;

    /// Delete an existing entity; fails if the key is absent
    async fn delete(&self, partition_key: &str, row_key: &str) -> StoreResult<()>;

    /// Delete the entity if present; returns whether anything was removed
    async fn delete_if_exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool>;

    /// Insert several entities as a unit
    async fn insert_batch(&self, entities: &[E]) -> StoreResult<()>;

    /// Delete several entities as a unit; fails if any key is absent
    async fn delete_batch(&self, keys: &[EntityKey]) -> StoreResult<()>;

    /// Insert the entity unless its key exists; returns whether it was
    /// created
    async fn create_if_not_exists(&self, entity: &E) -> StoreResult<bool>;

    /// Replace the entity only while the stored version still matches `etag`
    async fn replace_if(&self, entity: &E, etag: &ETag) -> StoreResult<()>;

    /// Delete the entity only while the stored version still matches `etag`
    async fn delete_if(&self, partition_key: &str, row_key: &str, etag: &ETag) -> StoreResult<()>;

    /// Apply a batch of mutations as a unit: all take effect or none does
    async fn submit(&self, batch: &[BatchOp<E>]) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Point reads
    // ------------------------------------------------------------------

    /// Fetch one entity by its composite key
    async fn get(&self, partition_key: &str, row_key: &str) -> StoreResult<Option<E>>;

    /// Fetch every entity in a partition
    async fn get_partition(&self, partition_key: &str) -> StoreResult<Vec<E>>;

    /// Fetch the entities in a partition that satisfy `filter`
    async fn get_partition_where(
        &self,
        partition_key: &str,
        filter: SyncPredicate<'_, E>,
    ) -> StoreResult<Vec<E>>;

    /// Fetch entities by an explicit key set, optionally filtered
    ///
    /// `page_size` bounds how many keys the backend resolves per round trip;
    /// the result still contains every match.
    async fn get_many(
        &self,
        keys: &[EntityKey],
        page_size: usize,
        filter: Option<SyncPredicate<'_, E>>,
    ) -> StoreResult<Vec<E>>;

    /// Check whether an entity exists at the key
    async fn exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool>;

    /// The first `limit` entities of a partition, in backend order
    async fn top(&self, partition_key: &str, limit: usize) -> StoreResult<Vec<E>>;

    /// The first `limit` entities matching `filter`, across all partitions
    async fn top_where(&self, filter: SyncPredicate<'_, E>, limit: usize) -> StoreResult<Vec<E>>;

    /// Every entity matching `filter`
    async fn find_where(&self, filter: SyncPredicate<'_, E>) -> StoreResult<Vec<E>>;

    /// Every entity matching the asynchronous `filter`
    async fn find_where_async(&self, filter: AsyncPredicate<'_, E>) -> StoreResult<Vec<E>>;

    /// Begin paged iteration over the whole table
    ///
    /// Safe to retry: no consumer has observed anything until the first
    /// page returns.
    async fn first_page(&self, page_size: usize) -> StoreResult<Page<E>>;

    // ------------------------------------------------------------------
    // Streaming / bulk
    // ------------------------------------------------------------------

    /// Fetch the page following `token`
    async fn next_page(&self, token: &PageToken, page_size: usize) -> StoreResult<Page<E>>;

    /// Iterate the whole table, handing `consumer` one chunk at a time
    async fn for_each_chunk(
        &self,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()>;

    /// Iterate one partition, handing `consumer` one chunk at a time
    async fn for_each_partition_chunk(
        &self,
        partition_key: &str,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()>;

    /// Scan a partition and return the first entity satisfying `predicate`
    async fn scan_for_first(
        &self,
        partition_key: &str,
        predicate: SyncPredicate<'_, E>,
    ) -> StoreResult<Option<E>>;

    /// Run a raw query, yielding each row to `on_row` until it breaks or
    /// rows run out
    async fn execute_query(&self, query: &Query, on_row: RowConsumer<'_, E>) -> StoreResult<()>;

    /// Create the backing table if it does not exist; returns whether it was
    /// created
    async fn ensure_table(&self) -> StoreResult<bool>;
}
