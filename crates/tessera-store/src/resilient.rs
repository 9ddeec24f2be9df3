//! Resilient decorator over any [`TableStore`]
//!
//! `ResilientTableStore` presents the identical operation surface as the
//! store it wraps, routing every point operation through the retry engine
//! with the attempt budget of its category: reads use the read budget,
//! writes the write budget. Streaming operations are forwarded verbatim —
//! a retry at this level could re-invoke a caller-supplied consumer with
//! chunks it has already processed.
//!
//! The decorator holds no per-call state; concurrent calls through one
//! instance are independent.
//!
//! # Example
//!
//! ```rust,no_run
//! use tessera_core::RetryOptions;
//! use tessera_store::{MemoryTableStore, ResilientTableStore, TableEntity, TableStore};
//!
//! # #[derive(Clone)]
//! # struct Reading { sensor: String, at: String }
//! # impl TableEntity for Reading {
//! #     fn partition_key(&self) -> &str { &self.sensor }
//! #     fn row_key(&self) -> &str { &self.at }
//! # }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RetryOptions {
//!     write_attempts: 5,
//!     read_attempts: 3,
//!     delay_ms: 100,
//! };
//! let store: ResilientTableStore<Reading, MemoryTableStore<Reading>> =
//!     ResilientTableStore::with_options(MemoryTableStore::new("readings"), &options)?;
//!
//! let reading = Reading { sensor: "s1".into(), at: "t0".into() };
//! store.insert(&reading).await?;
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use async_trait::async_trait;

use tessera_core::retry::{ErrorClassifier, RetryEngine, TracingObserver};
use tessera_core::{ConfigError, RetryOptions, RetryPolicy};

use crate::entity::TableEntity;
use crate::error::{StoreClassifier, StoreError, StoreResult};
use crate::store::TableStore;
use crate::types::{
    AsyncPredicate, BatchOp, ChunkConsumer, ETag, EntityKey, Page, PageToken, Query, RowConsumer,
    SyncPredicate,
};

/// A [`TableStore`] that absorbs transient backend failures
///
/// Owns the wrapped store, the read/write [`RetryPolicy`] pair, and one
/// [`RetryEngine`]; all are read-only after construction.
pub struct ResilientTableStore<E, S, C = StoreClassifier> {
    inner: S,
    engine: RetryEngine<C, TracingObserver>,
    read: RetryPolicy,
    write: RetryPolicy,
    _entity: PhantomData<E>,
}

impl<E, S> ResilientTableStore<E, S, StoreClassifier> {
    /// Wrap `inner` with the default budgets (10 attempts per category,
    /// 200ms between attempts) and the default classifier
    pub fn new(inner: S) -> Self {
        let options = RetryOptions::default();
        Self {
            inner,
            engine: RetryEngine::new(StoreClassifier)
                .with_observer(TracingObserver::new("table-store")),
            read: options.read_policy(),
            write: options.write_policy(),
            _entity: PhantomData,
        }
    }

    /// Wrap `inner` with explicit budgets and the default classifier
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either attempt budget is zero. The error
    /// is raised here, before any operation can execute.
    pub fn with_options(inner: S, options: &RetryOptions) -> Result<Self, ConfigError> {
        Self::with_classifier(inner, options, StoreClassifier)
    }
}

impl<E, S, C> ResilientTableStore<E, S, C> {
    /// Wrap `inner` with explicit budgets and a custom classifier
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either attempt budget is zero.
    pub fn with_classifier(
        inner: S,
        options: &RetryOptions,
        classifier: C,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            inner,
            engine: RetryEngine::new(classifier)
                .with_observer(TracingObserver::new("table-store")),
            read: options.read_policy(),
            write: options.write_policy(),
            _entity: PhantomData,
        })
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap, discarding the retry layer
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// The policy applied to read-category operations
    pub fn read_policy(&self) -> &RetryPolicy {
        &self.read
    }

    /// The policy applied to write-category operations
    pub fn write_policy(&self) -> &RetryPolicy {
        &self.write
    }
}

#[async_trait]
impl<E, S, C> TableStore<E> for ResilientTableStore<E, S, C>
where
    E: TableEntity + 'static,
    S: TableStore<E>,
    C: ErrorClassifier<StoreError>,
{
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    // -- writes: retried under the write budget ------------------------

    async fn insert(&self, entity: &E) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.insert(entity))
            .await
    }

    async fn insert_or_merge(&self, entity: &E) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.insert_or_merge(entity))
            .await
    }

    async fn insert_or_replace(&self, entity: &E) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.insert_or_replace(entity))
            .await
    }

    async fn replace(&self, entity: &E) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.replace(entity))
            .await
    }

    async fn merge(&self, entity: &E) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.merge(entity))
            .await
    }

    async fn delete(&self, partition_key: &str, row_key: &str) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.delete(partition_key, row_key))
            .await
    }

    async fn delete_if_exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool> {
        self.engine
            .execute_async(&self.write, || {
                self.inner.delete_if_exists(partition_key, row_key)
            })
            .await
    }

    async fn insert_batch(&self, entities: &[E]) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.insert_batch(entities))
            .await
    }

    async fn delete_batch(&self, keys: &[EntityKey]) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.delete_batch(keys))
            .await
    }

    async fn create_if_not_exists(&self, entity: &E) -> StoreResult<bool> {
        self.engine
            .execute_async(&self.write, || self.inner.create_if_not_exists(entity))
            .await
    }

    async fn replace_if(&self, entity: &E, etag: &ETag) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.replace_if(entity, etag))
            .await
    }

    async fn delete_if(&self, partition_key: &str, row_key: &str, etag: &ETag) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || {
                self.inner.delete_if(partition_key, row_key, etag)
            })
            .await
    }

    async fn submit(&self, batch: &[BatchOp<E>]) -> StoreResult<()> {
        self.engine
            .execute_async(&self.write, || self.inner.submit(batch))
            .await
    }

    // -- reads: retried under the read budget --------------------------

    async fn get(&self, partition_key: &str, row_key: &str) -> StoreResult<Option<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.get(partition_key, row_key))
            .await
    }

    async fn get_partition(&self, partition_key: &str) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.get_partition(partition_key))
            .await
    }

    async fn get_partition_where(
        &self,
        partition_key: &str,
        filter: SyncPredicate<'_, E>,
    ) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || {
                self.inner.get_partition_where(partition_key, filter)
            })
            .await
    }

    async fn get_many(
        &self,
        keys: &[EntityKey],
        page_size: usize,
        filter: Option<SyncPredicate<'_, E>>,
    ) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.get_many(keys, page_size, filter))
            .await
    }

    async fn exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool> {
        self.engine
            .execute_async(&self.read, || self.inner.exists(partition_key, row_key))
            .await
    }

    async fn top(&self, partition_key: &str, limit: usize) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.top(partition_key, limit))
            .await
    }

    async fn top_where(&self, filter: SyncPredicate<'_, E>, limit: usize) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.top_where(filter, limit))
            .await
    }

    async fn find_where(&self, filter: SyncPredicate<'_, E>) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.find_where(filter))
            .await
    }

    async fn find_where_async(&self, filter: AsyncPredicate<'_, E>) -> StoreResult<Vec<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.find_where_async(filter))
            .await
    }

    async fn first_page(&self, page_size: usize) -> StoreResult<Page<E>> {
        self.engine
            .execute_async(&self.read, || self.inner.first_page(page_size))
            .await
    }

    // -- streaming: forwarded verbatim, no retry -----------------------
    // Replaying any of these could re-invoke a caller-supplied consumer
    // with data it has already processed.

    async fn next_page(&self, token: &PageToken, page_size: usize) -> StoreResult<Page<E>> {
        self.inner.next_page(token, page_size).await
    }

    async fn for_each_chunk(
        &self,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()> {
        self.inner.for_each_chunk(chunk_size, consumer).await
    }

    async fn for_each_partition_chunk(
        &self,
        partition_key: &str,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()> {
        self.inner
            .for_each_partition_chunk(partition_key, chunk_size, consumer)
            .await
    }

    async fn scan_for_first(
        &self,
        partition_key: &str,
        predicate: SyncPredicate<'_, E>,
    ) -> StoreResult<Option<E>> {
        self.inner.scan_for_first(partition_key, predicate).await
    }

    async fn execute_query(&self, query: &Query, on_row: RowConsumer<'_, E>) -> StoreResult<()> {
        self.inner.execute_query(query, on_row).await
    }

    async fn ensure_table(&self) -> StoreResult<bool> {
        self.inner.ensure_table().await
    }
}
