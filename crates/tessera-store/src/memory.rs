//! In-memory table-store backend
//!
//! A deterministic, dependency-free [`TableStore`] implementation over an
//! ordered map, used by this repository's own tests and by embedders who
//! want to exercise the resilient decorator without a remote store.
//!
//! Semantics notes:
//! - Merge is whole-entity overwrite; the backend has no column model.
//! - `execute_query` does not interpret the query text; it yields every row.
//! - Paging is ordered by (partition key, row key) with an opaque token
//!   encoding the last key served.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::entity::TableEntity;
use crate::error::{StoreError, StoreResult};
use crate::store::TableStore;
use crate::types::{
    AsyncPredicate, BatchOp, ChunkConsumer, ETag, EntityKey, Page, PageToken, Query, RowConsumer,
    SyncPredicate,
};

type Key = (String, String);

/// Separator between partition key and row key inside a page token
const TOKEN_SEP: char = '\u{1f}';

#[derive(Clone)]
struct Versioned<E> {
    entity: E,
    version: u64,
}

/// An in-memory [`TableStore`] over `RwLock<BTreeMap<..>>`
pub struct MemoryTableStore<E> {
    name: String,
    rows: RwLock<BTreeMap<Key, Versioned<E>>>,
    table_created: AtomicBool,
    next_version: AtomicU64,
}

impl<E: TableEntity> MemoryTableStore<E> {
    /// Create an empty store backing the named table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: RwLock::new(BTreeMap::new()),
            table_created: AtomicBool::new(false),
            next_version: AtomicU64::new(1),
        }
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.read_rows().len()
    }

    /// True when the store holds no entities
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The current version tag of the entity at the key, if present
    pub fn etag_of(&self, partition_key: &str, row_key: &str) -> Option<ETag> {
        self.read_rows()
            .get(&key_of(partition_key, row_key))
            .map(|stored| ETag::new(stored.version.to_string()))
    }

    fn read_rows(&self) -> RwLockReadGuard<'_, BTreeMap<Key, Versioned<E>>> {
        self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_rows(&self) -> RwLockWriteGuard<'_, BTreeMap<Key, Versioned<E>>> {
        self.rows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bump_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst)
    }

    fn versioned(&self, entity: &E) -> Versioned<E> {
        Versioned {
            entity: entity.clone(),
            version: self.bump_version(),
        }
    }

    /// Apply one batch operation to a staged copy of the map
    fn apply(&self, staged: &mut BTreeMap<Key, Versioned<E>>, op: &BatchOp<E>) -> StoreResult<()> {
        match op {
            BatchOp::Insert(entity) => {
                let key = entity.key();
                if staged.contains_key(&key_from(&key)) {
                    return Err(StoreError::conflict(&key.partition_key, &key.row_key));
                }
                staged.insert(key_from(&key), self.versioned(entity));
            }
            BatchOp::InsertOrMerge(entity) | BatchOp::InsertOrReplace(entity) => {
                staged.insert(key_from(&entity.key()), self.versioned(entity));
            }
            BatchOp::Replace(entity) => {
                let key = entity.key();
                if !staged.contains_key(&key_from(&key)) {
                    return Err(StoreError::not_found(&key.partition_key, &key.row_key));
                }
                staged.insert(key_from(&key), self.versioned(entity));
            }
            BatchOp::Delete(key) => {
                if staged.remove(&key_from(key)).is_none() {
                    return Err(StoreError::not_found(&key.partition_key, &key.row_key));
                }
            }
        }
        Ok(())
    }

    /// Ordered snapshot of every entity
    fn snapshot(&self) -> Vec<E> {
        self.read_rows()
            .values()
            .map(|stored| stored.entity.clone())
            .collect()
    }

    /// Ordered snapshot of one partition
    fn snapshot_partition(&self, partition_key: &str) -> Vec<E> {
        self.read_rows()
            .range(partition_range(partition_key))
            .map(|(_, stored)| stored.entity.clone())
            .collect()
    }

    fn page_after(&self, after: Option<Key>, page_size: usize) -> StoreResult<Page<E>> {
        if page_size == 0 {
            return Err(StoreError::bad_request("page size must be at least 1"));
        }

        let rows = self.read_rows();
        let mut iter: Box<dyn Iterator<Item = (&Key, &Versioned<E>)> + '_> = match after {
            Some(key) => Box::new(rows.range((Bound::Excluded(key), Bound::Unbounded))),
            None => Box::new(rows.iter()),
        };

        let mut items = Vec::with_capacity(page_size);
        let mut last_key: Option<Key> = None;
        for (key, stored) in iter.by_ref().take(page_size) {
            items.push(stored.entity.clone());
            last_key = Some(key.clone());
        }

        let token = match (iter.next().is_some(), last_key) {
            (true, Some(key)) => Some(encode_token(&key)),
            _ => None,
        };

        Ok(Page { items, token })
    }
}

fn key_of(partition_key: &str, row_key: &str) -> Key {
    (partition_key.to_string(), row_key.to_string())
}

fn key_from(key: &EntityKey) -> Key {
    (key.partition_key.clone(), key.row_key.clone())
}

fn partition_range(partition_key: &str) -> (Bound<Key>, Bound<Key>) {
    let low = (partition_key.to_string(), String::new());
    let high = (format!("{partition_key}\u{0}"), String::new());
    (Bound::Included(low), Bound::Excluded(high))
}

fn encode_token(key: &Key) -> PageToken {
    PageToken::new(format!("{}{TOKEN_SEP}{}", key.0, key.1))
}

fn decode_token(token: &PageToken) -> StoreResult<Key> {
    token
        .as_str()
        .split_once(TOKEN_SEP)
        .map(|(partition, row)| (partition.to_string(), row.to_string()))
        .ok_or_else(|| StoreError::bad_request("malformed continuation token"))
}

#[async_trait]
impl<E: TableEntity + 'static> TableStore<E> for MemoryTableStore<E> {
    fn table_name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, entity: &E) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let key = key_of(entity.partition_key(), entity.row_key());
        if rows.contains_key(&key) {
            return Err(StoreError::conflict(entity.partition_key(), entity.row_key()));
        }
        rows.insert(key, self.versioned(entity));
        Ok(())
    }

    async fn insert_or_merge(&self, entity: &E) -> StoreResult<()> {
        let mut rows = self.write_rows();
        rows.insert(
            key_of(entity.partition_key(), entity.row_key()),
            self.versioned(entity),
        );
        Ok(())
    }

    async fn insert_or_replace(&self, entity: &E) -> StoreResult<()> {
        let mut rows = self.write_rows();
        rows.insert(
            key_of(entity.partition_key(), entity.row_key()),
            self.versioned(entity),
        );
        Ok(())
    }

    async fn replace(&self, entity: &E) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let key = key_of(entity.partition_key(), entity.row_key());
        if !rows.contains_key(&key) {
            return Err(StoreError::not_found(entity.partition_key(), entity.row_key()));
        }
        rows.insert(key, self.versioned(entity));
        Ok(())
    }

    async fn merge(&self, entity: &E) -> StoreResult<()> {
        // No column model: merge and replace coincide
        self.replace(entity).await
    }

    async fn delete(&self, partition_key: &str, row_key: &str) -> StoreResult<()> {
        let mut rows = self.write_rows();
        match rows.remove(&key_of(partition_key, row_key)) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(partition_key, row_key)),
        }
    }

    async fn delete_if_exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool> {
        let mut rows = self.write_rows();
        Ok(rows.remove(&key_of(partition_key, row_key)).is_some())
    }

    async fn insert_batch(&self, entities: &[E]) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let mut staged = rows.clone();
        for entity in entities {
            self.apply(&mut staged, &BatchOp::Insert(entity.clone()))?;
        }
        *rows = staged;
        Ok(())
    }

    async fn delete_batch(&self, keys: &[EntityKey]) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let mut staged = rows.clone();
        for key in keys {
            self.apply(&mut staged, &BatchOp::Delete(key.clone()))?;
        }
        *rows = staged;
        Ok(())
    }

    async fn create_if_not_exists(&self, entity: &E) -> StoreResult<bool> {
        let mut rows = self.write_rows();
        let key = key_of(entity.partition_key(), entity.row_key());
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(key, self.versioned(entity));
        Ok(true)
    }

    async fn replace_if(&self, entity: &E, etag: &ETag) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let key = key_of(entity.partition_key(), entity.row_key());
        match rows.get(&key) {
            None => Err(StoreError::not_found(entity.partition_key(), entity.row_key())),
            Some(stored) if stored.version.to_string() != etag.as_str() => Err(
                StoreError::precondition_failed(entity.partition_key(), entity.row_key()),
            ),
            Some(_) => {
                rows.insert(key, self.versioned(entity));
                Ok(())
            }
        }
    }

    async fn delete_if(&self, partition_key: &str, row_key: &str, etag: &ETag) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let key = key_of(partition_key, row_key);
        match rows.get(&key) {
            None => Err(StoreError::not_found(partition_key, row_key)),
            Some(stored) if stored.version.to_string() != etag.as_str() => {
                Err(StoreError::precondition_failed(partition_key, row_key))
            }
            Some(_) => {
                rows.remove(&key);
                Ok(())
            }
        }
    }

    async fn submit(&self, batch: &[BatchOp<E>]) -> StoreResult<()> {
        let mut rows = self.write_rows();
        let mut staged = rows.clone();
        for op in batch {
            self.apply(&mut staged, op)?;
        }
        *rows = staged;
        Ok(())
    }

    async fn get(&self, partition_key: &str, row_key: &str) -> StoreResult<Option<E>> {
        Ok(self
            .read_rows()
            .get(&key_of(partition_key, row_key))
            .map(|stored| stored.entity.clone()))
    }

    async fn get_partition(&self, partition_key: &str) -> StoreResult<Vec<E>> {
        Ok(self.snapshot_partition(partition_key))
    }

    async fn get_partition_where(
        &self,
        partition_key: &str,
        filter: SyncPredicate<'_, E>,
    ) -> StoreResult<Vec<E>> {
        Ok(self
            .snapshot_partition(partition_key)
            .into_iter()
            .filter(|entity| filter(entity))
            .collect())
    }

    async fn get_many(
        &self,
        keys: &[EntityKey],
        page_size: usize,
        filter: Option<SyncPredicate<'_, E>>,
    ) -> StoreResult<Vec<E>> {
        if page_size == 0 {
            return Err(StoreError::bad_request("page size must be at least 1"));
        }

        let mut out = Vec::new();
        // Resolve keys in page-size batches, as a remote backend would per
        // round trip
        for batch in keys.chunks(page_size) {
            let rows = self.read_rows();
            for key in batch {
                if let Some(stored) = rows.get(&key_from(key)) {
                    if filter.map_or(true, |keep| keep(&stored.entity)) {
                        out.push(stored.entity.clone());
                    }
                }
            }
        }
        Ok(out)
    }

    async fn exists(&self, partition_key: &str, row_key: &str) -> StoreResult<bool> {
        Ok(self.read_rows().contains_key(&key_of(partition_key, row_key)))
    }

    async fn top(&self, partition_key: &str, limit: usize) -> StoreResult<Vec<E>> {
        let mut items = self.snapshot_partition(partition_key);
        items.truncate(limit);
        Ok(items)
    }

    async fn top_where(&self, filter: SyncPredicate<'_, E>, limit: usize) -> StoreResult<Vec<E>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|entity| filter(entity))
            .take(limit)
            .collect())
    }

    async fn find_where(&self, filter: SyncPredicate<'_, E>) -> StoreResult<Vec<E>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|entity| filter(entity))
            .collect())
    }

    async fn find_where_async(&self, filter: AsyncPredicate<'_, E>) -> StoreResult<Vec<E>> {
        // Snapshot first so no lock is held across the predicate's await
        let mut out = Vec::new();
        for entity in self.snapshot() {
            if filter(&entity).await {
                out.push(entity);
            }
        }
        Ok(out)
    }

    async fn first_page(&self, page_size: usize) -> StoreResult<Page<E>> {
        self.page_after(None, page_size)
    }

    async fn next_page(&self, token: &PageToken, page_size: usize) -> StoreResult<Page<E>> {
        let after = decode_token(token)?;
        self.page_after(Some(after), page_size)
    }

    async fn for_each_chunk(
        &self,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()> {
        if chunk_size == 0 {
            return Err(StoreError::bad_request("chunk size must be at least 1"));
        }
        for chunk in self.snapshot().chunks(chunk_size) {
            if consumer(chunk.to_vec()).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn for_each_partition_chunk(
        &self,
        partition_key: &str,
        chunk_size: usize,
        consumer: ChunkConsumer<'_, E>,
    ) -> StoreResult<()> {
        if chunk_size == 0 {
            return Err(StoreError::bad_request("chunk size must be at least 1"));
        }
        for chunk in self.snapshot_partition(partition_key).chunks(chunk_size) {
            if consumer(chunk.to_vec()).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn scan_for_first(
        &self,
        partition_key: &str,
        predicate: SyncPredicate<'_, E>,
    ) -> StoreResult<Option<E>> {
        Ok(self
            .snapshot_partition(partition_key)
            .into_iter()
            .find(|entity| predicate(entity)))
    }

    async fn execute_query(&self, _query: &Query, on_row: RowConsumer<'_, E>) -> StoreResult<()> {
        for entity in self.snapshot() {
            if let ControlFlow::Break(()) = on_row(entity) {
                break;
            }
        }
        Ok(())
    }

    async fn ensure_table(&self) -> StoreResult<bool> {
        Ok(!self.table_created.swap(true, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        partition: String,
        row: String,
        value: i64,
    }

    impl Row {
        fn new(partition: &str, row: &str, value: i64) -> Self {
            Self {
                partition: partition.into(),
                row: row.into(),
                value,
            }
        }
    }

    impl TableEntity for Row {
        fn partition_key(&self) -> &str {
            &self.partition
        }

        fn row_key(&self) -> &str {
            &self.row
        }
    }

    fn seeded() -> MemoryTableStore<Row> {
        let store = MemoryTableStore::new("rows");
        {
            let mut rows = store.write_rows();
            for (p, r, v) in [
                ("p1", "a", 1),
                ("p1", "b", 2),
                ("p1", "c", 3),
                ("p2", "a", 10),
                ("p2", "b", 20),
            ] {
                rows.insert(key_of(p, r), Versioned {
                    entity: Row::new(p, r, v),
                    version: store.bump_version(),
                });
            }
        }
        store
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = MemoryTableStore::new("rows");
        let row = Row::new("p1", "a", 7);

        store.insert(&row).await.unwrap();
        assert_eq!(store.get("p1", "a").await.unwrap(), Some(row));
        assert_eq!(store.get("p1", "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_conflicts_on_existing_key() {
        let store = MemoryTableStore::new("rows");
        let row = Row::new("p1", "a", 7);

        store.insert(&row).await.unwrap();
        let err = store.insert(&row).await.unwrap_err();
        assert_eq!(err, StoreError::conflict("p1", "a"));
    }

    #[tokio::test]
    async fn replace_and_merge_require_presence() {
        let store = MemoryTableStore::new("rows");
        let row = Row::new("p1", "a", 7);

        assert_eq!(
            store.replace(&row).await.unwrap_err(),
            StoreError::not_found("p1", "a")
        );
        assert_eq!(
            store.merge(&row).await.unwrap_err(),
            StoreError::not_found("p1", "a")
        );

        store.insert(&row).await.unwrap();
        let updated = Row::new("p1", "a", 8);
        store.replace(&updated).await.unwrap();
        assert_eq!(store.get("p1", "a").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_variants() {
        let store = seeded();

        store.delete("p1", "a").await.unwrap();
        assert_eq!(
            store.delete("p1", "a").await.unwrap_err(),
            StoreError::not_found("p1", "a")
        );

        assert!(store.delete_if_exists("p1", "b").await.unwrap());
        assert!(!store.delete_if_exists("p1", "b").await.unwrap());
    }

    #[tokio::test]
    async fn conditional_writes_check_the_version() {
        let store = MemoryTableStore::new("rows");
        store.insert(&Row::new("p1", "a", 1)).await.unwrap();

        let etag = store.etag_of("p1", "a").unwrap();
        store.replace_if(&Row::new("p1", "a", 2), &etag).await.unwrap();

        // The stored version moved on; the old tag no longer matches
        assert_eq!(
            store
                .replace_if(&Row::new("p1", "a", 3), &etag)
                .await
                .unwrap_err(),
            StoreError::precondition_failed("p1", "a")
        );
        assert_eq!(
            store.delete_if("p1", "a", &etag).await.unwrap_err(),
            StoreError::precondition_failed("p1", "a")
        );

        let fresh = store.etag_of("p1", "a").unwrap();
        store.delete_if("p1", "a", &fresh).await.unwrap();
        assert_eq!(store.get("p1", "a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_if_not_exists_reports_outcome() {
        let store = MemoryTableStore::new("rows");
        assert!(store.create_if_not_exists(&Row::new("p1", "a", 1)).await.unwrap());
        assert!(!store.create_if_not_exists(&Row::new("p1", "a", 2)).await.unwrap());
        assert_eq!(
            store.get("p1", "a").await.unwrap().map(|r| r.value),
            Some(1)
        );
    }

    #[tokio::test]
    async fn batches_are_all_or_nothing() {
        let store = seeded();
        let before = store.len();

        // The second op conflicts, so the first must not take effect
        let err = store
            .submit(&[
                BatchOp::Insert(Row::new("p3", "x", 1)),
                BatchOp::Insert(Row::new("p1", "a", 99)),
            ])
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::conflict("p1", "a"));
        assert_eq!(store.len(), before);
        assert_eq!(store.get("p3", "x").await.unwrap(), None);

        store
            .submit(&[
                BatchOp::Insert(Row::new("p3", "x", 1)),
                BatchOp::Replace(Row::new("p1", "a", 99)),
                BatchOp::Delete(EntityKey::new("p2", "b")),
            ])
            .await
            .unwrap();
        assert_eq!(store.get("p3", "x").await.unwrap().map(|r| r.value), Some(1));
        assert_eq!(store.get("p1", "a").await.unwrap().map(|r| r.value), Some(99));
        assert_eq!(store.get("p2", "b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_batch_rejects_missing_keys_atomically() {
        let store = seeded();
        let before = store.len();

        let err = store
            .delete_batch(&[EntityKey::new("p1", "a"), EntityKey::new("p9", "zz")])
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found("p9", "zz"));
        assert_eq!(store.len(), before);
    }

    #[tokio::test]
    async fn partition_queries_are_scoped_and_ordered() {
        let store = seeded();

        let p1 = store.get_partition("p1").await.unwrap();
        assert_eq!(
            p1.iter().map(|r| r.row.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );

        let filtered = store
            .get_partition_where("p1", &|r: &Row| r.value >= 2)
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);

        let top = store.top("p1", 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].row, "a");

        assert!(store.get_partition("p9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn key_set_lookup_respects_filter() {
        let store = seeded();
        let keys = [
            EntityKey::new("p1", "a"),
            EntityKey::new("p2", "a"),
            EntityKey::new("p9", "nope"),
        ];

        let all = store.get_many(&keys, 2, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = store
            .get_many(&keys, 2, Some(&|r: &Row| r.value > 5))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, 10);

        assert_eq!(
            store.get_many(&keys, 0, None).await.unwrap_err(),
            StoreError::bad_request("page size must be at least 1")
        );
    }

    #[tokio::test]
    async fn find_where_scans_all_partitions() {
        let store = seeded();

        let found = store.find_where(&|r: &Row| r.value >= 10).await.unwrap();
        assert_eq!(found.len(), 2);

        let top = store.top_where(&|r: &Row| r.value >= 2, 2).await.unwrap();
        assert_eq!(top.len(), 2);
    }

    #[tokio::test]
    async fn find_where_async_awaits_the_predicate() {
        fn keep_large(row: &Row) -> BoxFuture<'_, bool> {
            let keep = row.value >= 10;
            Box::pin(async move { keep })
        }

        let store = seeded();
        let found = store.find_where_async(&keep_large).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn paging_walks_the_whole_table() {
        let store = seeded();
        let mut seen = Vec::new();

        let mut page = store.first_page(2).await.unwrap();
        seen.extend(page.items.iter().map(|r| r.value));
        while let Some(token) = page.token.take() {
            page = store.next_page(&token, 2).await.unwrap();
            seen.extend(page.items.iter().map(|r| r.value));
        }

        assert_eq!(seen, vec![1, 2, 3, 10, 20]);
    }

    #[tokio::test]
    async fn malformed_page_token_is_rejected() {
        let store = seeded();
        let err = store
            .next_page(&PageToken::new("garbage"), 2)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::bad_request("malformed continuation token"));
    }

    #[tokio::test]
    async fn chunked_iteration_delivers_every_chunk_once() {
        let store = seeded();
        let mut chunks = Vec::new();

        store
            .for_each_chunk(2, &mut |chunk: Vec<Row>| {
                chunks.push(chunk.len());
                ControlFlow::Continue(())
            })
            .await
            .unwrap();
        assert_eq!(chunks, vec![2, 2, 1]);

        let mut first_only = 0;
        store
            .for_each_partition_chunk("p1", 2, &mut |_chunk| {
                first_only += 1;
                ControlFlow::Break(())
            })
            .await
            .unwrap();
        assert_eq!(first_only, 1);
    }

    #[tokio::test]
    async fn scan_for_first_stops_at_the_first_match() {
        let store = seeded();

        let found = store
            .scan_for_first("p1", &|r: &Row| r.value > 1)
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.row), Some("b".to_string()));

        let none = store
            .scan_for_first("p1", &|r: &Row| r.value > 100)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn execute_query_yields_until_break() {
        let store = seeded();
        let mut seen = 0;

        store
            .execute_query(&Query::new("select *"), &mut |_row| {
                seen += 1;
                if seen == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .await
            .unwrap();
        assert_eq!(seen, 3);
    }

    #[tokio::test]
    async fn ensure_table_reports_first_creation() {
        let store: MemoryTableStore<Row> = MemoryTableStore::new("rows");
        assert_eq!(store.table_name(), "rows");
        assert!(store.ensure_table().await.unwrap());
        assert!(!store.ensure_table().await.unwrap());
    }
}
