use std::sync::Arc;

use libris_db::SnapshotStore;
use libris_kernel::settings::StorageSettings;
use serde::de::DeserializeOwned;

use super::list::BookCatalog;
use super::models::{Book, BorrowRecord};
use super::queue::BorrowQueue;

/// Store keys the two snapshot collections live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotKeys {
    pub books: String,
    pub queue: String,
}

impl Default for SnapshotKeys {
    fn default() -> Self {
        Self::from(&StorageSettings::default())
    }
}

impl From<&StorageSettings> for SnapshotKeys {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            books: settings.books_key.clone(),
            queue: settings.queue_key.clone(),
        }
    }
}

/// Best-effort bridge between the in-memory collections and a snapshot store.
///
/// Saving never fails from the caller's point of view. Loading degrades each
/// collection to empty on its own, and drops individual records it cannot
/// read.
#[derive(Clone)]
pub struct SnapshotBridge {
    store: Arc<dyn SnapshotStore>,
    keys: SnapshotKeys,
}

impl SnapshotBridge {
    pub fn new(store: Arc<dyn SnapshotStore>, keys: SnapshotKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &SnapshotKeys {
        &self.keys
    }

    /// Write both collections. Errors are logged and swallowed.
    pub fn save(&self, catalog: &BookCatalog, queue: &BorrowQueue) {
        self.write(&self.keys.books, &catalog.to_vec());
        self.write(&self.keys.queue, &queue.to_vec());
    }

    fn write<T: serde::Serialize>(&self, key: &str, items: &[T]) {
        let result = serde_json::to_string(items)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(key, &json));

        match result {
            Ok(()) => tracing::debug!(key, count = items.len(), "snapshot saved"),
            Err(err) => tracing::warn!(key, error = %err, "failed to save snapshot"),
        }
    }

    /// Read both collections, each falling back to empty on its own.
    pub fn load(&self) -> (BookCatalog, BorrowQueue) {
        let mut catalog = BookCatalog::new();
        for book in self.read::<Book>(&self.keys.books) {
            catalog.add(book);
        }

        let mut queue = BorrowQueue::new();
        for record in self.read::<BorrowRecord>(&self.keys.queue) {
            queue.enqueue(record);
        }

        tracing::info!(
            books = catalog.len(),
            borrowed = queue.len(),
            "snapshot loaded"
        );
        (catalog, queue)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read snapshot, starting empty");
                return Vec::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(key, error = %err, "malformed snapshot, starting empty");
                return Vec::new();
            }
        };

        // One unreadable record must not take its neighbours down with it.
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(key, index, error = %err, "skipping malformed snapshot record");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::{BookStatus, NewBook};
    use libris_db::MemoryStore;

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk unplugged")
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk unplugged")
        }
    }

    fn bridge_with(store: Arc<MemoryStore>) -> SnapshotBridge {
        SnapshotBridge::new(store, SnapshotKeys::default())
    }

    fn borrowed_book() -> Book {
        Book {
            id: "01001".into(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            category: "01".into(),
            status: BookStatus::Borrowed,
            borrower: Some("Ann".into()),
            borrow_date: Some("2026-10-19".into()),
        }
    }

    #[test]
    fn save_then_load_restores_order_and_state() {
        let store = Arc::new(MemoryStore::new());
        let bridge = bridge_with(store.clone());

        let mut catalog = BookCatalog::new();
        catalog.add(borrowed_book());
        catalog.add(NewBook::from("02001"));
        let mut queue = BorrowQueue::new();
        queue.enqueue(&borrowed_book());

        bridge.save(&catalog, &queue);
        let (loaded_catalog, loaded_queue) = bridge.load();

        assert_eq!(loaded_catalog.to_vec(), catalog.to_vec());
        assert_eq!(loaded_queue.to_vec(), queue.to_vec());
        assert!(store.get("books").unwrap().unwrap().contains("\"borrowDate\""));
    }

    #[test]
    fn malformed_queue_keeps_catalog() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("books", r#"[{"id":"01001","title":"Dune","author":"Herbert","category":"01"}]"#)
            .unwrap();
        store.set("borrow_queue", "{not json").unwrap();

        let (catalog, queue) = bridge_with(store).load();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("01001").unwrap().status, BookStatus::Available);
        assert!(queue.is_empty());
    }

    #[test]
    fn malformed_catalog_keeps_queue() {
        let store = Arc::new(MemoryStore::new());
        store.set("books", "null").unwrap();
        store
            .set("borrow_queue", r#"[{"bookId":1001,"borrower":"Ann"}]"#)
            .unwrap();

        let (catalog, queue) = bridge_with(store).load();
        assert!(catalog.is_empty());
        assert!(queue.contains("1001"));
    }

    #[test]
    fn null_status_loads_as_available() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "books",
                r#"[{"id":"01001","title":"Dune","author":"Herbert","category":"01","status":"Available"},
                    {"id":"01002","title":"Emma","author":"Austen","category":"02","status":null,
                     "borrower":null,"borrowDate":null}]"#,
            )
            .unwrap();

        let (catalog, _) = bridge_with(store).load();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("01002").unwrap().status, BookStatus::Available);
    }

    #[test]
    fn unreadable_record_keeps_its_neighbours() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "books",
                r#"[{"id":"01001","title":"Dune"},{"title":"no id"},{"id":"01003","status":"Lost"},
                    {"id":"01004","title":"Solaris"}]"#,
            )
            .unwrap();
        store
            .set("borrow_queue", r#"[{"bookId":"01001","borrower":"Ann"},42]"#)
            .unwrap();

        let (catalog, queue) = bridge_with(store).load();
        let ids: Vec<_> = catalog.iter().map(|book| book.id.as_str()).collect();
        assert_eq!(ids, vec!["01001", "01004"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn missing_keys_load_empty() {
        let (catalog, queue) = bridge_with(Arc::new(MemoryStore::new())).load();
        assert!(catalog.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn store_failures_are_swallowed() {
        let bridge = SnapshotBridge::new(Arc::new(BrokenStore), SnapshotKeys::default());

        bridge.save(&BookCatalog::new(), &BorrowQueue::new());
        let (catalog, queue) = bridge.load();
        assert!(catalog.is_empty());
        assert!(queue.is_empty());
    }
}
