//! The library session: every mutation of catalog state goes through here.

use std::fmt::Display;

use time::{Date, OffsetDateTime};

use super::error::LibraryError;
use super::id::generate_book_id;
use super::list::BookCatalog;
use super::models::{normalize_category_code, Book, BookStatus, BorrowRecord, NewBook};
use super::persistence::SnapshotBridge;
use super::query::{self, BookView};
use super::queue::BorrowQueue;
use super::recent::RecentAdditions;
use super::sort::{sort_records, SortKey, SortRecord};

/// Ordering requested for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub key: SortKey,
    pub ascending: bool,
}

impl ListOrder {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            ascending: true,
        }
    }
}

/// One catalog session: catalog, recent additions and borrow queue, kept in
/// step with each other and saved after every change.
///
/// A book is in the borrow queue exactly when its status is borrowed.
pub struct Library {
    catalog: BookCatalog,
    recent: RecentAdditions,
    queue: BorrowQueue,
    bridge: SnapshotBridge,
}

impl Library {
    /// Empty session that saves to `bridge`.
    pub fn new(bridge: SnapshotBridge) -> Self {
        Self {
            catalog: BookCatalog::new(),
            recent: RecentAdditions::new(),
            queue: BorrowQueue::new(),
            bridge,
        }
    }

    /// Session restored from the snapshot behind `bridge`.
    pub fn open(bridge: SnapshotBridge) -> Self {
        let mut library = Self::new(bridge);
        library.reload();
        library
    }

    /// Discard in-memory state and reload the snapshot.
    pub fn reload(&mut self) {
        let (catalog, queue) = self.bridge.load();
        self.catalog = catalog;
        self.queue = queue;
        self.recent = RecentAdditions::new();
    }

    /// Write the current state to the snapshot store.
    pub fn save(&self) {
        self.bridge.save(&self.catalog, &self.queue);
    }

    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        category: &str,
    ) -> Result<Book, LibraryError> {
        let title = required("title", title)?;
        let author = required("author", author)?;
        let category = required("category", category)?;

        let id = generate_book_id(category, &self.catalog);
        let book = self
            .catalog
            .add(NewBook {
                id,
                title: title.to_string(),
                author: author.to_string(),
                category: normalize_category_code(category),
                ..NewBook::default()
            })
            .clone();
        self.recent.push(book.clone());
        self.save();

        tracing::info!(book_id = %book.id, category = %book.category, "book added");
        Ok(book)
    }

    /// Remove a book and any borrow record it still has.
    pub fn delete_book(&mut self, id: impl Display) -> Result<(), LibraryError> {
        let id = id.to_string();
        if !self.catalog.remove(&id) {
            return Err(LibraryError::not_found(id));
        }
        let purged = self.queue.remove_by_book_id(&id);
        self.save();

        tracing::info!(book_id = %id, purged_loans = purged, "book deleted");
        Ok(())
    }

    /// Lend a book, dated today (UTC).
    pub fn borrow_book(
        &mut self,
        id: impl Display,
        borrower: &str,
    ) -> Result<BorrowRecord, LibraryError> {
        self.borrow_book_on(id, borrower, OffsetDateTime::now_utc().date())
    }

    pub fn borrow_book_on(
        &mut self,
        id: impl Display,
        borrower: &str,
        date: Date,
    ) -> Result<BorrowRecord, LibraryError> {
        let borrower = required("borrower", borrower)?;
        let id = id.to_string();

        let book = self
            .catalog
            .find_mut(&id)
            .ok_or_else(|| LibraryError::not_found(&id))?;
        if book.status != BookStatus::Available {
            return Err(LibraryError::NotAvailable { id });
        }

        book.status = BookStatus::Borrowed;
        book.borrower = Some(borrower.to_string());
        book.borrow_date = Some(date.to_string());
        let record = BorrowRecord::from(&*book);

        self.queue.remove_by_book_id(&id);
        self.queue.enqueue(record.clone());
        self.save();

        tracing::info!(book_id = %id, borrower = %record.borrower, "book borrowed");
        Ok(record)
    }

    pub fn return_book(&mut self, id: impl Display) -> Result<Book, LibraryError> {
        let id = id.to_string();

        let book = self
            .catalog
            .find_mut(&id)
            .ok_or_else(|| LibraryError::not_found(&id))?;
        if book.status != BookStatus::Borrowed {
            return Err(LibraryError::NotBorrowed { id });
        }

        book.status = BookStatus::Available;
        book.borrower = None;
        book.borrow_date = None;
        let book = book.clone();

        self.queue.remove_by_book_id(&id);
        self.save();

        tracing::info!(book_id = %id, "book returned");
        Ok(book)
    }

    pub fn find(&self, id: impl Display) -> Option<Book> {
        self.catalog.find(id).cloned()
    }

    /// All books in catalog order.
    pub fn books(&self) -> Vec<Book> {
        self.catalog.to_vec()
    }

    pub fn available_books(&self) -> Vec<Book> {
        self.list_books(BookView::Available, "", None)
    }

    /// Outstanding loans, oldest first.
    pub fn borrowed(&self) -> Vec<BorrowRecord> {
        self.queue.to_vec()
    }

    /// Books added this session, latest first.
    pub fn recent(&self) -> Vec<Book> {
        self.recent.iter_latest_first().cloned().collect()
    }

    pub fn book_count(&self) -> usize {
        self.catalog.len()
    }

    /// Books in `view` matching `term`, optionally sorted.
    pub fn list_books(&self, view: BookView, term: &str, order: Option<ListOrder>) -> Vec<Book> {
        let books: Vec<Book> = self
            .catalog
            .iter()
            .filter(|book| view.includes(book) && query::matches(*book, term))
            .cloned()
            .collect();
        apply_order(books, order)
    }

    /// Borrow records matching `term`, optionally sorted.
    pub fn list_borrowed(&self, term: &str, order: Option<ListOrder>) -> Vec<BorrowRecord> {
        let records = query::filter(&self.queue.to_vec(), term);
        apply_order(records, order)
    }
}

fn apply_order<T>(items: Vec<T>, order: Option<ListOrder>) -> Vec<T>
where
    T: SortRecord + Clone,
{
    match order {
        Some(order) => sort_records(&items, order.key, order.ascending),
        None => items,
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, LibraryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::Validation { field });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::persistence::SnapshotKeys;
    use libris_db::{MemoryStore, SnapshotStore};
    use std::sync::Arc;
    use time::macros::date;

    fn library() -> (Library, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let bridge = SnapshotBridge::new(store.clone(), SnapshotKeys::default());
        (Library::new(bridge), store)
    }

    fn reopen(store: &Arc<MemoryStore>) -> Library {
        Library::open(SnapshotBridge::new(store.clone(), SnapshotKeys::default()))
    }

    #[test]
    fn add_book_generates_sequential_ids() {
        let (mut library, _) = library();

        let first = library.add_book("Dune", "Frank Herbert", "1").unwrap();
        let second = library.add_book("Hyperion", "Dan Simmons", "01").unwrap();
        let other = library.add_book("Rebecca", "Daphne du Maurier", "3").unwrap();

        assert_eq!(first.id, "01001");
        assert_eq!(second.id, "01002");
        assert_eq!(other.id, "03001");
        assert_eq!(first.category, "01");
        assert_eq!(library.book_count(), 3);
        assert_eq!(library.recent()[0].id, "03001");
    }

    #[test]
    fn add_book_requires_every_field() {
        let (mut library, store) = library();

        assert_eq!(
            library.add_book("  ", "Frank Herbert", "1"),
            Err(LibraryError::Validation { field: "title" })
        );
        assert_eq!(
            library.add_book("Dune", "", "1"),
            Err(LibraryError::Validation { field: "author" })
        );
        assert_eq!(
            library.add_book("Dune", "Frank Herbert", " "),
            Err(LibraryError::Validation { field: "category" })
        );
        assert_eq!(library.book_count(), 0);
        assert_eq!(store.get("books").unwrap(), None);
    }

    #[test]
    fn add_book_trims_input() {
        let (mut library, _) = library();
        let book = library.add_book("  Dune ", " Frank Herbert", "1").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
    }

    #[test]
    fn borrow_then_return_restores_book() {
        let (mut library, _) = library();
        let book = library.add_book("Dune", "Frank Herbert", "1").unwrap();

        let record = library
            .borrow_book_on(&book.id, "  Ann  ", date!(2026 - 10 - 19))
            .unwrap();
        assert_eq!(record.borrower, "Ann");
        assert_eq!(record.borrow_date, "2026-10-19");

        let lent = library.find(&book.id).unwrap();
        assert_eq!(lent.status, BookStatus::Borrowed);
        assert_eq!(lent.borrower.as_deref(), Some("Ann"));
        assert_eq!(library.borrowed().len(), 1);
        assert!(library.available_books().is_empty());

        let returned = library.return_book(&book.id).unwrap();
        assert_eq!(returned.status, BookStatus::Available);
        assert_eq!(returned.borrower, None);
        assert_eq!(returned.borrow_date, None);
        assert!(library.borrowed().is_empty());
        assert_eq!(library.find(&book.id).unwrap(), returned);
    }

    #[test]
    fn borrow_refusals_leave_state_untouched() {
        let (mut library, _) = library();
        let book = library.add_book("Dune", "Frank Herbert", "1").unwrap();

        assert_eq!(
            library.borrow_book(&book.id, "   "),
            Err(LibraryError::Validation { field: "borrower" })
        );
        assert_eq!(
            library.borrow_book("99001", "Ann"),
            Err(LibraryError::not_found("99001"))
        );

        library.borrow_book(&book.id, "Ann").unwrap();
        assert_eq!(
            library.borrow_book(&book.id, "Bo"),
            Err(LibraryError::NotAvailable {
                id: book.id.clone()
            })
        );
        assert_eq!(library.borrowed().len(), 1);
        assert_eq!(library.borrowed()[0].borrower, "Ann");
    }

    #[test]
    fn return_requires_borrowed_book() {
        let (mut library, _) = library();
        let book = library.add_book("Dune", "Frank Herbert", "1").unwrap();

        assert_eq!(
            library.return_book(&book.id),
            Err(LibraryError::NotBorrowed {
                id: book.id.clone()
            })
        );
        assert_eq!(
            library.return_book("01999"),
            Err(LibraryError::not_found("01999"))
        );
    }

    #[test]
    fn deleting_borrowed_book_purges_queue() {
        let (mut library, store) = library();
        let book = library.add_book("Dune", "Frank Herbert", "1").unwrap();
        library.add_book("Hyperion", "Dan Simmons", "1").unwrap();
        library.borrow_book(&book.id, "Ann").unwrap();

        library.delete_book(&book.id).unwrap();
        assert!(library.find(&book.id).is_none());
        assert!(library.borrowed().is_empty());
        assert_eq!(library.book_count(), 1);

        let restored = reopen(&store);
        assert!(restored.borrowed().is_empty());
        assert_eq!(restored.book_count(), 1);

        assert_eq!(
            library.delete_book(&book.id),
            Err(LibraryError::not_found(&book.id))
        );
    }

    #[test]
    fn numeric_ids_reach_string_ids() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "books",
                r#"[{"id":1001,"title":"Dune","author":"Herbert","category":"1"}]"#,
            )
            .unwrap();
        let mut library = reopen(&store);

        library.borrow_book(1001, "Ann").unwrap();
        assert_eq!(library.return_book("1001").unwrap().id, "1001");
        library.delete_book(1001).unwrap();
        assert_eq!(library.book_count(), 0);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (mut library, store) = library();
        let book = library.add_book("Dune", "Frank Herbert", "1").unwrap();
        library.borrow_book(&book.id, "Ann").unwrap();

        let restored = reopen(&store);
        assert_eq!(restored.find(&book.id).unwrap().status, BookStatus::Borrowed);
        assert_eq!(restored.borrowed()[0].book_id, book.id);
        assert!(restored.recent().is_empty());
    }

    #[test]
    fn listings_filter_and_sort() {
        let (mut library, _) = library();
        library.add_book("Rebecca", "Daphne du Maurier", "3").unwrap();
        library.add_book("Dune", "Frank Herbert", "1").unwrap();
        library.add_book("anathem", "Neal Stephenson", "1").unwrap();
        library.borrow_book("01001", "Ann").unwrap();

        let by_title =
            library.list_books(BookView::All, "", Some(ListOrder::ascending(SortKey::Title)));
        let titles: Vec<_> = by_title.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["anathem", "Dune", "Rebecca"]);

        let available = library.list_books(
            BookView::Available,
            "",
            Some(ListOrder {
                key: SortKey::Id,
                ascending: false,
            }),
        );
        let ids: Vec<_> = available.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["03001", "01002"]);

        let mystery = library.list_books(BookView::All, "mystery", None);
        assert_eq!(mystery.len(), 1);

        assert_eq!(library.list_borrowed("ann", None).len(), 1);
        assert!(library.list_borrowed("bo", None).is_empty());
    }
}
