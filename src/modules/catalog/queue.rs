use std::collections::VecDeque;
use std::fmt::Display;

use super::models::BorrowRecord;

/// FIFO queue of outstanding loans, oldest first.
///
/// Each book id is expected at most once; the library removes a book's
/// record before it can be borrowed again.
#[derive(Debug, Clone, Default)]
pub struct BorrowQueue {
    items: VecDeque<BorrowRecord>,
}

impl BorrowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record projected from `request`.
    pub fn enqueue(&mut self, request: impl Into<BorrowRecord>) {
        self.items.push_back(request.into());
    }

    /// Remove and return the oldest record.
    pub fn dequeue(&mut self) -> Option<BorrowRecord> {
        self.items.pop_front()
    }

    /// Drop every record for `book_id`. Returns how many were removed.
    pub fn remove_by_book_id(&mut self, book_id: impl Display) -> usize {
        let target = book_id.to_string();
        let before = self.items.len();
        self.items.retain(|record| record.book_id != target);
        before - self.items.len()
    }

    pub fn contains(&self, book_id: impl Display) -> bool {
        let target = book_id.to_string();
        self.items.iter().any(|record| record.book_id == target)
    }

    /// Copy of every record in FIFO order.
    pub fn to_vec(&self) -> Vec<BorrowRecord> {
        self.items.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BorrowRecord> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::{Book, BookStatus};

    fn borrowed(id: &str, borrower: &str) -> Book {
        Book {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "Anon".to_string(),
            category: "02".to_string(),
            status: BookStatus::Borrowed,
            borrower: Some(borrower.to_string()),
            borrow_date: Some("2026-10-19".to_string()),
        }
    }

    #[test]
    fn first_in_first_out() {
        let mut queue = BorrowQueue::new();
        assert!(queue.dequeue().is_none());

        queue.enqueue(&borrowed("02001", "Ann"));
        queue.enqueue(&borrowed("02002", "Bo"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue().unwrap().book_id, "02001");
        assert_eq!(queue.dequeue().unwrap().book_id, "02002");
        assert!(queue.is_empty());
    }

    #[test]
    fn enqueue_projects_book_fields() {
        let mut queue = BorrowQueue::new();
        queue.enqueue(&borrowed("02001", "Ann"));

        let record = &queue.to_vec()[0];
        assert_eq!(record.book_id, "02001");
        assert_eq!(record.title, "Title 02001");
        assert_eq!(record.category, "02");
        assert_eq!(record.borrower, "Ann");
        assert_eq!(record.borrow_date, "2026-10-19");
    }

    #[test]
    fn remove_by_book_id_keeps_order_of_others() {
        let mut queue = BorrowQueue::new();
        queue.enqueue(&borrowed("1001", "Ann"));
        queue.enqueue(&borrowed("1002", "Bo"));
        queue.enqueue(&borrowed("1001", "Cy"));
        queue.enqueue(&borrowed("1003", "Di"));

        assert_eq!(queue.remove_by_book_id(1001), 2);
        assert!(!queue.contains("1001"));
        assert_eq!(queue.remove_by_book_id("9999"), 0);

        let ids: Vec<_> = queue.iter().map(|r| r.book_id.as_str()).collect();
        assert_eq!(ids, vec!["1002", "1003"]);
    }
}
