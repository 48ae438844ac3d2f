use std::fmt::Display;

use super::models::{Book, NewBook};

/// Ordered collection of books. Insertion order is the display order.
///
/// Ids are matched as strings, so `find(1001)` and `find("1001")` hit the
/// same entry. Duplicate ids are not rejected; lookups return the first.
#[derive(Debug, Clone, Default)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a book built from `data`.
    pub fn add(&mut self, data: impl Into<NewBook>) -> &Book {
        let data = data.into();
        let book = Book {
            id: data.id,
            title: data.title,
            author: data.author,
            category: data.category,
            status: data.status.unwrap_or_default(),
            borrower: data.borrower,
            borrow_date: data.borrow_date,
        };
        self.books.push(book);
        &self.books[self.books.len() - 1]
    }

    pub fn find(&self, id: impl Display) -> Option<&Book> {
        let target = id.to_string();
        self.books.iter().find(|book| book.id == target)
    }

    pub fn find_mut(&mut self, id: impl Display) -> Option<&mut Book> {
        let target = id.to_string();
        self.books.iter_mut().find(|book| book.id == target)
    }

    /// Remove the first book with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: impl Display) -> bool {
        let target = id.to_string();
        match self.books.iter().position(|book| book.id == target) {
            Some(index) => {
                self.books.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of every book in catalog order.
    pub fn to_vec(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::BookStatus;

    fn titled(id: &str, title: &str) -> NewBook {
        NewBook {
            id: id.to_string(),
            title: title.to_string(),
            author: "Anon".to_string(),
            category: "01".to_string(),
            ..NewBook::default()
        }
    }

    #[test]
    fn add_defaults_to_available() {
        let mut catalog = BookCatalog::new();
        let book = catalog.add(titled("01001", "Dune"));

        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.borrower, None);
        assert_eq!(book.borrow_date, None);
    }

    #[test]
    fn preserves_insertion_order_across_removal() {
        let mut catalog = BookCatalog::new();
        for id in ["01001", "01002", "01003", "01004"] {
            catalog.add(id);
        }

        assert!(catalog.remove("01001"));
        assert!(catalog.remove("01003"));
        assert!(!catalog.remove("01003"));

        let ids: Vec<_> = catalog.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["01002", "01004"]);
    }

    #[test]
    fn numeric_and_string_ids_match() {
        let mut catalog = BookCatalog::new();
        catalog.add(titled("1001", "Dune"));

        assert_eq!(catalog.find(1001).map(|b| b.title.as_str()), Some("Dune"));
        assert!(catalog.find("1001").is_some());
        assert!(catalog.remove(1001));
        assert!(catalog.find("1001").is_none());
    }

    #[test]
    fn find_returns_first_duplicate() {
        let mut catalog = BookCatalog::new();
        catalog.add(titled("01001", "first"));
        catalog.add(titled("01001", "second"));

        assert_eq!(catalog.find("01001").unwrap().title, "first");
        assert!(catalog.remove("01001"));
        assert_eq!(catalog.find("01001").unwrap().title, "second");
    }

    #[test]
    fn len_tracks_adds_and_removes() {
        let mut catalog = BookCatalog::new();
        let mut present: Vec<String> = Vec::new();

        for step in 0..40u32 {
            let id = format!("{:05}", step % 7);
            if step % 3 == 0 && present.contains(&id) {
                assert!(catalog.remove(&id));
                let index = present.iter().position(|p| p == &id).unwrap();
                present.remove(index);
            } else {
                catalog.add(id.as_str());
                present.push(id);
            }
            assert_eq!(catalog.len(), present.len());
        }
    }

    #[test]
    fn to_vec_is_detached_copy() {
        let mut catalog = BookCatalog::new();
        catalog.add(titled("01001", "Dune"));

        let mut snapshot = catalog.to_vec();
        snapshot[0].title = "changed".to_string();

        assert_eq!(catalog.find("01001").unwrap().title, "Dune");
    }
}
