//! Listing filters: which books a view shows and free-text search.

use std::str::FromStr;

use serde::Deserialize;

use super::models::{Book, BorrowRecord};

/// Which slice of the catalog a book listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookView {
    #[default]
    All,
    Available,
}

impl BookView {
    pub fn includes(&self, book: &Book) -> bool {
        match self {
            BookView::All => true,
            BookView::Available => book.is_available(),
        }
    }
}

impl FromStr for BookView {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BookView::All),
            "available" => Ok(BookView::Available),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// Text columns a search term is matched against.
pub trait SearchRecord {
    fn search_fields(&self) -> Vec<&str>;
}

impl SearchRecord for Book {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.title.as_str(),
            self.author.as_str(),
            self.category_name(),
            self.borrower.as_deref().unwrap_or(""),
        ]
    }
}

impl SearchRecord for BorrowRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.book_id.as_str(),
            self.title.as_str(),
            self.author.as_str(),
            self.category_name(),
            self.borrower.as_str(),
        ]
    }
}

/// Case-insensitive substring match on any search field. A blank term
/// matches everything.
pub fn matches<T: SearchRecord>(record: &T, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Keep the records that match `term`, in their current order.
pub fn filter<T: SearchRecord + Clone>(records: &[T], term: &str) -> Vec<T> {
    records
        .iter()
        .filter(|record| matches(*record, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::models::BookStatus;

    fn book(id: &str, title: &str, category: &str, borrower: Option<&str>) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            category: category.to_string(),
            status: if borrower.is_some() {
                BookStatus::Borrowed
            } else {
                BookStatus::Available
            },
            borrower: borrower.map(str::to_string),
            borrow_date: borrower.map(|_| "2026-10-19".to_string()),
        }
    }

    #[test]
    fn blank_term_matches_all() {
        let books = vec![book("04001", "Earthsea", "04", None)];
        assert_eq!(filter(&books, "   ").len(), 1);
    }

    #[test]
    fn matches_category_name_and_borrower() {
        let books = vec![
            book("04001", "A Wizard of Earthsea", "04", None),
            book("11001", "The Dispossessed", "11", Some("Shevek")),
        ];

        let fantasy = filter(&books, "FANTASY");
        assert_eq!(fantasy.len(), 1);
        assert_eq!(fantasy[0].id, "04001");

        let by_borrower = filter(&books, "shev");
        assert_eq!(by_borrower[0].id, "11001");

        assert_eq!(filter(&books, "le guin").len(), 2);
        assert_eq!(filter(&books, "11001").len(), 1);
        assert!(filter(&books, "tolkien").is_empty());
    }

    #[test]
    fn borrow_records_search_by_book_id() {
        let record = BorrowRecord::from(&book("11001", "The Dispossessed", "11", Some("Shevek")));
        assert!(matches(&record, "11001"));
        assert!(matches(&record, "science"));
    }

    #[test]
    fn available_view_hides_borrowed() {
        let borrowed = book("11001", "The Dispossessed", "11", Some("Shevek"));
        assert!(BookView::All.includes(&borrowed));
        assert!(!BookView::Available.includes(&borrowed));
        assert_eq!("Available".parse::<BookView>().unwrap(), BookView::Available);
    }
}
