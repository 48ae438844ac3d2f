//! Terminal output: listing tables and one-line notices.

use libris_app::catalog::models::{Book, BorrowRecord, Category};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Borrower")]
    borrower: String,
    #[tabled(rename = "Borrowed On")]
    borrow_date: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category_name(),
            status: book.status.as_str(),
            borrower: book.borrower.clone().unwrap_or_default(),
            borrow_date: book.borrow_date.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct LoanRow {
    #[tabled(rename = "Book ID")]
    book_id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Borrower")]
    borrower: String,
    #[tabled(rename = "Borrowed On")]
    borrow_date: String,
}

impl From<&BorrowRecord> for LoanRow {
    fn from(record: &BorrowRecord) -> Self {
        Self {
            book_id: record.book_id.clone(),
            title: record.title.clone(),
            author: record.author.clone(),
            category: record.category_name(),
            borrower: record.borrower.clone(),
            borrow_date: record.borrow_date.clone(),
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: &'static str,
}

fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn books(books: &[Book]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }
    let rows: Vec<BookRow> = books.iter().map(BookRow::from).collect();
    println!("{}", table(&rows));
}

pub fn loans(records: &[BorrowRecord]) {
    if records.is_empty() {
        println!("No books are currently borrowed.");
        return;
    }
    let rows: Vec<LoanRow> = records.iter().map(LoanRow::from).collect();
    println!("{}", table(&rows));
}

pub fn categories(categories: &[Category]) {
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|category| CategoryRow {
            code: category.code(),
            name: category.name(),
        })
        .collect();
    println!("{}", table(&rows));
}

pub fn notice(message: &str) {
    println!("{message}");
}

pub fn failure(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
}
