use super::models::Book;

/// LIFO history of books added during this session.
#[derive(Debug, Clone, Default)]
pub struct RecentAdditions {
    items: Vec<Book>,
}

impl RecentAdditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, book: Book) {
        self.items.push(book);
    }

    pub fn pop(&mut self) -> Option<Book> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&Book> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Most recent addition first.
    pub fn iter_latest_first(&self) -> impl Iterator<Item = &Book> {
        self.items.iter().rev()
    }
}
