use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Availability of a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book in the catalog.
///
/// `borrower` and `borrow_date` are set exactly when `status` is
/// [`BookStatus::Borrowed`]. Snapshots written by older versions may omit
/// them or write them as `null`; either way they default to an available
/// book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BookStatus,
    #[serde(default)]
    pub borrower: Option<String>,
    #[serde(default)]
    pub borrow_date: Option<String>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// Display name of the book's category.
    pub fn category_name(&self) -> &'static str {
        category_name(&self.category)
    }
}

/// Input for [`super::list::BookCatalog::add`]. Missing lending fields
/// default to an available book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub status: Option<BookStatus>,
    pub borrower: Option<String>,
    pub borrow_date: Option<String>,
}

impl From<Book> for NewBook {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            category: book.category,
            status: Some(book.status),
            borrower: book.borrower,
            borrow_date: book.borrow_date,
        }
    }
}

/// Bare record carrying only an id.
impl From<&str> for NewBook {
    fn from(id: &str) -> Self {
        NewBook {
            id: id.to_string(),
            ..NewBook::default()
        }
    }
}

/// Outstanding loan, denormalized from the borrowed [`Book`] so the return
/// listing never has to join against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub book_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub borrower: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub borrow_date: String,
}

impl BorrowRecord {
    pub fn category_name(&self) -> &'static str {
        category_name(&self.category)
    }
}

/// Only meaningful for a borrowed book.
impl From<&Book> for BorrowRecord {
    fn from(book: &Book) -> Self {
        debug_assert!(
            book.status == BookStatus::Borrowed,
            "borrow record built from available book {}",
            book.id
        );
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            borrower: book.borrower.clone().unwrap_or_default(),
            borrow_date: book.borrow_date.clone().unwrap_or_default(),
        }
    }
}

/// Genre codes `"01"` through `"16"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fiction,
    Romance,
    Mystery,
    Fantasy,
    Thriller,
    Poetry,
    Arts,
    NonFiction,
    Biography,
    History,
    Science,
    Technology,
    SelfHelp,
    Travel,
    Cooking,
    Children,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Category::Fiction,
        Category::Romance,
        Category::Mystery,
        Category::Fantasy,
        Category::Thriller,
        Category::Poetry,
        Category::Arts,
        Category::NonFiction,
        Category::Biography,
        Category::History,
        Category::Science,
        Category::Technology,
        Category::SelfHelp,
        Category::Travel,
        Category::Cooking,
        Category::Children,
    ];

    /// Two-digit code, e.g. `"08"` for non-fiction.
    pub fn code(&self) -> String {
        format!("{:02}", *self as usize + 1)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Fiction => "Fiction",
            Category::Romance => "Romance",
            Category::Mystery => "Mystery",
            Category::Fantasy => "Fantasy",
            Category::Thriller => "Thriller",
            Category::Poetry => "Poetry",
            Category::Arts => "Arts",
            Category::NonFiction => "Non-Fiction",
            Category::Biography => "Biography",
            Category::History => "History",
            Category::Science => "Science",
            Category::Technology => "Technology",
            Category::SelfHelp => "Self-Help",
            Category::Travel => "Travel",
            Category::Cooking => "Cooking",
            Category::Children => "Children",
        }
    }

    /// Look up a code, accepting both `"1"` and `"01"`.
    pub fn from_code(code: &str) -> Option<Category> {
        let code = normalize_category_code(code);
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index: usize = code.parse().ok()?;
        index.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

/// Name shown for codes outside the fixed table.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Left-pad a category code to two digits (`"1"` -> `"01"`). Longer codes
/// are returned trimmed but otherwise untouched.
pub fn normalize_category_code(code: &str) -> String {
    format!("{:0>2}", code.trim())
}

/// Display name for a category code; unknown codes map to `"Unknown"`.
pub fn category_name(code: &str) -> &'static str {
    Category::from_code(code)
        .map(|c| c.name())
        .unwrap_or(UNKNOWN_CATEGORY)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Integer(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        }
    }
}

/// Accept ids and codes written either as JSON strings or JSON numbers.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Like [`id_from_string_or_number`], with `null` read as an empty code.
fn optional_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_string)
        .unwrap_or_default())
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
