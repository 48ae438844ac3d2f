//! Three-way partition quicksort over record fields.

use std::cmp::Ordering;
use std::str::FromStr;

use super::compare::{compare_values, FieldValue};
use super::models::{Book, BorrowRecord};

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Title,
    Author,
    Category,
    Status,
    Borrower,
    BorrowDate,
}

impl SortKey {
    /// Parse a user-supplied key. `"none"` (or an empty string) means the
    /// listing keeps its stored order.
    pub fn parse_optional(value: &str) -> Result<Option<SortKey>, UnknownSortKey> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(None),
            _ => value.parse().map(Some),
        }
    }
}

/// Returned for sort keys outside [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" | "bookid" => Ok(SortKey::Id),
            "title" => Ok(SortKey::Title),
            "author" => Ok(SortKey::Author),
            "category" => Ok(SortKey::Category),
            "status" => Ok(SortKey::Status),
            "borrower" => Ok(SortKey::Borrower),
            "borrowdate" | "borrow_date" | "date" => Ok(SortKey::BorrowDate),
            _ => Err(UnknownSortKey(value.to_string())),
        }
    }
}

/// A record shape the sorter can pull fields out of. Fields a shape does
/// not carry come back as `None` and sort last.
pub trait SortRecord {
    fn sort_field(&self, key: SortKey) -> Option<FieldValue>;
}

/// Ids read back from numeric JSON are plain digits with no leading zero;
/// those order as numbers. Generated ids keep their zero padding and order
/// as text.
fn id_value(id: &str) -> FieldValue {
    let plain_number = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && (id.len() == 1 || !id.starts_with('0'));
    match id.parse::<f64>() {
        Ok(n) if plain_number => FieldValue::Number(n),
        _ => FieldValue::from(id),
    }
}

impl SortRecord for Book {
    fn sort_field(&self, key: SortKey) -> Option<FieldValue> {
        match key {
            SortKey::Id => Some(id_value(&self.id)),
            SortKey::Title => Some(self.title.as_str().into()),
            SortKey::Author => Some(self.author.as_str().into()),
            SortKey::Category => Some(self.category.as_str().into()),
            SortKey::Status => Some(self.status.as_str().into()),
            SortKey::Borrower => self.borrower.as_deref().map(FieldValue::from),
            SortKey::BorrowDate => self.borrow_date.as_deref().map(FieldValue::from),
        }
    }
}

impl SortRecord for BorrowRecord {
    fn sort_field(&self, key: SortKey) -> Option<FieldValue> {
        match key {
            SortKey::Id => Some(id_value(&self.book_id)),
            SortKey::Title => Some(self.title.as_str().into()),
            SortKey::Author => Some(self.author.as_str().into()),
            SortKey::Category => Some(self.category.as_str().into()),
            SortKey::Status => None,
            SortKey::Borrower => Some(self.borrower.as_str().into()),
            SortKey::BorrowDate => Some(self.borrow_date.as_str().into()),
        }
    }
}

/// Sort `items` by the value `select` extracts, returning a new vector.
///
/// Pivot is the middle element of each slice. Items are split into less,
/// equal and greater buckets in their original order, so items with equal
/// keys keep their relative order. Descending order swaps the comparison
/// operands instead of reversing the result.
pub fn quick_sort<T, F>(items: &[T], select: F, ascending: bool) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<FieldValue>,
{
    partition_sort(items, &select, ascending)
}

fn partition_sort<T, F>(items: &[T], select: &F, ascending: bool) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<FieldValue>,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot = select(&items[items.len() / 2]);
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for item in items {
        let value = select(item);
        let ordering = if ascending {
            compare_values(value.as_ref(), pivot.as_ref())
        } else {
            compare_values(pivot.as_ref(), value.as_ref())
        };
        match ordering {
            Ordering::Less => less.push(item.clone()),
            Ordering::Greater => greater.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
        }
    }

    let mut sorted = partition_sort(&less, select, ascending);
    sorted.append(&mut equal);
    sorted.append(&mut partition_sort(&greater, select, ascending));
    sorted
}

/// Sort any [`SortRecord`] by a named key.
pub fn sort_records<T>(items: &[T], key: SortKey, ascending: bool) -> Vec<T>
where
    T: SortRecord + Clone,
{
    quick_sort(items, |item| item.sort_field(key), ascending)
}
