use super::list::BookCatalog;
use super::models::normalize_category_code;

/// Derive the next id for `category`: the two-digit category code followed
/// by a three-digit running number (`"1"` on an empty catalog gives
/// `"01001"`).
///
/// The running number is one more than the count of current ids sharing the
/// prefix, so an id freed by a deletion can be issued again and may collide
/// with a surviving later id.
pub fn generate_book_id(category: &str, catalog: &BookCatalog) -> String {
    let prefix = normalize_category_code(category);
    let in_category = catalog
        .iter()
        .filter(|book| book.id.starts_with(&prefix))
        .count();
    format!("{}{:03}", prefix, in_category + 1)
}
