use libris_http::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Why a catalog operation was refused. Refusals never change state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("book {id} not found")]
    NotFound { id: String },

    #[error("book {id} is not available for borrowing")]
    NotAvailable { id: String },

    #[error("book {id} is not currently borrowed")]
    NotBorrowed { id: String },
}

impl LibraryError {
    pub(crate) fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        let message = err.to_string();
        match err {
            LibraryError::Validation { field } => AppError::validation(
                vec![json!({ "field": field, "error": "required" })],
                message,
            ),
            LibraryError::NotFound { .. } => AppError::not_found(message),
            LibraryError::NotAvailable { id } | LibraryError::NotBorrowed { id } => {
                AppError::conflict(vec![json!({ "bookId": id })], message)
            }
        }
    }
}
