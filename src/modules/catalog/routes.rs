//! HTTP handlers for the catalog module.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libris_http::error::AppError;
use serde::{Deserialize, Serialize};

use super::models::{Book, BorrowRecord, Category};
use super::query::BookView;
use super::service::{Library, ListOrder};
use super::sort::SortKey;

/// Shared session; the mutex is the single boundary around catalog state.
pub type SharedLibrary = Arc<Mutex<Library>>;

pub fn router(library: SharedLibrary) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/health", get(health_check))
        .route("/borrowed", get(list_borrowed))
        .route("/recent", get(list_recent))
        .route("/categories", get(list_categories))
        .route("/{id}", get(get_book).delete(delete_book))
        .route("/{id}/borrow", post(borrow_book))
        .route("/{id}/return", post(return_book))
        .with_state(library)
}

fn lock(library: &SharedLibrary) -> Result<MutexGuard<'_, Library>, AppError> {
    library
        .lock()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("catalog session lock poisoned")))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    view: Option<String>,
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    order: Option<String>,
}

impl ListParams {
    fn view(&self) -> Result<BookView, AppError> {
        match self.view.as_deref() {
            None => Ok(BookView::All),
            Some(view) => view.parse().map_err(AppError::bad_request),
        }
    }

    fn term(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    fn ordering(&self) -> Result<Option<ListOrder>, AppError> {
        let key = match self.sort.as_deref() {
            None => return Ok(None),
            Some(sort) => {
                SortKey::parse_optional(sort).map_err(|err| AppError::bad_request(err.to_string()))?
            }
        };
        let ascending = match self.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => true,
            Some("desc") => false,
            Some(other) => {
                return Err(AppError::bad_request(format!(
                    "unknown order '{other}'; expected asc or desc"
                )))
            }
        };
        Ok(key.map(|key| ListOrder { key, ascending }))
    }
}

#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    #[serde(default)]
    borrower: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    code: String,
    name: &'static str,
}

async fn health_check() -> &'static str {
    "catalog module is healthy"
}

async fn list_books(
    State(library): State<SharedLibrary>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    let view = params.view()?;
    let order = params.ordering()?;
    let library = lock(&library)?;
    Ok(Json(library.list_books(view, params.term(), order)))
}

async fn add_book(
    State(library): State<SharedLibrary>,
    Json(request): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let mut library = lock(&library)?;
    let book = library.add_book(&request.title, &request.author, &request.category)?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(library): State<SharedLibrary>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let library = lock(&library)?;
    library
        .find(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))
}

async fn delete_book(
    State(library): State<SharedLibrary>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut library = lock(&library)?;
    library.delete_book(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn borrow_book(
    State(library): State<SharedLibrary>,
    Path(id): Path<String>,
    Json(request): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<BorrowRecord>), AppError> {
    let mut library = lock(&library)?;
    let record = library.borrow_book(&id, &request.borrower)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn return_book(
    State(library): State<SharedLibrary>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let mut library = lock(&library)?;
    Ok(Json(library.return_book(&id)?))
}

async fn list_borrowed(
    State(library): State<SharedLibrary>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BorrowRecord>>, AppError> {
    let order = params.ordering()?;
    let library = lock(&library)?;
    Ok(Json(library.list_borrowed(params.term(), order)))
}

async fn list_recent(State(library): State<SharedLibrary>) -> Result<Json<Vec<Book>>, AppError> {
    let library = lock(&library)?;
    Ok(Json(library.recent()))
}

async fn list_categories() -> Json<Vec<CategoryEntry>> {
    Json(
        Category::ALL
            .iter()
            .map(|category| CategoryEntry {
                code: category.code(),
                name: category.name(),
            })
            .collect(),
    )
}
