//! Library catalog: books, borrow queue, and the session that keeps them in
//! step.

pub mod compare;
pub mod error;
pub mod id;
pub mod list;
pub mod models;
pub mod persistence;
pub mod query;
pub mod queue;
pub mod recent;
pub mod routes;
pub mod service;
pub mod sort;

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::Router;
use libris_kernel::{InitCtx, Module};
use serde_json::json;

pub use error::LibraryError;
pub use persistence::{SnapshotBridge, SnapshotKeys};
pub use routes::SharedLibrary;
pub use service::{Library, ListOrder};

/// Catalog module: owns the shared [`Library`] session and serves it over HTTP
pub struct CatalogModule {
    library: SharedLibrary,
}

impl CatalogModule {
    pub fn new(bridge: SnapshotBridge) -> Self {
        Self {
            library: Arc::new(Mutex::new(Library::new(bridge))),
        }
    }

    /// Handle to the session, for callers outside the HTTP routes
    pub fn library(&self) -> SharedLibrary {
        self.library.clone()
    }

    fn with_library<T>(&self, f: impl FnOnce(&mut Library) -> T) -> anyhow::Result<T> {
        let mut library = self
            .library
            .lock()
            .map_err(|_| anyhow!("catalog session lock poisoned"))?;
        Ok(f(&mut library))
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.with_library(|library| {
            library.reload();
            library.book_count()
        })?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = count,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.library.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.with_library(|library| library.save())?;
        tracing::info!(module = self.name(), "catalog module stopped");
        Ok(())
    }
}

/// Create a new instance of the catalog module
pub fn create_module(bridge: SnapshotBridge) -> Arc<CatalogModule> {
    Arc::new(CatalogModule::new(bridge))
}

fn error_responses(codes: &[&str]) -> serde_json::Value {
    let mut responses = serde_json::Map::new();
    for code in codes {
        responses.insert(
            code.to_string(),
            json!({
                "description": "Error",
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            }),
        );
    }
    serde_json::Value::Object(responses)
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn with_errors(mut responses: serde_json::Value, codes: &[&str]) -> serde_json::Value {
    if let (Some(map), serde_json::Value::Object(errors)) =
        (responses.as_object_mut(), error_responses(codes))
    {
        map.extend(errors);
    }
    responses
}

fn openapi_fragment() -> serde_json::Value {
    let book_ref = json!({ "$ref": "#/components/schemas/Book" });
    let record_ref = json!({ "$ref": "#/components/schemas/BorrowRecord" });
    let books = json!({ "type": "array", "items": book_ref.clone() });
    let records = json!({ "type": "array", "items": record_ref.clone() });
    let id_param = json!({
        "name": "id", "in": "path", "required": true, "schema": { "type": "string" }
    });
    let list_params = json!([
        { "name": "q", "in": "query", "schema": { "type": "string" } },
        { "name": "sort", "in": "query", "schema": { "type": "string",
            "enum": ["none", "id", "title", "author", "category", "status", "borrower", "borrowDate"] } },
        { "name": "order", "in": "query", "schema": { "type": "string", "enum": ["asc", "desc"] } }
    ]);
    let mut book_list_params = list_params.clone();
    if let Some(params) = book_list_params.as_array_mut() {
        params.push(json!({
            "name": "view", "in": "query",
            "schema": { "type": "string", "enum": ["all", "available"] }
        }));
    }

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List, search and sort books",
                    "tags": ["Catalog"],
                    "parameters": book_list_params,
                    "responses": with_errors(
                        json!({ "200": json_response("Books", books.clone()) }),
                        &["400"]
                    )
                },
                "post": {
                    "summary": "Add a book",
                    "tags": ["Catalog"],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/AddBook" }
                        } }
                    },
                    "responses": with_errors(
                        json!({ "201": json_response("Created book", book_ref.clone()) }),
                        &["422"]
                    )
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Find a book",
                    "tags": ["Catalog"],
                    "parameters": [id_param.clone()],
                    "responses": with_errors(
                        json!({ "200": json_response("Book", book_ref.clone()) }),
                        &["404"]
                    )
                },
                "delete": {
                    "summary": "Delete a book and any outstanding loan",
                    "tags": ["Catalog"],
                    "parameters": [id_param.clone()],
                    "responses": with_errors(
                        json!({ "204": { "description": "Deleted" } }),
                        &["404"]
                    )
                }
            },
            "/{id}/borrow": {
                "post": {
                    "summary": "Borrow a book",
                    "tags": ["Catalog"],
                    "parameters": [id_param.clone()],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": {
                            "schema": { "$ref": "#/components/schemas/BorrowRequest" }
                        } }
                    },
                    "responses": with_errors(
                        json!({ "201": json_response("Borrow record", record_ref) }),
                        &["404", "409", "422"]
                    )
                }
            },
            "/{id}/return": {
                "post": {
                    "summary": "Return a borrowed book",
                    "tags": ["Catalog"],
                    "parameters": [id_param],
                    "responses": with_errors(
                        json!({ "200": json_response("Returned book", book_ref.clone()) }),
                        &["404", "409"]
                    )
                }
            },
            "/borrowed": {
                "get": {
                    "summary": "List outstanding loans, oldest first",
                    "tags": ["Catalog"],
                    "parameters": list_params,
                    "responses": with_errors(
                        json!({ "200": json_response("Loans", records) }),
                        &["400"]
                    )
                }
            },
            "/recent": {
                "get": {
                    "summary": "Books added since startup, latest first",
                    "tags": ["Catalog"],
                    "responses": { "200": json_response("Books", books) }
                }
            },
            "/categories": {
                "get": {
                    "summary": "Category codes and names",
                    "tags": ["Catalog"],
                    "responses": { "200": json_response("Categories", json!({
                        "type": "array",
                        "items": { "type": "object", "properties": {
                            "code": { "type": "string" }, "name": { "type": "string" }
                        } }
                    })) }
                }
            },
            "/health": {
                "get": {
                    "summary": "Catalog health check",
                    "tags": ["Catalog"],
                    "responses": { "200": { "description": "OK",
                        "content": { "text/plain": { "schema": { "type": "string" } } } } }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Category code followed by a running number" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string", "description": "Two-digit category code" },
                        "status": { "type": "string", "enum": ["Available", "Borrowed"] },
                        "borrower": { "type": "string", "nullable": true },
                        "borrowDate": { "type": "string", "nullable": true }
                    },
                    "required": ["id", "title", "author", "category", "status"]
                },
                "BorrowRecord": {
                    "type": "object",
                    "properties": {
                        "bookId": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string" },
                        "borrower": { "type": "string" },
                        "borrowDate": { "type": "string" }
                    },
                    "required": ["bookId", "borrower", "borrowDate"]
                },
                "AddBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string" }
                    },
                    "required": ["title", "author", "category"]
                },
                "BorrowRequest": {
                    "type": "object",
                    "properties": { "borrower": { "type": "string" } },
                    "required": ["borrower"]
                }
            }
        }
    })
}
