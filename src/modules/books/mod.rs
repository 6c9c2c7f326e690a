pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{settings::Settings, InitCtx, Module};

use service::BookService;

/// Books module: the reading list and its JSON file
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.service.len().await;
        tracing::info!(
            module = self.name(),
            environment = %ctx.settings.environment,
            storage = %ctx.settings.storage.path.display(),
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = json!({
            "description": "Book not found",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let fields_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookFields" }
                }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64", "minimum": 1 }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books in stored order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": fields_body.clone(),
                        "responses": {
                            "201": book_response("Created book"),
                            "400": {
                                "description": "Body is not a JSON object",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "put": {
                        "summary": "Update the supplied fields of a book",
                        "tags": ["Books"],
                        "parameters": id_param.clone(),
                        "requestBody": fields_body,
                        "responses": {
                            "200": book_response("Updated book"),
                            "404": error_response.clone()
                        }
                    },
                    "delete": {
                        "summary": "Remove a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": book_response("Removed book"),
                            "404": error_response
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": ["string", "null"] },
                            "author": { "type": ["string", "null"] },
                            "cover": { "type": "string", "description": "Cover image URL" },
                            "rating": { "type": "number" },
                            "pages": { "type": "integer" },
                            "genre": { "type": "string" },
                            "status": { "type": "string", "example": "want-to-read" }
                        },
                        "required": ["id", "title", "author", "cover", "rating", "pages", "genre", "status"]
                    },
                    "BookFields": {
                        "type": "object",
                        "description": "Any subset of book fields. Omitted fields are left unset; null clears title or author and is ignored elsewhere",
                        "properties": {
                            "title": { "type": ["string", "null"] },
                            "author": { "type": ["string", "null"] },
                            "cover": { "type": "string", "default": "" },
                            "rating": { "type": "number", "default": 0 },
                            "pages": { "type": "integer", "default": 0 },
                            "genre": { "type": "string", "default": "" },
                            "status": { "type": "string", "default": "want-to-read" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.service.len().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped"
        );
        Ok(())
    }
}

/// Open the configured collection file and wrap it in the books module.
///
/// A malformed collection file is a startup error.
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    let path = &settings.storage.path;
    let service = BookService::open(path)
        .with_context(|| format!("failed to open book collection at {}", path.display()))?;
    Ok(Arc::new(BooksModule::new(Arc::new(service))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use shelf_kernel::ModuleRegistry;
    use tower::ServiceExt;

    fn settings(dir: &tempfile::TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.storage.path = dir.path().join("books.json");
        settings
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn reading_list_lifecycle_through_server_router() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir);
        let mut registry = ModuleRegistry::new();
        registry.register(create_module(&settings).unwrap());
        let app = shelf_http::build_router(&registry, &settings);

        let (status, created) = send(
            &app,
            "POST",
            "/api/books",
            Some(json!({"title": "Dune", "author": "Herbert"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["status"], "want-to-read");

        let (status, updated) = send(
            &app,
            "PUT",
            "/api/books/1",
            Some(json!({"status": "reading", "rating": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Dune");
        assert_eq!(updated["status"], "reading");
        assert_eq!(updated["rating"], 5.0);

        let (status, _) = send(&app, "DELETE", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, books) = send(&app, "GET", "/api/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(books, json!([]));

        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(&settings.storage.path).unwrap())
                .unwrap();
        assert_eq!(on_disk["books"], json!([]));
        assert_eq!(on_disk["next_id"], 2);
    }

    #[tokio::test]
    async fn openapi_lists_book_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir);
        let mut registry = ModuleRegistry::new();
        registry.register(create_module(&settings).unwrap());
        let app = shelf_http::build_router(&registry, &settings);

        let (status, spec) = send(&app, "GET", "/docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(spec["paths"]["/api/books"]["post"].is_object());
        assert!(spec["paths"]["/api/books/{id}"]["delete"].is_object());
        assert!(spec["components"]["schemas"]["Book"].is_object());
        assert!(spec["components"]["schemas"]["BookFields"].is_object());
    }

    #[test]
    fn book_openapi_fragment_fits_the_typed_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ModuleRegistry::new();
        registry.register(create_module(&settings(&dir)).unwrap());

        let merged = shelf_http::router::openapi_document(&registry);
        let typed: utoipa::openapi::OpenApi = serde_json::from_value(merged).unwrap();
        assert!(typed.paths.paths.contains_key("/api/books"));
        assert!(typed.paths.paths.contains_key("/api/books/{id}"));
        assert!(typed.paths.paths.contains_key("/api/books/health"));
    }

    #[test]
    fn malformed_collection_fails_module_creation() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir);
        std::fs::write(&settings.storage.path, "{\"books\": 3}").unwrap();

        let err = create_module(&settings).err().unwrap();
        assert!(err.to_string().contains("failed to open book collection"));
    }
}
