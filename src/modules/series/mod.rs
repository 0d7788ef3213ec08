pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::{json, Value};

use italia_authz::{require_role, TokenAuthenticator, ADMINISTRATOR};
use italia_kernel::{InitCtx, Migration, Module};

use crate::repositories::SeriesRepository;

/// Admin management of content series
pub struct SeriesModule {
    repository: SeriesRepository,
    authenticator: TokenAuthenticator,
}

impl SeriesModule {
    pub fn new(repository: SeriesRepository, authenticator: TokenAuthenticator) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl Module for SeriesModule {
    fn name(&self) -> &'static str {
        "series"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "series module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let router = Router::new()
            .route("/admin/series", get(handlers::index))
            .route(
                "/admin/series/add",
                get(handlers::add_form).post(handlers::create),
            )
            .route("/admin/series/publish/{id}", get(handlers::publish))
            .route("/admin/series/unpublish/{id}", get(handlers::unpublish))
            .route("/admin/series/complete/{id}", get(handlers::complete))
            .route("/admin/series/incomplete/{id}", get(handlers::incomplete))
            .route(
                "/admin/series/edit/{id}",
                get(handlers::edit_form).post(handlers::update),
            )
            .route("/admin/series/delete/{id}", get(handlers::delete))
            .with_state(self.repository.clone());

        require_role(router, self.authenticator.clone(), ADMINISTRATOR)
    }

    fn openapi(&self) -> Option<Value> {
        let flag_action = |summary: &str| {
            json!({
                "get": {
                    "summary": summary,
                    "tags": ["Series"],
                    "parameters": [id_parameter()],
                    "responses": { "302": redirect_response() }
                }
            })
        };

        Some(json!({
            "paths": {
                "/admin/series": {
                    "get": {
                        "summary": "List series",
                        "tags": ["Series"],
                        "responses": {
                            "200": view_response("admin.series_index"),
                            "401": error_response("Missing or unknown bearer token"),
                            "403": error_response("Administrator role required")
                        }
                    }
                },
                "/admin/series/add": {
                    "get": {
                        "summary": "Add series form",
                        "tags": ["Series"],
                        "responses": { "200": view_response("admin.series_add") }
                    },
                    "post": {
                        "summary": "Create a series",
                        "tags": ["Series"],
                        "requestBody": form_body(),
                        "responses": {
                            "302": redirect_response(),
                            "422": error_response("Validation error")
                        }
                    }
                },
                "/admin/series/publish/{id}": flag_action("Publish a series"),
                "/admin/series/unpublish/{id}": flag_action("Withdraw a series from publication"),
                "/admin/series/complete/{id}": flag_action("Mark a series as completed"),
                "/admin/series/incomplete/{id}": flag_action("Mark a series as not completed"),
                "/admin/series/edit/{id}": {
                    "get": {
                        "summary": "Edit series form",
                        "tags": ["Series"],
                        "parameters": [id_parameter()],
                        "responses": {
                            "200": view_response("admin.series_edit"),
                            "302": redirect_response()
                        }
                    },
                    "post": {
                        "summary": "Update a series",
                        "tags": ["Series"],
                        "parameters": [id_parameter()],
                        "requestBody": form_body(),
                        "responses": {
                            "302": redirect_response(),
                            "422": error_response("Validation error")
                        }
                    }
                },
                "/admin/series/delete/{id}": flag_action("Delete a series")
            },
            "components": {
                "schemas": {
                    "Series": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "metadescription": { "type": "string" },
                            "is_published": { "type": "boolean" },
                            "is_completed": { "type": "boolean" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "description", "metadescription", "is_published", "is_completed"]
                    },
                    "SeriesForm": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1, "maxLength": 255 },
                            "description": { "type": "string", "minLength": 1 },
                            "metadescription": { "type": "string", "minLength": 1, "maxLength": 255 }
                        },
                        "required": ["title", "description", "metadescription"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE series (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL CHECK (length(title) > 0),
                    description TEXT NOT NULL,
                    metadescription TEXT NOT NULL,
                    is_published BOOLEAN NOT NULL DEFAULT FALSE,
                    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "series module started");
        Ok(())
    }
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer" }
    })
}

fn redirect_response() -> Value {
    json!({
        "description": "Redirect carrying a success_message or error_message flash",
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/FlashRedirect" } }
        }
    })
}

fn view_response(view: &str) -> Value {
    json!({ "description": format!("The {view} view with its data") })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
        }
    })
}

fn form_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/x-www-form-urlencoded": {
                "schema": { "$ref": "#/components/schemas/SeriesForm" }
            }
        }
    })
}

pub fn create_module(
    repository: SeriesRepository,
    authenticator: TokenAuthenticator,
) -> Arc<dyn Module> {
    Arc::new(SeriesModule::new(repository, authenticator))
}
