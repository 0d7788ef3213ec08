use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use italia_authz::{require_role, TokenAuthenticator, ADMINISTRATOR};
use italia_http::{AppError, FlashRedirect, ValidatedForm, View};
use italia_kernel::{Migration, Module};

use crate::domain::Category;
use crate::repositories::CategoryRepository;

const INDEX: &str = "/admin/categories";

/// Admin management of content categories
pub struct CategoriesModule {
    repository: CategoryRepository,
    authenticator: TokenAuthenticator,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100, message = "Il nome è obbligatorio."))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Lo slug è obbligatorio."))]
    pub slug: String,
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn routes(&self) -> Router {
        let router = Router::new()
            .route("/admin/categories", get(index))
            .route("/admin/categories/add", post(create))
            .route("/admin/categories/delete/{slug}", get(delete))
            .with_state(self.repository.clone());

        require_role(router, self.authenticator.clone(), ADMINISTRATOR)
    }

    fn openapi(&self) -> Option<Value> {
        let redirect = json!({
            "description": "Redirect carrying a success_message or error_message flash",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/FlashRedirect" } }
            }
        });

        Some(json!({
            "paths": {
                "/admin/categories": {
                    "get": {
                        "summary": "List categories",
                        "tags": ["Categories"],
                        "responses": { "200": { "description": "The admin.categories_index view" } }
                    }
                },
                "/admin/categories/add": {
                    "post": {
                        "summary": "Create a category",
                        "tags": ["Categories"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/CategoryForm" }
                                }
                            }
                        },
                        "responses": { "302": redirect }
                    }
                },
                "/admin/categories/delete/{slug}": {
                    "get": {
                        "summary": "Delete a category",
                        "tags": ["Categories"],
                        "parameters": [{
                            "name": "slug",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": { "302": redirect }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Category": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "name": { "type": "string" },
                            "slug": { "type": "string" }
                        },
                        "required": ["id", "name", "slug"]
                    },
                    "CategoryForm": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "slug": { "type": "string" }
                        },
                        "required": ["name", "slug"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    slug TEXT NOT NULL
                );
                CREATE UNIQUE INDEX categories_slug_unique ON categories (slug);
                "#,
        }]
    }
}

async fn index(State(repository): State<CategoryRepository>) -> Result<View, AppError> {
    let categories = repository.get_all().await.map_err(AppError::internal)?;
    Ok(View::new("admin.categories_index").with("categories", &categories))
}

async fn create(
    State(repository): State<CategoryRepository>,
    ValidatedForm(form): ValidatedForm<CategoryForm>,
) -> FlashRedirect {
    let mut category = Category::new(form.name.as_str(), form.slug.as_str());

    match repository.save(&mut category).await {
        Ok(()) => FlashRedirect::to(INDEX).success("La categoria è stata aggiunta correttamente."),
        Err(_) => FlashRedirect::to(INDEX)
            .error("Problemi in fase di salvataggio. Riprovare.")
            .with_input(&form),
    }
}

async fn delete(
    State(repository): State<CategoryRepository>,
    Path(slug): Path<String>,
) -> FlashRedirect {
    let category = match repository.find_by_slug(&slug).await {
        Ok(Some(category)) => category,
        Ok(None) => return FlashRedirect::to(INDEX).error("La categoria scelta è stata già rimossa."),
        Err(err) => {
            tracing::error!(%slug, error = %err, "category lookup failed");
            return FlashRedirect::to(INDEX).error("La categoria scelta è stata già rimossa.");
        }
    };

    match repository.delete(&category).await {
        Ok(()) => FlashRedirect::to(INDEX).success("La categoria è stata cancellata correttamente."),
        Err(_) => FlashRedirect::to(INDEX).error("Impossibile cancellare la categoria scelta. Riprovare."),
    }
}

pub fn create_module(
    repository: CategoryRepository,
    authenticator: TokenAuthenticator,
) -> Arc<dyn Module> {
    Arc::new(CategoriesModule {
        repository,
        authenticator,
    })
}
