use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use italia_http::{FlashRedirect, ValidatedForm};
use italia_kernel::{Migration, Module};

use crate::repositories::{PasswordResetRepository, UserRepository};
use crate::services::{ResetPassword, ResetPasswordError};

const WRONG_EMAIL_OR_TOKEN: &str = "L'indirizzo email o il token non sono corretti.";
const RESET_FAILED: &str = "Non è stato possibile reimpostare la password. Riprovare.";
const RESET_DONE: &str = "La password è stata reimpostata correttamente.";

#[derive(Clone)]
struct AccountsState {
    users: UserRepository,
    password_resets: PasswordResetRepository,
}

/// User accounts and the password reset workflow
pub struct AccountsModule {
    state: AccountsState,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(email(message = "Inserire un indirizzo email valido."))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub token: String,
    #[validate(length(min = 8, message = "La password deve contenere almeno 8 caratteri."))]
    #[serde(skip_serializing)]
    pub password: String,
}

#[async_trait]
impl Module for AccountsModule {
    fn name(&self) -> &'static str {
        "accounts"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/password/reset", post(reset_password))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<Value> {
        Some(json!({
            "paths": {
                "/password/reset": {
                    "post": {
                        "summary": "Reset a password with a one-time token",
                        "tags": ["Accounts"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/ResetPasswordForm" }
                                }
                            }
                        },
                        "responses": {
                            "302": {
                                "description": "Redirect to /login on success, back to the reset form otherwise",
                                "content": {
                                    "application/json": { "schema": { "$ref": "#/components/schemas/FlashRedirect" } }
                                }
                            },
                            "422": {
                                "description": "Validation error",
                                "content": {
                                    "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "ResetPasswordForm": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "token": { "type": "string" },
                            "password": { "type": "string", "minLength": 8 }
                        },
                        "required": ["email", "token", "password"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_users",
                up: r#"
                    CREATE TABLE users (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        email TEXT NOT NULL UNIQUE,
                        password TEXT NOT NULL
                    );
                    "#,
            },
            Migration {
                id: "002_password_resets",
                up: r#"
                    CREATE TABLE password_resets (
                        email TEXT NOT NULL,
                        token TEXT NOT NULL,
                        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                    );
                    CREATE INDEX password_resets_email ON password_resets (email);
                    "#,
            },
        ]
    }
}

async fn reset_password(
    State(state): State<AccountsState>,
    ValidatedForm(form): ValidatedForm<ResetPasswordForm>,
) -> FlashRedirect {
    let back = if form.token.chars().all(|c| c.is_ascii_alphanumeric()) {
        FlashRedirect::to(format!("/password/reset/{}", form.token))
    } else {
        FlashRedirect::to("/password/reset")
    };

    let user = match state.users.find_by_email(&form.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return back.error(WRONG_EMAIL_OR_TOKEN).with_input(&form),
        Err(err) => {
            tracing::error!(error = %err, "user lookup failed");
            return back.error(RESET_FAILED).with_input(&form);
        }
    };

    match ResetPassword::new(user, form.token.as_str(), form.password.as_str())
        .handle(&state.users, &state.password_resets)
        .await
    {
        Ok(_) => FlashRedirect::to("/login").success(RESET_DONE),
        Err(ResetPasswordError::WrongEmailOrToken) => {
            back.error(WRONG_EMAIL_OR_TOKEN).with_input(&form)
        }
        Err(err) => {
            tracing::error!(error = %err, "password reset failed");
            back.error(RESET_FAILED).with_input(&form)
        }
    }
}

pub fn create_module(users: UserRepository, password_resets: PasswordResetRepository) -> Arc<dyn Module> {
    Arc::new(AccountsModule {
        state: AccountsState {
            users,
            password_resets,
        },
    })
}
