//! Authorization guards for back-office routes.
//!
//! Callers authenticate with `Authorization: Bearer <token>`; tokens are
//! granted in configuration (`auth.tokens`). A guarded router rejects requests
//! without a known token (`401`) or whose principal lacks the required role
//! (`403`), and hands the resolved [`Principal`] to handlers as an extension.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    Router,
};

use italia_http::AppError;
use italia_kernel::settings::{AuthSettings, TokenGrant};

/// Role required by every `/admin` route
pub const ADMINISTRATOR: &str = "administrator";

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Resolves bearer tokens to principals
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: Arc<HashMap<String, Principal>>,
}

impl TokenAuthenticator {
    pub fn new(grants: impl IntoIterator<Item = TokenGrant>) -> Self {
        let tokens = grants
            .into_iter()
            .map(|grant| {
                (
                    grant.token,
                    Principal {
                        subject: grant.subject,
                        roles: grant.roles,
                    },
                )
            })
            .collect();
        Self {
            tokens: Arc::new(tokens),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        if settings.tokens.is_empty() {
            tracing::warn!("no auth tokens configured; guarded routes will reject every request");
        }
        Self::new(settings.tokens.iter().cloned())
    }

    pub fn authenticate(&self, token: &str) -> Option<&Principal> {
        self.tokens.get(token)
    }
}

#[derive(Clone)]
struct Guard {
    authenticator: TokenAuthenticator,
    role: &'static str,
}

/// Guard every route of `router` behind `role`
pub fn require_role(router: Router, authenticator: TokenAuthenticator, role: &'static str) -> Router {
    router.route_layer(middleware::from_fn_with_state(
        Guard {
            authenticator,
            role,
        },
        guard,
    ))
}

async fn guard(
    State(guard): State<Guard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(principal) = token.and_then(|token| guard.authenticator.authenticate(token)) else {
        return Err(AppError::unauthorized("a valid bearer token is required"));
    };

    if !principal.has_role(guard.role) {
        tracing::warn!(subject = %principal.subject, role = guard.role, "principal lacks required role");
        return Err(AppError::forbidden(format!("the '{}' role is required", guard.role)));
    }

    request.extensions_mut().insert(principal.clone());
    Ok(next.run(request).await)
}
