#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use italia_app::App;
use italia_kernel::settings::{Settings, TokenGrant};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const MEMBER_TOKEN: &str = "member-token";

/// Booted app over a private in-memory database with an administrator and a
/// plain member token.
pub async fn app() -> App {
    let mut settings = Settings::default();
    settings.database.url = "sqlite::memory:".to_string();
    settings.auth.tokens = vec![
        TokenGrant {
            subject: "admin@example.com".to_string(),
            token: ADMIN_TOKEN.to_string(),
            roles: vec!["administrator".to_string()],
        },
        TokenGrant {
            subject: "member@example.com".to_string(),
            token: MEMBER_TOKEN.to_string(),
            roles: vec!["member".to_string()],
        },
    ];

    App::bootstrap(settings).await.unwrap()
}

pub async fn send(app: &App, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.router().oneshot(request).await.unwrap();
    split(response).await
}

async fn split(response: Response<Body>) -> (StatusCode, Option<String>, Value) {
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, location, body)
}

pub fn admin_get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

pub fn admin_post(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn anonymous_post(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn flash<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body["flash"][key].as_str()
}
