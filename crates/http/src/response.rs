//! Response types for back-office controllers: flash-carrying redirects and
//! view envelopes.
//!
//! Templates and session storage live outside this service, so a redirect
//! carries its flash message in the response itself (`x-flash-key` header and
//! JSON body) and a "view" is the view name plus the data it would render.

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Header naming the flash key carried by a redirect.
pub const FLASH_KEY_HEADER: HeaderName = HeaderName::from_static("x-flash-key");

/// Flash message severity, serialized under the key the next page reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn key(self) -> &'static str {
        match self {
            FlashKind::Success => "success_message",
            FlashKind::Error => "error_message",
        }
    }
}

/// A one-time status message surviving a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// `302 Found` redirect carrying a flash message and, optionally, the input
/// the user submitted so the target form can be refilled.
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    location: String,
    flash: Option<Flash>,
    old_input: Option<Value>,
}

impl FlashRedirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: None,
            old_input: None,
        }
    }

    pub fn success(self, message: impl Into<String>) -> Self {
        self.with_flash(FlashKind::Success, message)
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.with_flash(FlashKind::Error, message)
    }

    fn with_flash(mut self, kind: FlashKind, message: impl Into<String>) -> Self {
        self.flash = Some(Flash {
            kind,
            message: message.into(),
        });
        self
    }

    /// Keep the submitted input for the next request.
    pub fn with_input<T: Serialize>(mut self, input: &T) -> Self {
        self.old_input = serde_json::to_value(input).ok();
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let Ok(location) = HeaderValue::from_str(&self.location) else {
            tracing::error!(location = %self.location, "redirect target is not a valid header value");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut body = Map::new();
        body.insert("redirect_to".to_string(), json!(self.location));
        if let Some(flash) = &self.flash {
            let mut entry = Map::new();
            entry.insert(flash.kind.key().to_string(), json!(flash.message));
            body.insert("flash".to_string(), Value::Object(entry));
        }
        if let Some(old_input) = self.old_input {
            body.insert("old_input".to_string(), old_input);
        }

        let mut response = (StatusCode::FOUND, Json(Value::Object(body))).into_response();
        response.headers_mut().insert(header::LOCATION, location);
        if let Some(flash) = &self.flash {
            response
                .headers_mut()
                .insert(FLASH_KEY_HEADER, HeaderValue::from_static(flash.kind.key()));
        }
        response
    }
}

/// A named view and the data handed to it.
#[derive(Debug, Clone)]
pub struct View {
    name: &'static str,
    data: Map<String, Value>,
}

impl View {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            data: Map::new(),
        }
    }

    /// Attach a value under `key`; values that fail to serialize become `null`.
    pub fn with<T: Serialize>(mut self, key: &str, value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.data.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Json(json!({ "view": self.name, "data": self.data })).into_response()
    }
}
