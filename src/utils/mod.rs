//! Project-specific utilities live here.

use uuid::Uuid;

/// Unguessable one-time token for password reset links.
pub fn generate_reset_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Parse an id from a path segment; anything that is not a positive integer
/// cannot name a stored record.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
