use serde::{Deserialize, Serialize};

/// Content classification, looked up by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            slug: slug.into(),
        }
    }
}
