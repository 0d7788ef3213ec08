use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A named grouping of forum content with independent publication and
/// completion flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Series {
    /// `None` until the series is first saved
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    /// Text for the page's `<meta name="description">`
    pub metadescription: String,
    pub is_published: bool,
    pub is_completed: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Series {
    /// New, unsaved series: unpublished and not completed.
    pub fn from_title_description_and_meta(
        title: impl Into<String>,
        description: impl Into<String>,
        metadescription: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            metadescription: metadescription.into(),
            is_published: false,
            is_completed: false,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_unsaved_draft() {
        let series = Series::from_title_description_and_meta("Rust", "Dal base", "Impara Rust");

        assert_eq!(series.id, None);
        assert_eq!(series.title, "Rust");
        assert_eq!(series.metadescription, "Impara Rust");
        assert!(!series.is_published);
        assert!(!series.is_completed);
    }
}
