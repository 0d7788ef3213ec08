use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payload of the add and edit forms.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeriesForm {
    #[validate(length(min = 1, max = 255, message = "Il titolo è obbligatorio."))]
    pub title: String,
    #[validate(length(min = 1, message = "La descrizione è obbligatoria."))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "La meta description è obbligatoria."))]
    pub metadescription: String,
}
