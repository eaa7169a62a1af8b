//! Movie models for the API service

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Movie record
///
/// `id` is optional on input; the store assigns one when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub overview: String,
    pub year: i32,
    pub rating: f64,
    pub category: String,
}

impl Movie {
    /// The same record carrying `id`
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// Query parameters for movie listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieQuery {
    /// Only return movies released in this year
    pub year: Option<i32>,
}

/// Query parameters for the year search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}
