//! Field validation for movie payloads and request parameters
//!
//! Everything here runs in the handlers before the store is touched.

use serde::Serialize;

use crate::models::Movie;

pub const TITLE_MAX_CHARS: usize = 100;
pub const OVERVIEW_MAX_CHARS: usize = 500;
pub const CATEGORY_MAX_CHARS: usize = 50;
pub const YEAR_MIN: i32 = 1900;
pub const YEAR_MAX: i32 = 2100;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate every field of a movie, collecting all violations
pub fn validate_movie(movie: &Movie) -> Result<(), Vec<FieldViolation>> {
    let checks = [
        ("id", movie.id.map_or(Ok(()), validate_id)),
        ("title", validate_text(&movie.title, TITLE_MAX_CHARS)),
        ("overview", validate_text(&movie.overview, OVERVIEW_MAX_CHARS)),
        ("year", validate_year(movie.year)),
        ("rating", validate_rating(movie.rating)),
        ("category", validate_text(&movie.category, CATEGORY_MAX_CHARS)),
    ];

    let violations: Vec<FieldViolation> = checks
        .into_iter()
        .filter_map(|(field, check)| check.err().map(|message| FieldViolation::new(field, message)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate a record id
pub fn validate_id(id: i64) -> Result<(), String> {
    if id < 1 {
        return Err("Must be greater than or equal to 1".to_string());
    }

    Ok(())
}

/// Validate a release year
pub fn validate_year(year: i32) -> Result<(), String> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(format!("Must be between {} and {}", YEAR_MIN, YEAR_MAX));
    }

    Ok(())
}

/// Validate a rating
pub fn validate_rating(rating: f64) -> Result<(), String> {
    if !rating.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(format!("Must be between {} and {}", RATING_MIN, RATING_MAX));
    }

    Ok(())
}

/// Text must hold between 1 and `max` characters
fn validate_text(value: &str, max: usize) -> Result<(), String> {
    let length = value.chars().count();

    if length == 0 {
        return Err("Must not be empty".to_string());
    }

    if length > max {
        return Err(format!("Must be at most {} characters long", max));
    }

    Ok(())
}
