//! API models for request and response payloads

use serde::Serialize;

pub mod movie;

pub use movie::{Movie, MovieQuery, YearQuery};

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub store: &'static str,
}
