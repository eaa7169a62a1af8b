//! Movie storage
//!
//! Handlers talk to storage only through [`MovieStore`]. Two implementations
//! exist: [`InMemoryMovieStore`] for running without a database and
//! [`PgMovieStore`] for PostgreSQL.

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;

use crate::models::Movie;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMovieStore;
pub use postgres::PgMovieStore;

/// Errors raised by a movie store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A movie with the requested id already exists
    #[error("Movie with id {0} already exists")]
    Conflict(i64),

    /// No id is left above the highest stored one
    #[error("No movie ids left to assign")]
    IdsExhausted,

    /// The in-memory store's lock was poisoned by a panicking writer
    #[error("Movie store lock poisoned")]
    Poisoned,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// The operations the movie handlers need from storage
///
/// Every operation touches at most one record, except the listings.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// Whether the backing storage is reachable
    async fn health_check(&self) -> StoreResult<bool>;

    /// All movies in ascending id order
    async fn list_all(&self) -> StoreResult<Vec<Movie>>;

    /// The movie with `id`, if any
    async fn get(&self, id: i64) -> StoreResult<Option<Movie>>;

    /// All movies released in `year`
    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Movie>>;

    /// Store a new movie, keeping its id when given and assigning one otherwise
    async fn create(&self, movie: Movie) -> StoreResult<Movie>;

    /// Replace every field of the movie with `id`; `None` when absent
    async fn update(&self, id: i64, movie: Movie) -> StoreResult<Option<Movie>>;

    /// Remove and return the movie with `id`; `None` when absent
    async fn delete(&self, id: i64) -> StoreResult<Option<Movie>>;
}
