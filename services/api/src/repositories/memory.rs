//! In-memory movie store

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use tracing::{info, warn};

use super::{MovieStore, StoreError, StoreResult};
use crate::models::Movie;

/// Movies held in process memory behind a single mutex
///
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryMovieStore {
    movies: Mutex<BTreeMap<i64, Movie>>,
}

impl InMemoryMovieStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `movies`
    ///
    /// Movies without an id get the next free one; a later movie with an id
    /// already present replaces the earlier one. Movies without an id are
    /// skipped once `i64::MAX` is taken.
    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut map = BTreeMap::new();
        for movie in movies {
            let Some(id) = movie.id.or_else(|| next_id(&map)) else {
                warn!(title = %movie.title, "No movie id left, skipping");
                continue;
            };
            map.insert(id, movie.with_id(id));
        }

        Self {
            movies: Mutex::new(map),
        }
    }

    /// Create a store holding the two demo movies
    pub fn seeded() -> Self {
        Self::with_movies(demo_movies())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<i64, Movie>>> {
        self.movies.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// One past the highest id, or `None` when the highest id is `i64::MAX`
fn next_id(movies: &BTreeMap<i64, Movie>) -> Option<i64> {
    match movies.keys().next_back() {
        Some(last) => last.checked_add(1),
        None => Some(1),
    }
}

/// Catalog entries available when the server starts without a database
pub fn demo_movies() -> Vec<Movie> {
    vec![
        Movie {
            id: Some(1),
            title: "The Shawshank Redemption".to_string(),
            overview: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.".to_string(),
            year: 1994,
            rating: 9.3,
            category: "Drama".to_string(),
        },
        Movie {
            id: Some(2),
            title: "The Godfather".to_string(),
            overview: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.".to_string(),
            year: 1972,
            rating: 9.2,
            category: "Crime".to_string(),
        },
    ]
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.lock().is_ok())
    }

    async fn list_all(&self) -> StoreResult<Vec<Movie>> {
        info!("Getting all movies");
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Getting movie by id");
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Movie>> {
        info!(year, "Getting movies by year");
        Ok(self
            .lock()?
            .values()
            .filter(|movie| movie.year == year)
            .cloned()
            .collect())
    }

    async fn create(&self, movie: Movie) -> StoreResult<Movie> {
        let mut movies = self.lock()?;
        let id = match movie.id {
            Some(id) if movies.contains_key(&id) => return Err(StoreError::Conflict(id)),
            Some(id) => id,
            None => next_id(&movies).ok_or(StoreError::IdsExhausted)?,
        };

        info!(movie_id = id, "Creating movie");
        let movie = movie.with_id(id);
        movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: i64, movie: Movie) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Updating movie");
        let mut movies = self.lock()?;
        let Some(slot) = movies.get_mut(&id) else {
            return Ok(None);
        };

        *slot = movie.with_id(id);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Deleting movie");
        Ok(self.lock()?.remove(&id))
    }
}
