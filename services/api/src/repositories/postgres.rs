//! PostgreSQL movie store

use async_trait::async_trait;
use common::{
    database::{self, Migration, apply_migrations},
    error::{DatabaseError, DatabaseResult},
};
use sqlx::PgPool;
use tracing::{info, warn};

use super::{MovieStore, StoreError, StoreResult};
use crate::models::Movie;

/// Schema for the movies table
pub const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_create_movies",
    up: r#"
        CREATE TABLE IF NOT EXISTS movies (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(100) NOT NULL,
            overview VARCHAR(500) NOT NULL,
            year INTEGER NOT NULL,
            rating DOUBLE PRECISION NOT NULL,
            category VARCHAR(50) NOT NULL
        );
        CREATE INDEX IF NOT EXISTS movies_year_idx ON movies (year);
    "#,
}];

/// Movie repository backed by the `movies` table
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the movies table if it does not exist
    pub async fn migrate(&self) -> DatabaseResult<()> {
        apply_migrations(&self.pool, MIGRATIONS).await
    }

    async fn insert_with_id(&self, id: i64, movie: &Movie) -> Result<Movie, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (id, title, overview, year, rating, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, overview, year, rating, category
            "#,
        )
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(movie.year)
        .bind(movie.rating)
        .bind(&movie.category)
        .fetch_one(&mut *tx)
        .await?;

        // Keep generated ids ahead of explicitly inserted ones.
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('movies', 'id'), (SELECT MAX(id) FROM movies))",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn insert_generated(&self, movie: &Movie) -> Result<Movie, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, overview, year, rating, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, overview, year, rating, category
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(movie.year)
        .bind(movie.rating)
        .bind(&movie.category)
        .fetch_one(&self.pool)
        .await
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(database::health_check(&self.pool).await?)
    }

    async fn list_all(&self) -> StoreResult<Vec<Movie>> {
        info!("Getting all movies");

        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, overview, year, rating, category
            FROM movies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(movies)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Getting movie by id");

        let movie = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, overview, year, rating, category
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(movie)
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<Vec<Movie>> {
        info!(year, "Getting movies by year");

        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, overview, year, rating, category
            FROM movies
            WHERE year = $1
            ORDER BY id
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(movies)
    }

    async fn create(&self, movie: Movie) -> StoreResult<Movie> {
        info!(movie_id = ?movie.id, "Creating movie");

        match movie.id {
            Some(id) => self.insert_with_id(id, &movie).await.map_err(|e| {
                let err = DatabaseError::Query(e);
                if err.is_unique_violation() {
                    StoreError::Conflict(id)
                } else {
                    err.into()
                }
            }),
            None => match self
                .insert_generated(&movie)
                .await
                .map_err(DatabaseError::Query)
            {
                Err(err) if err.is_unique_violation() => {
                    // A concurrent explicit-id insert took the next sequence
                    // value before advancing the sequence; draw again.
                    warn!("Generated movie id collided, retrying once");
                    Ok(self
                        .insert_generated(&movie)
                        .await
                        .map_err(DatabaseError::Query)?)
                }
                other => Ok(other?),
            },
        }
    }

    async fn update(&self, id: i64, movie: Movie) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Updating movie");

        let updated = sqlx::query_as::<_, Movie>(
            r#"
            UPDATE movies
            SET title = $2, overview = $3, year = $4, rating = $5, category = $6
            WHERE id = $1
            RETURNING id, title, overview, year, rating, category
            "#,
        )
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(movie.year)
        .bind(movie.rating)
        .bind(&movie.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Movie>> {
        info!(movie_id = id, "Deleting movie");

        let deleted = sqlx::query_as::<_, Movie>(
            r#"
            DELETE FROM movies
            WHERE id = $1
            RETURNING id, title, overview, year, rating, category
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(deleted)
    }
}
