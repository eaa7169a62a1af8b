//! API service routes

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};

use auth::middleware::auth_middleware;

use crate::{
    error::{ApiError, ApiResult},
    models::{HealthResponse, Movie, MovieQuery, YearQuery},
    state::AppState,
    validation::{validate_id, validate_movie, validate_year},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/movies", get(get_movies).post(create_movie))
        .route("/movies/search", get(search_movies))
        .route(
            "/movies/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            auth_middleware,
        ));

    let auth_routes = auth::create_router(state.auth_state());

    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
        .merge(auth_routes)
}

/// Root endpoint
pub async fn read_root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if !state.movie_store.health_check().await? {
        return Err(ApiError::ServiceUnavailable);
    }

    Ok(Json(HealthResponse {
        status: "ok",
        service: "api-service",
        store: state.movie_store.backend(),
    }))
}

/// List all movies, or those from `?year=`
pub async fn get_movies(
    State(state): State<AppState>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let Query(query) = query?;

    let movies = match query.year {
        Some(year) => movies_by_year(&state, year).await?,
        None => state.movie_store.list_all().await?,
    };

    Ok(Json(movies))
}

/// List the movies from a required `?year=`
pub async fn search_movies(
    State(state): State<AppState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Movie>>> {
    let Query(YearQuery { year }) = query?;
    Ok(Json(movies_by_year(&state, year).await?))
}

async fn movies_by_year(state: &AppState, year: i32) -> ApiResult<Vec<Movie>> {
    validate_year(year).map_err(|message| ApiError::invalid("year", message))?;
    Ok(state.movie_store.list_by_year(year).await?)
}

/// Get a movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let id = movie_id(id)?;

    let movie = state
        .movie_store
        .get(id)
        .await?
        .ok_or_else(ApiError::movie_not_found)?;

    Ok(Json(movie))
}

/// Create a movie
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<Movie>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(movie) = payload?;
    validate_movie(&movie).map_err(ApiError::Validation)?;

    let movie = state.movie_store.create(movie).await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Replace every field of a movie
pub async fn update_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Movie>, JsonRejection>,
) -> ApiResult<Json<Movie>> {
    let id = movie_id(id)?;
    let Json(movie) = payload?;
    validate_movie(&movie).map_err(ApiError::Validation)?;

    let movie = state
        .movie_store
        .update(id, movie)
        .await?
        .ok_or_else(ApiError::movie_not_found)?;

    Ok(Json(movie))
}

/// Delete a movie and return it
pub async fn delete_movie(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Movie>> {
    let id = movie_id(id)?;

    let movie = state
        .movie_store
        .delete(id)
        .await?
        .ok_or_else(ApiError::movie_not_found)?;

    Ok(Json(movie))
}

fn movie_id(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = id?;
    validate_id(id).map_err(|message| ApiError::invalid("id", message))?;
    Ok(id)
}
