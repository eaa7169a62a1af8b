use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use auth::{CredentialConfig, JwtConfig, JwtService, StaticCredentialStore};
use common::database::{self, DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::{
    config::{ServerConfig, StoreBackend},
    repositories::{InMemoryMovieStore, MovieStore, PgMovieStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Starting movie catalog API");

    let server_config = ServerConfig::load()?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    let credential_store = StaticCredentialStore::from_config(&CredentialConfig::from_env())?;
    let movie_store = init_movie_store(&server_config).await?;

    let app_state = AppState {
        movie_store,
        jwt_service,
        credential_store: Arc::new(credential_store),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Movie catalog API listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn init_movie_store(config: &ServerConfig) -> Result<Arc<dyn MovieStore>> {
    match config.store {
        StoreBackend::Memory => {
            info!(seeded = config.seed, "Using in-memory movie store");
            let store = if config.seed {
                InMemoryMovieStore::seeded()
            } else {
                InMemoryMovieStore::new()
            };
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let store = PgMovieStore::new(pool);
            store.migrate().await?;
            info!("Using PostgreSQL movie store");
            Ok(Arc::new(store))
        }
    }
}
