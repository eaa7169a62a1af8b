//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured and
//! accessible from the application. They only run when `DATABASE_URL` is set.

use common::database::{DatabaseConfig, Migration, apply_migrations, health_check, init_pool};
use sqlx::Row;

const PROBE_TABLE: Migration = Migration {
    id: "000_probe",
    up: r#"
        CREATE TABLE IF NOT EXISTS infrastructure_probe (
            id BIGSERIAL PRIMARY KEY,
            label TEXT NOT NULL
        );
    "#,
};

#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping database integration test");
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    // Applying twice must be harmless
    apply_migrations(&pool, &[PROBE_TABLE]).await?;
    apply_migrations(&pool, &[PROBE_TABLE]).await?;

    let label: String =
        sqlx::query_scalar("INSERT INTO infrastructure_probe (label) VALUES ($1) RETURNING label")
            .bind("integration")
            .fetch_one(&pool)
            .await?;
    assert_eq!(label, "integration");

    sqlx::query("DROP TABLE infrastructure_probe")
        .execute(&pool)
        .await?;

    Ok(())
}
