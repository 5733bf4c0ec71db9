//! Integration tests for the infrastructure components
//!
//! These tests need a PostgreSQL instance reachable through `DATABASE_URL`
//! and are ignored by default. Run them with `--ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    settings::{DatabaseSettings, SettingsResolver, StaticSettings},
};
use serial_test::serial;

fn migrations_dir() -> String {
    format!("{}/../../migrations", env!("CARGO_MANIFEST_DIR"))
}

#[tokio::test]
#[serial]
#[ignore = "requires a running PostgreSQL"]
async fn test_database_migrations_and_settings() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    health_check(&pool).await?;

    run_migrations(&pool, &migrations_dir()).await?;

    sqlx::query(
        "INSERT INTO site_settings (key, value) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
    )
    .bind("integration_test_model")
    .bind("db-model")
    .execute(&pool)
    .await?;

    let resolver = SettingsResolver::new()
        .with_source(DatabaseSettings::new(pool.clone()))
        .with_source(StaticSettings::new([
            ("integration_test_model", "default-model"),
            ("integration_test_only_default", "kept"),
        ]));

    assert_eq!(
        resolver.resolve("integration_test_model").await.as_deref(),
        Some("db-model"),
        "Database value must override defaults"
    );
    assert_eq!(
        resolver
            .resolve("integration_test_only_default")
            .await
            .as_deref(),
        Some("kept")
    );

    sqlx::query("DELETE FROM site_settings WHERE key = $1")
        .bind("integration_test_model")
        .execute(&pool)
        .await?;

    Ok(())
}
