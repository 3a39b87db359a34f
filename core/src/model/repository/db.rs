use color_eyre::eyre::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

pub type DbPool = SqlitePool;

/// Open the sqlite database at `db_url`, creating it if necessary, and run
/// pending migrations.
pub async fn open_db_pool(db_url: &str) -> Result<DbPool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .wrap_err("could not create database")?;
    }
    let pool = SqlitePool::connect(db_url)
        .await
        .wrap_err("could not connect to database")?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .wrap_err("could not run database migrations")?;
    Ok(())
}
