use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

/// Creates the snapshot table and its lookup index if they don't exist.
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS occupancy_snapshot (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            park_no TEXT NOT NULL,
            free_quantity INTEGER NOT NULL,
            total_quantity INTEGER NOT NULL,
            update_time TEXT NOT NULL DEFAULT '',
            recorded_at TEXT NOT NULL,
            UNIQUE(park_no, update_time)
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE INDEX IF NOT EXISTS occupancy_snapshot_lot
            ON occupancy_snapshot (park_no, recorded_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Opens (creating if needed) the history database at `database_url`.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    log::info!("opening history database {database_url}");

    let db_exists = Sqlite::database_exists(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Error checking database: {e}"))?;

    if !db_exists {
        log::info!("creating history database");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to set up database schema: {e}"))?;

    Ok(pool)
}
