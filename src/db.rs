use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub type DbPool = SqlitePool;

/// Default owner for a single-profile deployment. Storage functions still
/// take an explicit owner id so multi-profile stays a handler-level change.
pub const DEFAULT_OWNER_ID: i64 = 1;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
}

/// Get the SQLite URL for the database file
/// Path comes from STAMINA_DB_PATH, defaulting to ./stamina.db
fn get_db_url() -> String {
  let path = std::env::var("STAMINA_DB_PATH").unwrap_or_else(|_| "stamina.db".to_string());
  format!("sqlite://{}?mode=rwc", path)
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db() -> Result<DbPool, Box<dyn std::error::Error + Send + Sync>> {
  let db_url = get_db_url();

  tracing::info!("Initializing database at: {}", db_url);

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}
