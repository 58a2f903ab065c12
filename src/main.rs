use std::sync::Arc;

use stamina::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
  let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .compact()
    .with_env_filter(env_filter)
    .init();

  let pool = stamina::db::initialize_db()
    .await
    .map_err(anyhow::Error::from_boxed)?;
  let state = Arc::new(AppState { db: pool });

  let addr =
    std::env::var("STAMINA_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
  let listener = tokio::net::TcpListener::bind(&addr).await?;
  tracing::info!("stamina: listening on {}", addr);

  axum::serve(listener, router(state)).await?;

  Ok(())
}
