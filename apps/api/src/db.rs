use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// One match computation issues a fixed handful of bulk queries, so a small
/// pool covers concurrent requests comfortably.
const MAX_POOL_CONNECTIONS: u32 = 10;

/// Creates the PostgreSQL connection pool shared by the repositories.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(MAX_POOL_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!("PostgreSQL pool ready ({MAX_POOL_CONNECTIONS} max connections)");
    Ok(pool)
}
