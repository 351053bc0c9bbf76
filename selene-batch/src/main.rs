use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{error, info, Level};

mod api_metrics;
mod config;
mod error;
mod models;

use api_metrics::partition_api_metrics;
use config::Config;
use models::ApiMetricsPartition;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    let partition = ApiMetricsPartition::new(config.partition_date);
    info!("Partitioning api metrics for {}", partition.date);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    match partition_api_metrics(&pool, &partition).await {
        Ok(summary) => {
            info!(
                "Moved {} api metric rows into {}",
                summary.copied,
                partition.table_name()
            );
        }
        Err(e) => {
            error!("Partitioning api metrics for {} failed: {}", partition.date, e);
            pool.close().await;
            return Err(e.into());
        }
    }

    pool.close().await;
    Ok(())
}
