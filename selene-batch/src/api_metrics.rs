use sqlx::{PgConnection, PgPool};

use crate::error::{BatchError, BatchResult};
use crate::models::ApiMetricsPartition;

/// Row counts of one partitioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionSummary {
    pub copied: u64,
    pub removed: u64,
}

pub struct ApiMetricsRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ApiMetricsRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        ApiMetricsRepository { conn }
    }

    pub async fn create_partition(&mut self, partition: &ApiMetricsPartition) -> BatchResult<()> {
        let upper_bound = partition.upper_bound().ok_or_else(|| {
            BatchError::Partition(format!("No day follows {}", partition.date))
        })?;

        // Partition bounds cannot be bound as parameters
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} PARTITION OF metric.api_history \
             FOR VALUES FROM ('{}') TO ('{}')",
            partition.table_name(),
            partition.lower_bound(),
            upper_bound
        );
        sqlx::query(&statement).execute(&mut *self.conn).await?;

        Ok(())
    }

    pub async fn copy_to_partition(&mut self, partition: &ApiMetricsPartition) -> BatchResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO metric.api_history
            SELECT *
            FROM metric.api
            WHERE access_ts::date = $1
            "#,
        )
        .bind(partition.date)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn remove_by_date(&mut self, partition: &ApiMetricsPartition) -> BatchResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM metric.api
            WHERE access_ts::date = $1
            "#,
        )
        .bind(partition.date)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Moves one day of api metrics into its partition. Either every step
/// commits or none does.
pub async fn partition_api_metrics(
    pool: &PgPool,
    partition: &ApiMetricsPartition,
) -> BatchResult<PartitionSummary> {
    let mut tx = pool.begin().await?;

    let summary = {
        let mut repository = ApiMetricsRepository::new(&mut tx);
        repository.create_partition(partition).await?;
        let copied = repository.copy_to_partition(partition).await?;
        let removed = repository.remove_by_date(partition).await?;
        PartitionSummary { copied, removed }
    };

    if summary.copied != summary.removed {
        tx.rollback().await?;
        return Err(BatchError::Partition(format!(
            "Copied {} rows for {} but matched {} for removal",
            summary.copied, partition.date, summary.removed
        )));
    }

    tx.commit().await?;

    Ok(summary)
}
