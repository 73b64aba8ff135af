//! 批次仓储（PostgreSQL）

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::traits::BatchRepositoryTrait;
use crate::error::Result;
use crate::models::Batch;

/// 批次仓储
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchRepositoryTrait for BatchRepository {
    /// 创建批次，名称允许重复
    #[instrument(skip(self))]
    async fn create_batch(&self, batch_name: &str) -> Result<Batch> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (batch_name, created_at)
            VALUES ($1, NOW())
            RETURNING id, batch_name, created_at
            "#,
        )
        .bind(batch_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(batch)
    }

    async fn get_batch(&self, id: i64) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            SELECT id, batch_name, created_at
            FROM batches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }
}
