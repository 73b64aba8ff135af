//! 产品码仓储（PostgreSQL）
//!
//! 核验与导入各自只用一条 SQL 完成，依赖数据库的行级原子性与唯一约束，
//! 不在进程内加锁。

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::traits::CodeRepositoryTrait;
use crate::error::Result;
use crate::models::{CodeStatus, CodeVerification, ProductCode};

/// 产品码仓储
pub struct CodeRepository {
    pool: PgPool,
}

impl CodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CodeRepositoryTrait for CodeRepository {
    /// 条件更新
    ///
    /// WHERE 子句同时匹配码与 unused 状态，并发请求中只有一个能命中该行
    #[instrument(skip(self, verification), fields(code = %verification.code))]
    async fn mark_used(&self, verification: &CodeVerification) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE product_codes
            SET status = $1,
                mobile = $2,
                purchase_source = $3,
                verified_at = $4
            WHERE code = $5 AND status = $6
            "#,
        )
        .bind(CodeStatus::Used)
        .bind(&verification.mobile)
        .bind(&verification.purchase_source)
        .bind(verification.verified_at)
        .bind(&verification.code)
        .bind(CodeStatus::Unused)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 插入未使用码，码冲突时由唯一约束跳过
    #[instrument(skip(self))]
    async fn insert_if_absent(&self, batch_id: i64, code: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO product_codes (batch_id, code, status, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(batch_id)
        .bind(code)
        .bind(CodeStatus::Unused)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductCode>> {
        let record = sqlx::query_as::<_, ProductCode>(
            r#"
            SELECT id, batch_id, code, status, mobile, purchase_source,
                   verified_at, created_at
            FROM product_codes
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn count_codes_in_batch(&self, batch_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM product_codes WHERE batch_id = $1")
                .bind(batch_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
