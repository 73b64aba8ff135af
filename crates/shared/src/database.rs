//! PostgreSQL 连接池
//!
//! 连接串来自 `[database]` 配置段，可由 `VERIFIER_DATABASE__URL` 或 `.env` 覆盖，
//! 配置目录由 `CONFIG_DIR` 指定（默认 `config/`）。
//! 产品码仓储与批次仓储共享同一个池；核验的条件更新与导入的 ON CONFLICT 插入
//! 都是单条语句，不需要显式事务。

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info, instrument};

use crate::config::DatabaseConfig;
use crate::error::{Result, VerifierError};

/// 核验库连接池
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 按配置建立连接池，acquire 超时取 `connect_timeout_seconds`
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| log_failure("connect", VerifierError::from(e)))?;

        info!("Verifier database pool ready");
        Ok(Self { pool })
    }

    /// 仓储构造时使用的池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 执行 `SELECT 1` 确认池内连接可用
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| log_failure("health_check", VerifierError::from(e)))
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Verifier database pool closed");
    }

    /// 应用 batches / product_codes 表结构
    ///
    /// 迁移文件位于工作区根目录 migrations/，编译期嵌入
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| log_failure("run_migrations", VerifierError::from(e)))?;
        info!("Verifier schema migrations applied");
        Ok(())
    }
}

fn log_failure(operation: &'static str, err: VerifierError) -> VerifierError {
    error!(operation, code = err.code(), error = %err, "Database operation failed");
    err
}

impl std::ops::Deref for Database {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
