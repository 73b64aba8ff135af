//! 内存存储
//!
//! 与 PostgreSQL 仓储实现同一组接口，用于本地开发与测试。
//! 每个操作在单次写锁内完成“匹配 + 修改”，等价于数据库的条件更新与唯一约束。

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::traits::{BatchRepositoryTrait, CodeRepositoryTrait};
use crate::error::Result;
use crate::models::{Batch, CodeVerification, ProductCode};

/// 内存存储
///
/// 同时实现批次与产品码仓储，码以字符串为键保证全局唯一
#[derive(Debug, Default)]
pub struct MemoryCodeStore {
    codes: RwLock<HashMap<String, ProductCode>>,
    batches: RwLock<HashMap<i64, Batch>>,
    next_code_id: AtomicI64,
    next_batch_id: AtomicI64,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前存储的码总数
    pub async fn code_count(&self) -> usize {
        self.codes.read().await.len()
    }

    /// 当前存储的批次总数
    pub async fn batch_count(&self) -> usize {
        self.batches.read().await.len()
    }
}

#[async_trait]
impl CodeRepositoryTrait for MemoryCodeStore {
    async fn mark_used(&self, verification: &CodeVerification) -> Result<bool> {
        let mut codes = self.codes.write().await;
        Ok(codes
            .get_mut(&verification.code)
            .is_some_and(|record| record.apply_verification(verification)))
    }

    async fn insert_if_absent(&self, batch_id: i64, code: &str) -> Result<bool> {
        let mut codes = self.codes.write().await;
        if codes.contains_key(code) {
            return Ok(false);
        }

        let id = self.next_code_id.fetch_add(1, Ordering::SeqCst) + 1;
        codes.insert(code.to_string(), ProductCode::unused(id, batch_id, code));
        Ok(true)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductCode>> {
        Ok(self.codes.read().await.get(code).cloned())
    }

    async fn count_codes_in_batch(&self, batch_id: i64) -> Result<i64> {
        let count = self
            .codes
            .read()
            .await
            .values()
            .filter(|c| c.batch_id == batch_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl BatchRepositoryTrait for MemoryCodeStore {
    async fn create_batch(&self, batch_name: &str) -> Result<Batch> {
        let id = self.next_batch_id.fetch_add(1, Ordering::SeqCst) + 1;
        let batch = Batch {
            id,
            batch_name: batch_name.to_string(),
            created_at: Utc::now(),
        };
        self.batches.write().await.insert(id, batch.clone());
        Ok(batch)
    }

    async fn get_batch(&self, id: i64) -> Result<Option<Batch>> {
        Ok(self.batches.read().await.get(&id).cloned())
    }
}
