//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Batch, CodeVerification, ProductCode};

/// 产品码仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeRepositoryTrait: Send + Sync {
    /// 条件更新：仅当码存在且为 Unused 时，原子地写入 Used 及核验信息
    ///
    /// 返回是否命中。码不存在与已使用均返回 false，调用方无法区分
    async fn mark_used(&self, verification: &CodeVerification) -> Result<bool>;

    /// 以 Unused 状态插入码；码已存在（任意批次）时不做任何修改并返回 false
    async fn insert_if_absent(&self, batch_id: i64, code: &str) -> Result<bool>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ProductCode>>;
    async fn count_codes_in_batch(&self, batch_id: i64) -> Result<i64>;
}

/// 批次仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchRepositoryTrait: Send + Sync {
    async fn create_batch(&self, batch_name: &str) -> Result<Batch>;
    async fn get_batch(&self, id: i64) -> Result<Option<Batch>>;
}
