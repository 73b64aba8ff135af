//! 业务服务层
//!
//! - `VerificationService`: 码核验（Unused -> Used 的单次原子转换）
//! - `BatchImportService`: 批次导入（创建批次 + 逐行 insert-if-absent）

pub mod dto;
mod import_service;
pub mod validation;
mod verification_service;

pub use import_service::BatchImportService;
pub use verification_service::VerificationService;

use std::future::Future;
use std::time::Duration;

use crate::error::{CodeError, Result};

/// 为单次存储调用加上超时，超时按存储故障处理
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CodeError::StorageTimeout {
            operation: operation.to_string(),
        }),
    }
}
