//! 核验服务错误类型
//!
//! 定义服务层的业务错误和系统错误。
//! 面向用户的文案由 [`CodeError::user_message`] 统一给出，系统错误只返回通用提示。

use thiserror::Error;

use crate::service::dto::messages;

/// 核验服务错误类型
#[derive(Debug, Error)]
pub enum CodeError {
    // === 输入校验 ===
    /// 消息原样展示给用户
    #[error("{0}")]
    Validation(String),

    // === 业务错误 ===
    /// 码不存在或已被核验，两种情况对调用方不可区分
    #[error("码不可用（不存在或已核验）")]
    CodeUnavailable,

    #[error("批次创建失败: {0}")]
    BatchCreationFailed(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("存储调用超时: {operation}")]
    StorageTimeout { operation: String },
}

/// 核验服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CodeError>;

impl CodeError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::CodeUnavailable | Self::BatchCreationFailed(_)
        )
    }

    /// 获取错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::CodeUnavailable => "CODE_UNAVAILABLE",
            Self::BatchCreationFailed(_) => "BATCH_CREATION_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::StorageTimeout { .. } => "STORAGE_TIMEOUT",
        }
    }

    /// 面向用户的提示文案
    ///
    /// 系统错误统一返回通用提示，详细信息仅记录日志，防止信息泄露
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::CodeUnavailable => messages::CODE_UNAVAILABLE.to_string(),
            Self::BatchCreationFailed(_) => messages::BATCH_CREATION_FAILED.to_string(),
            Self::Database(_) | Self::StorageTimeout { .. } => {
                messages::SOMETHING_WENT_WRONG.to_string()
            }
        }
    }
}
