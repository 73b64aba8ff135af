//! 服务层数据传输对象
//!
//! 请求层把表单解析为请求对象交给服务，服务返回可直接渲染的消息对象。

use serde::{Deserialize, Serialize};

/// 面向用户的提示文案
pub mod messages {
    pub const FILL_ALL_REQUIRED_FIELDS: &str = "Please fill all required fields.";
    pub const INVALID_MOBILE: &str = "Please enter a valid 10-digit mobile number.";
    pub const CODE_UNAVAILABLE: &str = "This code is invalid or already verified.";
    pub const VERIFIED: &str = "Product verified successfully!";
    pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";
    pub const BATCH_CREATION_FAILED: &str = "Failed to create batch";
}

/// 核验请求（表单字段，未做任何清洗）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub purchase_source: String,
}

impl VerifyRequest {
    pub fn new(
        code: impl Into<String>,
        mobile: impl Into<String>,
        purchase_source: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            mobile: mobile.into(),
            purchase_source: purchase_source.into(),
        }
    }
}

/// 公共页面的核验结果
///
/// 首次打开页面时两个字段都为 null
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub message: Option<String>,
    pub success: Option<bool>,
}

impl VerifyOutcome {
    /// 未提交时的页面状态
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            success: Some(true),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            success: Some(false),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// 管理页面的消息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminMessage {
    pub message: Option<String>,
}

impl AdminMessage {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// 批次导入结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub batch_id: i64,
    pub batch_name: String,
    pub total_rows: usize,
    /// 实际写入的码数量（不含重复）
    pub inserted_count: usize,
    /// 因全局重复被跳过的行
    pub duplicate_count: usize,
    /// 缺少 Code 列、为空或无法转为字符串的行
    pub unparseable_count: usize,
    /// 单行存储失败的行（已记录日志，不中断导入）
    pub failed_count: usize,
}

impl ImportReport {
    pub(crate) fn new(batch_id: i64, batch_name: impl Into<String>, total_rows: usize) -> Self {
        Self {
            batch_id,
            batch_name: batch_name.into(),
            total_rows,
            inserted_count: 0,
            duplicate_count: 0,
            unparseable_count: 0,
            failed_count: 0,
        }
    }

    /// 管理页面展示的文案，包含写入数量与批次名
    pub fn message(&self) -> String {
        format!(
            "{} codes uploaded to \"{}\"",
            self.inserted_count, self.batch_name
        )
    }
}
