//! 产品码模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CodeStatus;

/// 产品码记录
///
/// mobile / purchase_source / verified_at 在核验前为空，核验时与状态一起写入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductCode {
    pub id: i64,
    pub batch_id: i64,
    pub code: String,
    pub status: CodeStatus,
    pub mobile: Option<String>,
    pub purchase_source: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProductCode {
    /// 新导入的未使用码
    pub fn unused(id: i64, batch_id: i64, code: impl Into<String>) -> Self {
        Self {
            id,
            batch_id,
            code: code.into(),
            status: CodeStatus::Unused,
            mobile: None,
            purchase_source: None,
            verified_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_used(&self) -> bool {
        self.status == CodeStatus::Used
    }

    /// 将核验信息应用到记录上
    ///
    /// 仅在记录为 Unused 时生效，返回是否发生了转换
    pub fn apply_verification(&mut self, verification: &CodeVerification) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = CodeStatus::Used;
        self.mobile = Some(verification.mobile.clone());
        self.purchase_source = Some(verification.purchase_source.clone());
        self.verified_at = Some(verification.verified_at);
        true
    }
}

/// 一次核验写入的数据（已校验、已去除首尾空白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeVerification {
    pub code: String,
    pub mobile: String,
    pub purchase_source: String,
    pub verified_at: DateTime<Utc>,
}
