//! 批次模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 码批次
///
/// 由一次导入创建，创建后不可变；名称允许重复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: i64,
    pub batch_name: String,
    pub created_at: DateTime<Utc>,
}
