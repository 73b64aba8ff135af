//! 批次导入服务
//!
//! 把表格解析后的行写入为一个新批次：
//! 1. 创建批次（失败则整体中止，不写任何码）
//! 2. 逐行提取 Code 列，字符串化并去除首尾空白
//! 3. insert-if-absent 写入；全局重复静默跳过，单行失败记录后继续
//!
//! 唯一性由存储层保证，行的处理顺序不影响最终写入的码集合。

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, instrument, warn};
use verifier_shared::observability::metrics;

use super::dto::{AdminMessage, ImportReport};
use super::validation::trim_input;
use super::with_timeout;
use crate::error::{CodeError, Result};
use crate::repository::{BatchRepositoryTrait, CodeRepositoryTrait};

/// 行中码所在的列名
pub const CODE_COLUMN: &str = "Code";

/// 单行 Code 列的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCode {
    /// 字符串化并去除空白后的码
    Code(String),
    /// 没有 Code 列，或列值为空
    Missing,
    /// 列值无法转为字符串（布尔、数组、对象）
    Unparseable,
}

/// 从一行中提取码
///
/// 字符串去除首尾空白与 BOM；数字按表格显示形式字符串化（整数值的浮点数不带小数部分）。
/// 数字 0 视为有效码 "0"，布尔值不是码，计为无法解析。
pub fn extract_code(row: &Value) -> RowCode {
    let Some(value) = row.get(CODE_COLUMN) else {
        return RowCode::Missing;
    };

    let raw = match value {
        Value::Null => return RowCode::Missing,
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_code(n),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return RowCode::Unparseable,
    };

    let code = trim_input(&raw);
    if code.is_empty() {
        RowCode::Missing
    } else {
        RowCode::Code(code.to_string())
    }
}

fn number_to_code(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // 整数值浮点数在 1e21 以内按整数形式显示，与表格中看到的码一致
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f}"),
        _ => n.to_string(),
    }
}

/// 批次导入服务
pub struct BatchImportService {
    batch_repo: Arc<dyn BatchRepositoryTrait>,
    code_repo: Arc<dyn CodeRepositoryTrait>,
    storage_timeout: Duration,
}

impl BatchImportService {
    pub fn new(
        batch_repo: Arc<dyn BatchRepositoryTrait>,
        code_repo: Arc<dyn CodeRepositoryTrait>,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            batch_repo,
            code_repo,
            storage_timeout,
        }
    }

    /// 导入批次，返回管理页面展示的消息
    pub async fn import(&self, batch_name: &str, rows: &[Value]) -> AdminMessage {
        match self.import_batch(batch_name, rows).await {
            Ok(report) => AdminMessage::new(report.message()),
            Err(err) => AdminMessage::new(err.user_message()),
        }
    }

    /// 导入批次
    ///
    /// 只有批次创建失败会返回错误；行级问题全部体现在 [`ImportReport`] 的计数中
    #[instrument(skip(self, rows), fields(total_rows = rows.len()))]
    pub async fn import_batch(&self, batch_name: &str, rows: &[Value]) -> Result<ImportReport> {
        let batch = with_timeout(
            self.storage_timeout,
            "create_batch",
            self.batch_repo.create_batch(batch_name),
        )
        .await
        .map_err(|e| {
            error!(error = %e, batch_name, "Failed to create batch");
            CodeError::BatchCreationFailed(e.to_string())
        })?;

        let mut report = ImportReport::new(batch.id, batch.batch_name.clone(), rows.len());

        for (index, row) in rows.iter().enumerate() {
            let code = match extract_code(row) {
                RowCode::Code(code) => code,
                RowCode::Missing | RowCode::Unparseable => {
                    report.unparseable_count += 1;
                    continue;
                }
            };

            let inserted = with_timeout(
                self.storage_timeout,
                "insert_if_absent",
                self.code_repo.insert_if_absent(batch.id, &code),
            )
            .await;

            match inserted {
                Ok(true) => report.inserted_count += 1,
                Ok(false) => report.duplicate_count += 1,
                Err(e) => {
                    warn!(error = %e, row = index + 1, code = %code, "Failed to insert code, skipping row");
                    report.failed_count += 1;
                }
            }
        }

        metrics::record_import(
            report.inserted_count as u64,
            report.duplicate_count as u64,
            report.unparseable_count as u64,
            report.failed_count as u64,
        );

        info!(
            batch_id = report.batch_id,
            batch_name = %report.batch_name,
            inserted = report.inserted_count,
            duplicates = report.duplicate_count,
            unparseable = report.unparseable_count,
            failed = report.failed_count,
            "Batch imported"
        );

        Ok(report)
    }
}
