//! 核验请求校验
//!
//! 校验全部在访问存储之前完成，失败时直接返回可展示的提示。

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use super::dto::{VerifyRequest, messages};
use crate::error::{CodeError, Result};
use crate::models::CodeVerification;

/// 10 位 ASCII 数字
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern is a valid regex"));

/// 去除首尾空白与 BOM（U+FEFF）
///
/// 表格导出的首个单元格常带 BOM，`str::trim` 不会去除它
pub fn trim_input(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// 手机号是否合法（去除首尾空白后）
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_PATTERN.is_match(trim_input(mobile))
}

/// 校验并清洗核验请求
///
/// 1. 三个字段去除首尾空白后均不能为空
/// 2. 手机号必须为 10 位数字
pub fn validate_verify_request(request: &VerifyRequest) -> Result<CodeVerification> {
    let code = trim_input(&request.code);
    let mobile = trim_input(&request.mobile);
    let purchase_source = trim_input(&request.purchase_source);

    if code.is_empty() || mobile.is_empty() || purchase_source.is_empty() {
        return Err(CodeError::Validation(
            messages::FILL_ALL_REQUIRED_FIELDS.to_string(),
        ));
    }

    if !is_valid_mobile(mobile) {
        return Err(CodeError::Validation(messages::INVALID_MOBILE.to_string()));
    }

    Ok(CodeVerification {
        code: code.to_string(),
        mobile: mobile.to_string(),
        purchase_source: purchase_source.to_string(),
        verified_at: Utc::now(),
    })
}
