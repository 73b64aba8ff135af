//! 枚举类型定义

use serde::{Deserialize, Serialize};

/// 产品码状态
///
/// 只允许 Unused -> Used 的单向转换，Used 为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CodeStatus {
    /// 未使用 - 导入后的初始状态
    #[default]
    Unused,
    /// 已使用 - 核验成功，终态
    Used,
}

impl CodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Used => "used",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Used)
    }
}

impl std::fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_status_default_is_unused() {
        assert_eq!(CodeStatus::default(), CodeStatus::Unused);
        assert!(!CodeStatus::Unused.is_terminal());
        assert!(CodeStatus::Used.is_terminal());
    }

    #[test]
    fn test_code_status_serialization() {
        assert_eq!(serde_json::to_string(&CodeStatus::Used).unwrap(), "\"USED\"");
        let status: CodeStatus = serde_json::from_str("\"UNUSED\"").unwrap();
        assert_eq!(status, CodeStatus::Unused);
        assert_eq!(CodeStatus::Used.to_string(), "used");
    }
}
