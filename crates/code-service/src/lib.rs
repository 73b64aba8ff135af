//! 产品码核验服务
//!
//! 提供产品防伪码的核验（C 端）与批次导入（B 端）核心逻辑。
//!
//! ## 核心功能
//!
//! - **码核验**：用户提交码、手机号与购买渠道，码由 Unused 原子地转为 Used，且只能成功一次
//! - **批次导入**：管理员上传表格解析后的行，创建批次并逐行写入未使用的码，全局重复的码静默跳过
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 存储层（PostgreSQL 与内存两种实现）
//! - `service`: 业务服务层
//!
//! 渲染、路由与文件上传由外部请求层负责，本 crate 只返回可渲染的消息。

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{CodeError, Result};
pub use models::*;
pub use repository::{
    BatchRepository, BatchRepositoryTrait, CodeRepository, CodeRepositoryTrait, MemoryCodeStore,
};
pub use service::{
    BatchImportService, VerificationService,
    dto::{AdminMessage, ImportReport, VerifyOutcome, VerifyRequest},
};
