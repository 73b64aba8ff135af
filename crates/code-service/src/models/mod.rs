//! 领域模型
//!
//! 所有模型都支持数据库（sqlx）和 JSON（serde）序列化

mod batch;
mod code;
mod enums;

pub use batch::Batch;
pub use code::{CodeVerification, ProductCode};
pub use enums::CodeStatus;
