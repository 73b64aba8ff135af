//! 存储层
//!
//! 提供批次与产品码的数据访问接口，封装存储细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 状态转换与唯一性由存储保证：条件更新与 insert-if-absent 都是单条原子操作
//! - 定义 trait 接口，服务层依赖抽象，支持 mock 测试与后端替换
//! - 提供 PostgreSQL（SQLx）与内存两种实现

mod batch_repo;
mod code_repo;
mod memory_repo;
mod traits;

pub use batch_repo::BatchRepository;
pub use code_repo::CodeRepository;
pub use memory_repo::MemoryCodeStore;
pub use traits::*;
