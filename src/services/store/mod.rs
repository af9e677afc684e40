//! 用户文档存储
//!
//! - `types`: 记录、查询条件与错误类型
//! - `memory`: 基于 DashMap 的进程内实现
//!
//! 服务层只依赖 [`UserStore`] trait，具体存储在启动时通过 [`open`] 注入。

pub mod memory;
pub mod types;

use std::sync::Arc;

use futures::future::BoxFuture;

pub use memory::MemoryStore;
pub use types::{StoreError, StoreResult, UserFilter, UserRecord};

/// 文档存储接口
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// 按插入顺序返回第一条匹配的记录
    fn find_one(&self, filter: UserFilter) -> BoxFuture<'_, StoreResult<Option<UserRecord>>>;

    /// 插入记录，钱包地址已存在时返回 `StoreError::DuplicateKey`
    fn insert(&self, record: UserRecord) -> BoxFuture<'_, StoreResult<()>>;

    /// 原子地将匹配记录的推荐计数加一，返回更新后的记录
    fn find_one_and_increment(
        &self,
        wallet_address: String,
    ) -> BoxFuture<'_, StoreResult<Option<UserRecord>>>;

    /// 按插入顺序返回全部记录
    fn find_all(&self) -> BoxFuture<'_, StoreResult<Vec<UserRecord>>>;
}

pub type SharedStore = Arc<dyn UserStore>;

// 根据连接字符串打开存储
pub fn open(uri: &str) -> StoreResult<SharedStore> {
    let scheme = uri.split(':').next().unwrap_or_default();
    match scheme {
        "memory" => {
            tracing::info!(uri = %uri, "Opening in-memory user store");
            Ok(Arc::new(MemoryStore::new()))
        }
        _ => Err(StoreError::UnsupportedUri(uri.to_string())),
    }
}
