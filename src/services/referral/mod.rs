//! 推荐注册
//!
//! - `types`: 请求、导出结果与错误类型
//! - `service`: 注册、查询与导出的核心逻辑

pub mod service;
pub mod types;

pub use service::ReferralService;
pub use types::{Export, ReferralError, Registration};
