use bytes::Bytes;
use thiserror::Error;

use crate::services::store::StoreError;

/// 注册请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub social_handle: Option<String>,
    pub wallet_address: String,
    pub referee_address: Option<String>,
}

impl Registration {
    pub fn new(social_handle: Option<&str>, wallet_address: &str) -> Self {
        Self {
            social_handle: social_handle.map(str::to_string),
            wallet_address: wallet_address.to_string(),
            referee_address: None,
        }
    }

    pub fn with_referee(mut self, referee_address: &str) -> Self {
        self.referee_address = Some(referee_address.to_string());
        self
    }

    // 空字符串视为未提供，其余取值原样保存
    pub(super) fn normalize(self) -> Result<Self, ReferralError> {
        let wallet_address = self.wallet_address;
        if wallet_address.is_empty() {
            return Err(ReferralError::InvalidRequest(
                "userAddress is required".to_string(),
            ));
        }

        Ok(Self {
            social_handle: self.social_handle.filter(|handle| !handle.is_empty()),
            wallet_address,
            referee_address: self.referee_address.filter(|referee| !referee.is_empty()),
        })
    }
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    /// 没有任何记录
    Empty,
    /// CSV 内容及行数（不含表头）
    Csv { body: Bytes, rows: usize },
}

/// 推荐服务错误类型
#[derive(Error, Debug)]
pub enum ReferralError {
    #[error("User already exists with provided details")]
    DuplicateUser,

    #[error("User not found: {wallet_address}")]
    NotFound { wallet_address: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
