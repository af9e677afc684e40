use thiserror::Error;

/// 用户记录（不包含存储内部的标识符）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// 社交账号（可选，应用层保证唯一）
    pub social_handle: Option<String>,
    /// 钱包地址（存储层唯一索引）
    pub wallet_address: String,
    /// 被推荐次数
    pub referral_count: u64,
}

impl UserRecord {
    /// 创建一条新的用户记录，推荐计数从 0 开始
    pub fn new(social_handle: Option<String>, wallet_address: impl Into<String>) -> Self {
        Self {
            social_handle,
            wallet_address: wallet_address.into(),
            referral_count: 0,
        }
    }
}

/// 按字段查询的过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    WalletAddress(String),
    SocialHandle(String),
    /// 任意一个子条件匹配即可，空列表不匹配任何记录
    Or(Vec<UserFilter>),
}

impl UserFilter {
    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            UserFilter::WalletAddress(address) => record.wallet_address == *address,
            UserFilter::SocialHandle(handle) => {
                record.social_handle.as_deref() == Some(handle.as_str())
            }
            UserFilter::Or(filters) => filters.iter().any(|filter| filter.matches(record)),
        }
    }
}

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate key on {field}: {value}")]
    DuplicateKey { field: &'static str, value: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unsupported store uri: {0}")]
    UnsupportedUri(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
