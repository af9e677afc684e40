use crate::services::export::render_csv;
use crate::services::store::{SharedStore, StoreError, UserFilter, UserRecord};

use super::types::{Export, ReferralError, Registration};

/// 推荐注册服务，存储通过构造函数注入
#[derive(Debug, Clone)]
pub struct ReferralService {
    store: SharedStore,
}

impl ReferralService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 注册新用户，并为推荐人的计数加一
    pub async fn register(&self, registration: Registration) -> Result<(), ReferralError> {
        let Registration {
            social_handle,
            wallet_address,
            referee_address,
        } = registration.normalize()?;

        // 钱包地址或社交账号任一已存在即视为重复
        let mut clauses = vec![UserFilter::WalletAddress(wallet_address.clone())];
        if let Some(handle) = &social_handle {
            clauses.push(UserFilter::SocialHandle(handle.clone()));
        }

        tracing::debug!(
            wallet_address = %wallet_address,
            social_handle = ?social_handle,
            "Checking for existing user"
        );

        let existing = self
            .store
            .find_one(UserFilter::Or(clauses))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to query existing user"))?;

        if let Some(existing) = existing {
            tracing::warn!(
                wallet_address = %wallet_address,
                existing_wallet_address = %existing.wallet_address,
                "User already exists with provided details"
            );
            return Err(ReferralError::DuplicateUser);
        }

        // 唯一索引兜底并发注册同一钱包地址的情况
        match self
            .store
            .insert(UserRecord::new(social_handle.clone(), wallet_address.clone()))
            .await
        {
            Ok(()) => {}
            Err(StoreError::DuplicateKey { field, value }) => {
                tracing::warn!(
                    field = %field,
                    value = %value,
                    "Unique index rejected concurrent registration"
                );
                return Err(ReferralError::DuplicateUser);
            }
            Err(e) => {
                tracing::error!(error = %e, wallet_address = %wallet_address, "Failed to insert user");
                return Err(e.into());
            }
        }

        tracing::info!(
            wallet_address = %wallet_address,
            social_handle = ?social_handle,
            "Registered user"
        );

        if let Some(referee_address) = referee_address {
            self.credit_referee(referee_address).await?;
        }

        Ok(())
    }

    // 推荐人不存在时不做任何事
    async fn credit_referee(&self, referee_address: String) -> Result<(), ReferralError> {
        let updated = self
            .store
            .find_one_and_increment(referee_address.clone())
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    referee_address = %referee_address,
                    "Failed to increment referral count"
                )
            })?;

        match updated {
            Some(referee) => tracing::info!(
                referee_address = %referee.wallet_address,
                referral_count = referee.referral_count,
                "Credited referee"
            ),
            None => tracing::debug!(
                referee_address = %referee_address,
                "Referee not registered, skipping referral credit"
            ),
        }

        Ok(())
    }

    /// 查询钱包地址对应的推荐计数
    pub async fn referral_count(&self, wallet_address: &str) -> Result<u64, ReferralError> {
        let user = self
            .store
            .find_one(UserFilter::WalletAddress(wallet_address.to_string()))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, wallet_address = %wallet_address, "Failed to look up user")
            })?;

        match user {
            Some(user) => Ok(user.referral_count),
            None => {
                tracing::warn!(wallet_address = %wallet_address, "User not found");
                Err(ReferralError::NotFound {
                    wallet_address: wallet_address.to_string(),
                })
            }
        }
    }

    /// 导出所有记录为 CSV
    pub async fn export_all(&self) -> Result<Export, ReferralError> {
        let records = self
            .store
            .find_all()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch user data"))?;

        if records.is_empty() {
            tracing::info!("No user data available to export");
            return Ok(Export::Empty);
        }

        tracing::info!(record_count = records.len(), "Exporting user data to CSV");

        Ok(Export::Csv {
            body: render_csv(&records),
            rows: records.len(),
        })
    }
}
