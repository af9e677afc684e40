use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use uuid::Uuid;

use super::UserStore;
use super::types::{StoreError, StoreResult, UserFilter, UserRecord};

// 存储中的文档，id 和 seq 只在存储内部使用
#[derive(Debug, Clone)]
struct StoredUser {
    id: Uuid,
    seq: u64,
    record: UserRecord,
}

/// 基于 DashMap 的内存存储，以钱包地址作为唯一索引
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, StoredUser>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find_one_sync(&self, filter: &UserFilter) -> Option<UserRecord> {
        // 按钱包地址查询直接走唯一索引
        if let UserFilter::WalletAddress(address) = filter {
            return self
                .users
                .get(address)
                .map(|entry| entry.value().record.clone());
        }

        self.users
            .iter()
            .filter(|entry| filter.matches(&entry.value().record))
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.value().record.clone())
    }

    fn insert_sync(&self, record: UserRecord) -> StoreResult<()> {
        match self.users.entry(record.wallet_address.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey {
                field: "wallet_address",
                value: record.wallet_address,
            }),
            Entry::Vacant(entry) => {
                let stored = StoredUser {
                    id: Uuid::new_v4(),
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    record,
                };
                tracing::debug!(
                    id = %stored.id,
                    wallet_address = %stored.record.wallet_address,
                    "Inserted user document"
                );
                entry.insert(stored);
                Ok(())
            }
        }
    }

    fn increment_sync(&self, wallet_address: &str) -> Option<UserRecord> {
        self.users.get_mut(wallet_address).map(|mut entry| {
            let stored = entry.value_mut();
            stored.record.referral_count += 1;
            stored.record.clone()
        })
    }

    fn find_all_sync(&self) -> Vec<UserRecord> {
        let mut users: Vec<(u64, UserRecord)> = self
            .users
            .iter()
            .map(|entry| (entry.value().seq, entry.value().record.clone()))
            .collect();
        users.sort_by_key(|(seq, _)| *seq);
        users.into_iter().map(|(_, record)| record).collect()
    }
}

impl UserStore for MemoryStore {
    fn find_one(&self, filter: UserFilter) -> BoxFuture<'_, StoreResult<Option<UserRecord>>> {
        future::ready(Ok(self.find_one_sync(&filter))).boxed()
    }

    fn insert(&self, record: UserRecord) -> BoxFuture<'_, StoreResult<()>> {
        future::ready(self.insert_sync(record)).boxed()
    }

    fn find_one_and_increment(
        &self,
        wallet_address: String,
    ) -> BoxFuture<'_, StoreResult<Option<UserRecord>>> {
        future::ready(Ok(self.increment_sync(&wallet_address))).boxed()
    }

    fn find_all(&self) -> BoxFuture<'_, StoreResult<Vec<UserRecord>>> {
        future::ready(Ok(self.find_all_sync())).boxed()
    }
}
