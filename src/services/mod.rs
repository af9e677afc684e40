pub mod api;
pub mod export;
pub mod referral;
pub mod store;

pub use referral::{Export, ReferralError, ReferralService, Registration};
pub use store::{MemoryStore, SharedStore, StoreError, UserFilter, UserRecord, UserStore};
