use super::account::{AccountId, AccountState};
use crate::error::Result;
use async_trait::async_trait;

/// Ordered key-value persistence for account queue state.
///
/// Every call is atomic on its own. Callers that need read-modify-write
/// semantics must serialize access per account themselves.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Stores a brand new account. Fails with `AccountExists` if the id is taken.
    async fn insert(&self, account: AccountState) -> Result<()>;

    /// Replaces a previously loaded account.
    ///
    /// Fails with `Conflict` if the stored revision no longer equals
    /// `account.revision`, and with `AccountNotFound` if it was never inserted.
    /// Returns the revision now stored.
    async fn save(&self, account: AccountState) -> Result<u64>;

    async fn get(&self, id: &AccountId) -> Result<Option<AccountState>>;

    /// All accounts ordered by id.
    async fn get_all(&self) -> Result<Vec<AccountState>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type AccountStoreFactory = Box<dyn Fn() -> AccountStoreBox + Send + Sync>;
