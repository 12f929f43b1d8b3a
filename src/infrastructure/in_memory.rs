use crate::domain::account::{AccountId, AccountState};
use crate::domain::ports::AccountStore;
use crate::error::{QueueError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for account queues.
///
/// Uses `Arc<RwLock<BTreeMap<AccountId, AccountState>>>` so clones share the
/// same data and `get_all` comes back ordered by id.
/// Ideal for testing or single-run batches where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<BTreeMap<AccountId, AccountState>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: AccountState) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(QueueError::AccountExists(account.id)),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    async fn save(&self, mut account: AccountState) -> Result<u64> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(&account.id)
            .ok_or_else(|| QueueError::AccountNotFound(account.id.clone()))?;

        if stored.revision != account.revision {
            return Err(QueueError::Conflict(account.id));
        }

        account.revision += 1;
        let revision = account.revision;
        *stored = account;
        Ok(revision)
    }

    async fn get(&self, id: &AccountId) -> Result<Option<AccountState>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<AccountState>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}
