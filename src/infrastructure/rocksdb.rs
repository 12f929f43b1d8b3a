use crate::domain::account::{AccountId, AccountState};
use crate::domain::ports::AccountStore;
use crate::error::{QueueError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing account queue states.
pub const CF_ACCOUNTS: &str = "accounts";

/// A persistent store implementation using RocksDB.
///
/// Accounts live in their own Column Family, keyed by the UTF-8 bytes of the
/// account id so that iteration yields them in id order. Values are JSON.
///
/// Writes that check the stored revision go through `write_lock`, which makes
/// the compare-and-swap atomic for every clone of this store.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "accounts" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn accounts_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_ACCOUNTS).ok_or_else(|| {
            QueueError::InternalError(Box::new(std::io::Error::other(
                "Accounts column family not found",
            )))
        })
    }

    fn read(&self, id: &AccountId) -> Result<Option<AccountState>> {
        let cf = self.accounts_cf()?;
        match self.db.get_cf(cf, id.as_str().as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, account: &AccountState) -> Result<()> {
        let cf = self.accounts_cf()?;
        let value = serde_json::to_vec(account).map_err(|e| {
            QueueError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(cf, account.id.as_str().as_bytes(), value)?;
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<AccountState> {
    serde_json::from_slice(bytes).map_err(|e| {
        QueueError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn insert(&self, account: AccountState) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.read(&account.id)?.is_some() {
            return Err(QueueError::AccountExists(account.id));
        }
        self.write(&account)
    }

    async fn save(&self, mut account: AccountState) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let stored = self
            .read(&account.id)?
            .ok_or_else(|| QueueError::AccountNotFound(account.id.clone()))?;

        if stored.revision != account.revision {
            return Err(QueueError::Conflict(account.id));
        }

        account.revision += 1;
        self.write(&account)?;
        Ok(account.revision)
    }

    async fn get(&self, id: &AccountId) -> Result<Option<AccountState>> {
        self.read(id)
    }

    async fn get_all(&self) -> Result<Vec<AccountState>> {
        let cf = self.accounts_cf()?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| {
                QueueError::InternalError(Box::new(std::io::Error::other(format!(
                    "RocksDB iteration error: {}",
                    e
                ))))
            })?;
            accounts.push(decode(&value)?);
        }

        Ok(accounts)
    }
}
