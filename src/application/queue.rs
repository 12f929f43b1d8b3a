use crate::domain::account::{AccountId, AccountState, AdmitOutcome, Dashboard, ReleaseOutcome};
use crate::domain::command::Command;
use crate::domain::otp::OtpGenerator;
use crate::domain::ports::AccountStoreBox;
use crate::domain::ticket::{Otp, Ticket, TicketNumber};
use crate::error::{QueueError, Result};
use rand::rngs::OsRng;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// What a single [`Command`] produced, ready to be shown to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Registered,
    Issued(Ticket),
    Admit(AdmitOutcome),
    Release(ReleaseOutcome),
    Reset,
    CapacitySet(u32),
    LiveStatus(TicketNumber),
    Dashboard(Dashboard),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Registered => write!(f, "registered"),
            CommandOutcome::Issued(ticket) => {
                write!(f, "issued ticket {} with code {}", ticket.number, ticket.code)
            }
            CommandOutcome::Admit(AdmitOutcome::NothingToAdmit) => write!(f, "no one to call"),
            CommandOutcome::Admit(AdmitOutcome::CapacityReached { waiting }) => {
                write!(f, "limit reached, {} waiting", waiting)
            }
            CommandOutcome::Admit(AdmitOutcome::Admitted {
                current_serving,
                waiting,
            }) => write!(f, "now serving {}, {} waiting", current_serving, waiting),
            CommandOutcome::Release(ReleaseOutcome::Released) => write!(f, "released"),
            CommandOutcome::Release(ReleaseOutcome::Invalid) => write!(f, "invalid entry"),
            CommandOutcome::Reset => write!(f, "reset"),
            CommandOutcome::CapacitySet(max) => write!(f, "capacity set to {}", max),
            CommandOutcome::LiveStatus(current) => write!(f, "current token {}", current),
            CommandOutcome::Dashboard(dashboard) => write!(
                f,
                "current token {}, {} waiting",
                dashboard.current_serving, dashboard.waiting
            ),
        }
    }
}

/// Runs queue operations as per-account transactions.
///
/// Every call takes the account's lock, loads the state, applies one domain
/// transition to the loaded copy and saves it only when the transition
/// succeeded and changed something. Accounts never share a lock, so
/// operations on different accounts proceed independently.
pub struct QueueService {
    store: AccountStoreBox,
    generator: OtpGenerator,
    locks: RwLock<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl QueueService {
    /// Creates a new `QueueService` backed by `store`.
    pub fn new(store: AccountStoreBox) -> Self {
        Self {
            store,
            generator: OtpGenerator::new(),
            locks: RwLock::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, id: &AccountId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(id) {
            return Arc::clone(lock);
        }
        let mut locks = self.locks.write().await;
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    /// Drops the registry entry for `id` unless some caller still holds it.
    ///
    /// Clones are only handed out under the registry lock, so a strong count
    /// of one means nobody can be waiting on this mutex.
    async fn forget_lock(&self, id: &AccountId) {
        let mut locks = self.locks.write().await;
        if locks
            .get(id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(id);
        }
    }

    /// Runs `op` while holding the account's lock.
    ///
    /// A failed operation gives its registry entry back, so unknown ids
    /// never accumulate locks.
    async fn with_lock<T, F, Fut>(&self, id: &AccountId, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let lock = self.lock_for(id).await;
        let result = {
            let _guard = lock.lock().await;
            op().await
        };
        drop(lock);

        if result.is_err() {
            self.forget_lock(id).await;
        }
        result
    }

    async fn load(&self, id: &AccountId) -> Result<AccountState> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| QueueError::AccountNotFound(id.clone()))
    }

    /// Creates an empty account with zero capacity.
    pub async fn register(&self, id: AccountId) -> Result<()> {
        let account = AccountState::new(id.clone());
        self.with_lock(&id, move || async move { self.store.insert(account).await })
            .await
    }

    /// Appends a new ticket to the waiting line.
    ///
    /// The returned pair is the customer's only credential for leaving later.
    pub async fn issue(&self, id: &AccountId) -> Result<Ticket> {
        self.with_lock(id, move || async move {
            let mut account = self.load(id).await?;
            let ticket = account.issue(&self.generator, &mut OsRng)?;
            self.store.save(account).await?;
            Ok(ticket)
        })
        .await
    }

    /// Moves the oldest waiting ticket into service if capacity allows.
    pub async fn admit_next(&self, id: &AccountId) -> Result<AdmitOutcome> {
        self.with_lock(id, move || async move {
            let mut account = self.load(id).await?;
            let outcome = account.admit_next();
            if let AdmitOutcome::Admitted { .. } = outcome {
                self.store.save(account).await?;
            }
            Ok(outcome)
        })
        .await
    }

    /// Validates an exit claim against the tickets being served and closes the match.
    pub async fn release(
        &self,
        id: &AccountId,
        number: TicketNumber,
        code: Otp,
    ) -> Result<ReleaseOutcome> {
        self.with_lock(id, move || async move {
            let mut account = self.load(id).await?;
            let outcome = account.release(number, code);
            if outcome == ReleaseOutcome::Released {
                self.store.save(account).await?;
            }
            Ok(outcome)
        })
        .await
    }

    /// Clears both lines and the counters in one write.
    pub async fn reset(&self, id: &AccountId) -> Result<()> {
        self.with_lock(id, move || async move {
            let mut account = self.load(id).await?;
            account.reset();
            self.store.save(account).await?;
            Ok(())
        })
        .await
    }

    pub async fn set_capacity(&self, id: &AccountId, max_customers: u32) -> Result<()> {
        self.with_lock(id, move || async move {
            let mut account = self.load(id).await?;
            account.set_capacity(max_customers);
            self.store.save(account).await?;
            Ok(())
        })
        .await
    }

    pub async fn capacity(&self, id: &AccountId) -> Result<u32> {
        self.with_lock(id, move || async move { Ok(self.load(id).await?.max_customers) })
            .await
    }

    pub async fn dashboard(&self, id: &AccountId) -> Result<Dashboard> {
        self.with_lock(id, move || async move { Ok(self.load(id).await?.dashboard()) })
            .await
    }

    /// The ticket number currently being served, as shown to customers.
    pub async fn live_status(&self, id: &AccountId) -> Result<TicketNumber> {
        Ok(self.dashboard(id).await?.current_serving)
    }

    /// Routes a command to the matching operation.
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::Register(id) => {
                self.register(id).await?;
                Ok(CommandOutcome::Registered)
            }
            Command::Issue(id) => self.issue(&id).await.map(CommandOutcome::Issued),
            Command::Admit(id) => self.admit_next(&id).await.map(CommandOutcome::Admit),
            Command::Release {
                account,
                ticket,
                code,
            } => self
                .release(&account, ticket, code)
                .await
                .map(CommandOutcome::Release),
            Command::Reset(id) => {
                self.reset(&id).await?;
                Ok(CommandOutcome::Reset)
            }
            Command::SetCapacity {
                account,
                max_customers,
            } => {
                self.set_capacity(&account, max_customers).await?;
                Ok(CommandOutcome::CapacitySet(max_customers))
            }
            Command::Status(id) => self.live_status(&id).await.map(CommandOutcome::LiveStatus),
            Command::Dashboard(id) => self.dashboard(&id).await.map(CommandOutcome::Dashboard),
        }
    }

    /// Snapshot of every account, ordered by id.
    ///
    /// Each account is read atomically, but the listing is not a single
    /// transaction across accounts.
    pub async fn accounts(&self) -> Result<Vec<AccountState>> {
        self.store.get_all().await
    }
}
