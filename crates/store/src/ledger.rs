//! Account ledgers held in memory, one async read-write lock per account.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, error};

use openbank_core::ledger::{
    Account, AccountLedger, AccountNumber, ErrorKind, LedgerError, LedgerStore,
};
use openbank_core::product::SubjectCode;
use openbank_shared::config::LedgerConfig;
use openbank_shared::types::AccountId;

/// Ledger store keeping every account in memory.
///
/// Each account sits behind its own read-write lock. Updates on one account
/// run strictly one after another, reads share the lock and always see a
/// committed state, and different accounts proceed in parallel. Lock waits
/// are bounded; an expired wait fails with `LockTimeout` and changes nothing.
#[derive(Debug)]
pub struct MemoryLedgerStore {
    ledgers: DashMap<AccountId, Arc<RwLock<AccountLedger>>>,
    numbers: DashMap<AccountNumber, AccountId>,
    serials: DashMap<SubjectCode, u64>,
    lock_timeout: Duration,
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::from_config(&LedgerConfig::default())
    }
}

impl MemoryLedgerStore {
    /// Creates an empty store with the given lock wait limit.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            ledgers: DashMap::new(),
            numbers: DashMap::new(),
            serials: DashMap::new(),
            lock_timeout,
        }
    }

    /// Creates an empty store from configuration.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(Duration::from_millis(config.lock_timeout_ms))
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// Returns true if no account is stored.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    fn cell(&self, id: AccountId) -> Option<Arc<RwLock<AccountLedger>>> {
        // Clone the Arc so no map shard stays locked across an await.
        self.ledgers.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    async fn read(
        &self,
        id: AccountId,
    ) -> Result<Option<OwnedRwLockReadGuard<AccountLedger>>, LedgerError> {
        let Some(cell) = self.cell(id) else {
            return Ok(None);
        };

        let guard = tokio::time::timeout(self.lock_timeout, cell.read_owned())
            .await
            .map_err(|_| LedgerError::LockTimeout(id))?;
        Ok(Some(guard))
    }

    async fn write(
        &self,
        id: AccountId,
    ) -> Result<Option<OwnedRwLockWriteGuard<AccountLedger>>, LedgerError> {
        let Some(cell) = self.cell(id) else {
            return Ok(None);
        };

        let guard = tokio::time::timeout(self.lock_timeout, cell.write_owned())
            .await
            .map_err(|_| LedgerError::LockTimeout(id))?;

        debug!(%id, "Account lock acquired");
        Ok(Some(guard))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn allocate_serial(&self, subject: SubjectCode) -> Result<u64, LedgerError> {
        let mut serial = self.serials.entry(subject).or_insert(0);
        *serial += 1;
        Ok(*serial)
    }

    async fn insert(&self, ledger: AccountLedger) -> Result<(), LedgerError> {
        ledger.verify()?;
        let id = ledger.account().id;
        let number = ledger.account().number.clone();

        match self.numbers.entry(number) {
            Entry::Occupied(slot) => Err(LedgerError::DuplicateAccount(slot.key().clone())),
            Entry::Vacant(slot) => {
                self.ledgers.insert(id, Arc::new(RwLock::new(ledger)));
                debug!(account = %slot.key(), %id, "Account stored");
                slot.insert(id);
                Ok(())
            }
        }
    }

    async fn resolve(&self, number: &AccountNumber) -> Result<Option<AccountId>, LedgerError> {
        Ok(self.numbers.get(number).map(|entry| *entry.value()))
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.read(id).await?.map(|ledger| ledger.account().clone()))
    }

    async fn snapshot(&self, id: AccountId) -> Result<Option<AccountLedger>, LedgerError> {
        Ok(self.read(id).await?.map(|ledger| AccountLedger::clone(&ledger)))
    }

    async fn update<F, T>(&self, id: AccountId, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut AccountLedger) -> Result<T, LedgerError> + Send + 'static,
        T: Send + 'static,
    {
        let mut ledger = self
            .write(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        ledger.apply(op).inspect_err(|err| {
            if err.kind() == ErrorKind::Invariant {
                error!(%id, error = %err, "Refused to commit inconsistent ledger");
            }
        })
    }
}
