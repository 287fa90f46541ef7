//! Tracker facade
//!
//! Opens the backing store and wires both repositories together. This is
//! the entry point embedding applications use; the repositories call into
//! each other internally but share no state with the outside world beyond
//! their published snapshots.

use crate::{
    accounts::AccountRepository, config::Config, error::Result, ledger::TransactionLedger,
    storage::Storage,
};
use std::fmt;
use std::sync::Arc;

/// Assembled finance tracker core
pub struct Tracker {
    accounts: Arc<AccountRepository>,
    transactions: TransactionLedger,
}

impl Tracker {
    /// Open the tracker with configuration
    ///
    /// Loads both persisted collections; a malformed blob fails the open.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(Storage::open(&config)?);
        let accounts = Arc::new(AccountRepository::open(storage.clone())?);
        let transactions = TransactionLedger::open(storage, accounts.clone())?;

        Ok(Self {
            accounts,
            transactions,
        })
    }

    /// Account repository
    pub fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// Transaction ledger
    pub fn transactions(&self) -> &TransactionLedger {
        &self.transactions
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("accounts", &self.accounts)
            .field("transactions", &self.transactions)
            .finish()
    }
}
