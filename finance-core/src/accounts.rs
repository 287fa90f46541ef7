//! Account repository
//!
//! Owns the Account collection. Every mutation persists the full
//! collection and then publishes the new snapshot, inside one synchronous
//! call, so readers never observe a persisted-but-unpublished state or
//! the reverse.
//!
//! Balances are special: [`AccountRepository::update`] cannot touch them.
//! The only balance writer is the crate-private `adjust_balance`, called
//! exclusively by the transaction ledger when it applies or reverses a
//! transaction effect.

use crate::{
    error::Result,
    storage::{Storage, KEY_ACCOUNTS},
    store::{Store, Subscription},
    types::{Account, AccountDraft, AccountId, AccountPatch},
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Repository for tracked accounts
pub struct AccountRepository {
    store: Store<Vec<Account>>,
    storage: Arc<Storage>,
}

impl AccountRepository {
    /// Open the repository, loading the persisted collection
    ///
    /// An absent blob starts the repository empty; a malformed blob is a
    /// fatal error propagated to the caller.
    pub fn open(storage: Arc<Storage>) -> Result<Self> {
        let accounts = storage.load(KEY_ACCOUNTS)?.unwrap_or_default();

        tracing::debug!(accounts = accounts.len(), "Account collection loaded");

        Ok(Self {
            store: Store::new(accounts),
            storage,
        })
    }

    /// Current snapshot of all accounts, in insertion order
    pub fn list(&self) -> Vec<Account> {
        self.store.current()
    }

    /// Observe the current snapshot and every future one
    pub fn subscribe<F>(&self, observer: F) -> Subscription<Vec<Account>>
    where
        F: Fn(&Vec<Account>) + Send + Sync + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Look up an account in the latest snapshot
    ///
    /// Not-found is a valid outcome, not an error.
    pub fn get_by_id(&self, id: &AccountId) -> Option<Account> {
        self.store.current().into_iter().find(|a| &a.id == id)
    }

    /// Create an account with a fresh id and creation timestamp
    pub fn create(&self, draft: AccountDraft) -> Result<Account> {
        let account = Account {
            id: AccountId::generate(),
            name: draft.name,
            kind: draft.kind,
            balance: draft.balance,
            description: draft.description,
            created_at: Utc::now(),
        };

        let mut accounts = self.store.current();
        accounts.push(account.clone());
        self.commit(accounts)?;

        tracing::debug!(account_id = %account.id, "Account created");

        Ok(account)
    }

    /// Merge the provided fields onto the account addressed by `id`
    ///
    /// Absent fields are preserved. A missing id is a silent no-op.
    pub fn update(&self, id: &AccountId, patch: AccountPatch) -> Result<()> {
        let mut accounts = self.store.current();
        let account = match accounts.iter_mut().find(|a| &a.id == id) {
            Some(account) => account,
            None => return Ok(()),
        };

        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(kind) = patch.kind {
            account.kind = kind;
        }
        if let Some(description) = patch.description {
            account.description = Some(description);
        }

        self.commit(accounts)?;

        tracing::debug!(account_id = %id, "Account updated");

        Ok(())
    }

    /// Remove the account addressed by `id`
    ///
    /// A missing id is a silent no-op. Transactions referencing the
    /// account are not removed; they become orphaned.
    pub fn delete(&self, id: &AccountId) -> Result<()> {
        let mut accounts = self.store.current();
        let before = accounts.len();
        accounts.retain(|a| &a.id != id);
        if accounts.len() == before {
            return Ok(());
        }

        self.commit(accounts)?;

        tracing::debug!(account_id = %id, "Account deleted");

        Ok(())
    }

    /// Add a signed delta to the stored balance
    ///
    /// Crate-private: only the transaction ledger may request balance
    /// changes. A missing account is a no-op; the ledger decides
    /// beforehand whether that case is an error.
    pub(crate) fn adjust_balance(&self, id: &AccountId, delta: Decimal) -> Result<()> {
        let mut accounts = self.store.current();
        let account = match accounts.iter_mut().find(|a| &a.id == id) {
            Some(account) => account,
            None => return Ok(()),
        };

        account.balance += delta;
        let balance = account.balance;
        self.commit(accounts)?;

        tracing::debug!(account_id = %id, %delta, %balance, "Balance adjusted");

        Ok(())
    }

    /// Persist the collection, then publish it
    fn commit(&self, accounts: Vec<Account>) -> Result<()> {
        self.storage.save(KEY_ACCOUNTS, &accounts)?;
        self.store.publish(accounts);
        Ok(())
    }
}

impl fmt::Debug for AccountRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRepository")
            .field("accounts", &self.store.current().len())
            .finish_non_exhaustive()
    }
}
