//! Ledger consistency engine
//!
//! Owns the Transaction collection and is its only writer. Every mutation
//! runs a three-step protocol that keeps each account's stored balance
//! equal to its initial balance plus the signed effect of every
//! transaction referencing it:
//!
//! 1. reverse the old effect against the old account (update, delete)
//! 2. apply the new effect against the new account (create, update)
//! 3. commit the transaction record, persist, publish
//!
//! Steps 1 and 2 go through [`AccountRepository`]'s crate-private balance
//! entry point; this module never writes a balance itself. A step whose
//! account no longer exists is skipped (orphaned transaction), except
//! that creating a transaction against a missing account, or explicitly
//! moving one there, is rejected: silently dropping a balance effect is a
//! correctness bug, not a benign absence.

use crate::{
    accounts::AccountRepository,
    error::{Error, Result},
    storage::{Storage, KEY_TRANSACTIONS},
    store::{Store, Subscription},
    types::{AccountId, Transaction, TransactionDraft, TransactionId, TransactionPatch},
};
use std::fmt;
use std::sync::Arc;

/// Repository for transactions, with balance consistency maintenance
pub struct TransactionLedger {
    store: Store<Vec<Transaction>>,
    storage: Arc<Storage>,
    accounts: Arc<AccountRepository>,
}

impl TransactionLedger {
    /// Open the ledger, loading the persisted collection
    ///
    /// An absent blob starts the ledger empty; a malformed blob is a
    /// fatal error propagated to the caller.
    pub fn open(storage: Arc<Storage>, accounts: Arc<AccountRepository>) -> Result<Self> {
        let transactions = storage.load(KEY_TRANSACTIONS)?.unwrap_or_default();

        tracing::debug!(transactions = transactions.len(), "Transaction collection loaded");

        Ok(Self {
            store: Store::new(transactions),
            storage,
            accounts,
        })
    }

    /// Current snapshot of all transactions, in insertion order
    pub fn list(&self) -> Vec<Transaction> {
        self.store.current()
    }

    /// Observe the current snapshot and every future one
    pub fn subscribe<F>(&self, observer: F) -> Subscription<Vec<Transaction>>
    where
        F: Fn(&Vec<Transaction>) + Send + Sync + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Transactions referencing `account_id`, from the latest snapshot
    pub fn list_by_account(&self, account_id: &AccountId) -> Vec<Transaction> {
        self.store
            .current()
            .into_iter()
            .filter(|t| &t.account_id == account_id)
            .collect()
    }

    /// Live-filtered view of one account's transactions
    ///
    /// The filter is re-evaluated against the full collection on every
    /// publish, so reassignments move transactions between views.
    pub fn subscribe_by_account<F>(&self, account_id: AccountId, observer: F) -> Subscription<Vec<Transaction>>
    where
        F: Fn(&[Transaction]) + Send + Sync + 'static,
    {
        self.store.subscribe(move |transactions: &Vec<Transaction>| {
            let filtered: Vec<Transaction> = transactions
                .iter()
                .filter(|t| t.account_id == account_id)
                .cloned()
                .collect();
            observer(&filtered);
        })
    }

    /// Look up a transaction in the latest snapshot
    pub fn get_by_id(&self, id: &TransactionId) -> Option<Transaction> {
        self.store.current().into_iter().find(|t| &t.id == id)
    }

    /// The `limit` most recent transactions by date, newest first
    pub fn recent(&self, limit: usize) -> Vec<Transaction> {
        let mut transactions = self.store.current();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions.truncate(limit);
        transactions
    }

    /// Record a transaction and apply its effect to the account balance
    ///
    /// Rejects with [`Error::AccountNotFound`] when `account_id` does not
    /// resolve; a recorded transaction must never start out orphaned.
    pub fn create(&self, draft: TransactionDraft) -> Result<Transaction> {
        if self.accounts.get_by_id(&draft.account_id).is_none() {
            return Err(Error::AccountNotFound(draft.account_id.to_string()));
        }

        let transaction = Transaction {
            id: TransactionId::generate(),
            account_id: draft.account_id,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            description: draft.description,
            date: draft.date,
        };

        self.accounts
            .adjust_balance(&transaction.account_id, transaction.effect())?;

        let mut transactions = self.store.current();
        transactions.push(transaction.clone());
        self.commit(transactions)?;

        tracing::debug!(
            transaction_id = %transaction.id,
            account_id = %transaction.account_id,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Merge the provided fields onto the transaction addressed by `id`,
    /// moving its balance effect accordingly
    ///
    /// A missing id is a silent no-op. An explicitly provided field always
    /// counts, including `Some(Decimal::ZERO)` for the amount. When the
    /// patch moves the transaction to another account, the old effect is
    /// reversed on the old account and the new effect applied on the new
    /// one; moving to a nonexistent account is rejected.
    pub fn update(&self, id: &TransactionId, patch: TransactionPatch) -> Result<()> {
        let mut transactions = self.store.current();
        let position = match transactions.iter().position(|t| &t.id == id) {
            Some(position) => position,
            None => return Ok(()),
        };

        let old = transactions[position].clone();
        let mut new = old.clone();

        let reassigned = patch.account_id.is_some();
        if let Some(account_id) = patch.account_id {
            new.account_id = account_id;
        }
        if let Some(amount) = patch.amount {
            new.amount = amount;
        }
        if let Some(kind) = patch.kind {
            new.kind = kind;
        }
        if let Some(category) = patch.category {
            new.category = category;
        }
        if let Some(description) = patch.description {
            new.description = Some(description);
        }
        if let Some(date) = patch.date {
            new.date = date;
        }

        // An explicit move must target an existing account
        if reassigned && self.accounts.get_by_id(&new.account_id).is_none() {
            return Err(Error::AccountNotFound(new.account_id.to_string()));
        }

        // Reverse the old effect, then apply the new one. Either step is
        // skipped when its account no longer exists (orphaned transaction).
        self.accounts.adjust_balance(&old.account_id, -old.effect())?;
        self.accounts.adjust_balance(&new.account_id, new.effect())?;

        transactions[position] = new;
        self.commit(transactions)?;

        tracing::debug!(transaction_id = %id, "Transaction updated");

        Ok(())
    }

    /// Remove the transaction addressed by `id`, reversing its effect
    ///
    /// A missing id is a silent no-op.
    pub fn delete(&self, id: &TransactionId) -> Result<()> {
        let mut transactions = self.store.current();
        let position = match transactions.iter().position(|t| &t.id == id) {
            Some(position) => position,
            None => return Ok(()),
        };

        let transaction = transactions.remove(position);
        self.accounts
            .adjust_balance(&transaction.account_id, -transaction.effect())?;

        self.commit(transactions)?;

        tracing::debug!(
            transaction_id = %transaction.id,
            account_id = %transaction.account_id,
            "Transaction deleted"
        );

        Ok(())
    }

    /// Remove every transaction, reversing each effect
    ///
    /// Afterwards each account is back at its balance before any of the
    /// removed transactions were recorded.
    pub fn clear(&self) -> Result<()> {
        let transactions = self.store.current();
        for transaction in &transactions {
            self.accounts
                .adjust_balance(&transaction.account_id, -transaction.effect())?;
        }

        self.commit(Vec::new())?;

        tracing::debug!(removed = transactions.len(), "Transaction collection cleared");

        Ok(())
    }

    /// Persist the collection, then publish it
    fn commit(&self, transactions: Vec<Transaction>) -> Result<()> {
        self.storage.save(KEY_TRANSACTIONS, &transactions)?;
        self.store.publish(transactions);
        Ok(())
    }
}

impl fmt::Debug for TransactionLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionLedger")
            .field("transactions", &self.store.current().len())
            .finish_non_exhaustive()
    }
}
