//! Finance Tracker Core
//!
//! Ledger consistency engine for a personal finance tracker: accounts,
//! transactions, and the logic that keeps every account's stored balance
//! equal to its initial balance plus the signed effect of each
//! transaction referencing it.
//!
//! # Architecture
//!
//! - **Reactive snapshots**: each repository multicasts its full
//!   collection to observers; new observers get the latest snapshot
//!   immediately
//! - **Durable backing**: both collections persist as JSON blobs in an
//!   embedded RocksDB store; every mutation persists, then publishes
//! - **Single balance writer**: only the transaction ledger may request
//!   balance deltas, and only the account repository applies them
//! - **Synchronous**: every operation runs to completion before
//!   returning; there are no suspension points
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use finance_core::{
//!     AccountDraft, AccountKind, Config, Tracker, TransactionDraft, TransactionKind,
//! };
//! use rust_decimal::Decimal;
//!
//! fn main() -> finance_core::Result<()> {
//!     let tracker = Tracker::open(Config::default())?;
//!
//!     let account = tracker.accounts().create(AccountDraft {
//!         name: "Everyday".to_string(),
//!         kind: AccountKind::Checking,
//!         balance: Decimal::new(10000, 2), // 100.00
//!         description: None,
//!     })?;
//!
//!     tracker.transactions().create(TransactionDraft {
//!         account_id: account.id.clone(),
//!         amount: Decimal::new(2500, 2), // 25.00
//!         kind: TransactionKind::Expense,
//!         category: "groceries".to_string(),
//!         description: None,
//!         date: Utc::now(),
//!     })?;
//!
//!     // Balance is now 75.00
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod accounts;
pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod types;

// Re-exports
pub use accounts::AccountRepository;
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::TransactionLedger;
pub use storage::Storage;
pub use store::{Store, Subscription};
pub use tracker::Tracker;
pub use types::{
    Account, AccountDraft, AccountId, AccountKind, AccountPatch, Transaction, TransactionDraft,
    TransactionId, TransactionKind, TransactionPatch,
};
