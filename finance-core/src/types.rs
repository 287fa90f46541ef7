//! Core types for the finance tracker
//!
//! All types are designed for:
//! - Structured text serialization (serde_json)
//! - Exact arithmetic (Decimal for money)
//! - Explicit partial updates (patch structs with `Option` fields)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create from an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (UUIDv7 for time-ordering)
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create from an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (UUIDv7 for time-ordering)
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Savings account
    Savings,
    /// Checking account
    Checking,
    /// Credit card
    Credit,
}

impl AccountKind {
    /// String literal used in the persisted encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Savings => "savings",
            AccountKind::Checking => "checking",
            AccountKind::Credit => "credit",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "savings" => Some(AccountKind::Savings),
            "checking" => Some(AccountKind::Checking),
            "credit" => Some(AccountKind::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of transaction, determines the sign of its balance effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing into the account
    Income,
    /// Money flowing out of the account
    Expense,
}

impl TransactionKind {
    /// String literal used in the persisted encoding
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Signed balance effect of an amount of this kind: `+amount` for
    /// income, `-amount` for expense
    pub fn signed_effect(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked account
///
/// Invariant: `balance` always equals the initial balance plus the signed
/// effect of every transaction currently referencing this account. Only
/// the transaction ledger may request balance changes, and only the
/// account repository applies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, assigned at creation
    pub id: AccountId,

    /// Display name
    pub name: String,

    /// Kind of account
    pub kind: AccountKind,

    /// Current balance (signed, exact decimal)
    pub balance: Decimal,

    /// Optional free-text description
    pub description: Option<String>,

    /// Creation timestamp, set once
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an account; id and creation timestamp are
/// assigned by the repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDraft {
    /// Display name
    pub name: String,

    /// Kind of account
    pub kind: AccountKind,

    /// Initial balance
    pub balance: Decimal,

    /// Optional free-text description
    pub description: Option<String>,
}

/// Partial update of an account
///
/// `None` means "field omitted, keep the stored value". Balance is absent
/// on purpose: balances change only through the transaction ledger.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    /// New display name
    pub name: Option<String>,

    /// New account kind
    pub kind: Option<AccountKind>,

    /// New description
    pub description: Option<String>,
}

/// A single income or expense affecting exactly one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned at creation
    pub id: TransactionId,

    /// Account this transaction is booked against (may be reassigned)
    pub account_id: AccountId,

    /// Non-negative magnitude; the sign comes from `kind`
    pub amount: Decimal,

    /// Income or expense
    pub kind: TransactionKind,

    /// Free-text category
    pub category: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Transaction date
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Signed contribution of this transaction to its account's balance
    pub fn effect(&self) -> Decimal {
        self.kind.signed_effect(self.amount)
    }
}

/// Fields required to create a transaction; the id is assigned by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Account to book against
    pub account_id: AccountId,

    /// Non-negative magnitude
    pub amount: Decimal,

    /// Income or expense
    pub kind: TransactionKind,

    /// Free-text category
    pub category: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Transaction date
    pub date: DateTime<Utc>,
}

/// Partial update of a transaction
///
/// `None` means "field omitted". An explicitly provided value always
/// counts, including `Some(Decimal::ZERO)` for the amount.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    /// Move the transaction to another account
    pub account_id: Option<AccountId>,

    /// New magnitude
    pub amount: Option<Decimal>,

    /// New kind
    pub kind: Option<TransactionKind>,

    /// New category
    pub category: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New transaction date
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_effect() {
        let amount = Decimal::new(5000, 2); // 50.00
        assert_eq!(TransactionKind::Income.signed_effect(amount), amount);
        assert_eq!(TransactionKind::Expense.signed_effect(amount), -amount);
        assert_eq!(TransactionKind::Expense.signed_effect(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(AccountKind::from_str("savings"), Some(AccountKind::Savings));
        assert_eq!(AccountKind::from_str("credit"), Some(AccountKind::Credit));
        assert_eq!(AccountKind::from_str("brokerage"), None);
        assert_eq!(TransactionKind::from_str("income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::from_str("refund"), None);
    }

    #[test]
    fn test_kinds_serialize_as_lowercase_literals() {
        assert_eq!(serde_json::to_string(&AccountKind::Checking).unwrap(), "\"checking\"");
        assert_eq!(serde_json::to_string(&TransactionKind::Expense).unwrap(), "\"expense\"");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_account_round_trips_through_json() {
        let account = Account {
            id: AccountId::generate(),
            name: "Checking".to_string(),
            kind: AccountKind::Checking,
            balance: Decimal::new(-1250, 2),
            description: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_empty_patch_is_all_omitted() {
        let patch = TransactionPatch::default();
        assert!(patch.account_id.is_none());
        assert!(patch.amount.is_none());
        assert!(patch.kind.is_none());
        assert!(patch.category.is_none());
        assert!(patch.description.is_none());
        assert!(patch.date.is_none());
    }
}
