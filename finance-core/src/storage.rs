//! Durable key-value backing over RocksDB
//!
//! Each entity collection persists as a single JSON blob under a fixed
//! key, matching the two-blob layout of the external contract:
//!
//! - `accounts` - full Account collection, insertion order preserved
//! - `transactions` - full Transaction collection, insertion order preserved
//!
//! An absent blob reads as an empty collection. A present but malformed
//! blob is a fatal configuration error surfaced to the caller.

use crate::{
    config::Config,
    error::{Error, Result},
};
use rocksdb::{Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Key of the persisted Account collection
pub const KEY_ACCOUNTS: &str = "accounts";
/// Key of the persisted Transaction collection
pub const KEY_TRANSACTIONS: &str = "transactions";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create the database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        // Database options
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let db = DB::open(&db_opts, path)?;

        tracing::info!(path = %path.display(), "Opened RocksDB backing store");

        Ok(Self { db })
    }

    /// Load a collection blob
    ///
    /// Returns `Ok(None)` when the key has never been written.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let blob = match self.db.get(key.as_bytes())? {
            Some(blob) => blob,
            None => return Ok(None),
        };

        let records = serde_json::from_slice(&blob).map_err(|source| Error::CorruptBlob {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(records))
    }

    /// Persist a collection blob, replacing any previous value
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let blob = serde_json::to_vec(records)?;
        self.db.put(key.as_bytes(), blob)?;

        tracing::debug!(key, records = records.len(), "Collection persisted");

        Ok(())
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, AccountId, AccountKind};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        (Storage::open(&config).unwrap(), temp_dir)
    }

    fn test_account(name: &str) -> Account {
        Account {
            id: AccountId::generate(),
            name: name.to_string(),
            kind: AccountKind::Checking,
            balance: Decimal::new(10000, 2),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_absent_key_reads_as_none() {
        let (storage, _temp) = test_storage();
        let loaded: Option<Vec<Account>> = storage.load(KEY_ACCOUNTS).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load_preserves_records_and_order() {
        let (storage, _temp) = test_storage();

        let accounts = vec![test_account("First"), test_account("Second")];
        storage.save(KEY_ACCOUNTS, &accounts).unwrap();

        let loaded: Vec<Account> = storage.load(KEY_ACCOUNTS).unwrap().unwrap();
        assert_eq!(loaded, accounts);
    }

    #[test]
    fn test_reopen_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        let accounts = vec![test_account("Durable")];
        {
            let storage = Storage::open(&config).unwrap();
            storage.save(KEY_ACCOUNTS, &accounts).unwrap();
        }

        let storage = Storage::open(&config).unwrap();
        let loaded: Vec<Account> = storage.load(KEY_ACCOUNTS).unwrap().unwrap();
        assert_eq!(loaded, accounts);
    }

    #[test]
    fn test_malformed_blob_is_a_fatal_error() {
        let (storage, _temp) = test_storage();

        // A blob that parses as JSON but not as the expected records
        storage.save(KEY_ACCOUNTS, &[1u32, 2, 3]).unwrap();

        let result: Result<Option<Vec<Account>>> = storage.load(KEY_ACCOUNTS);
        assert!(matches!(
            result,
            Err(Error::CorruptBlob { ref key, .. }) if key.as_str() == KEY_ACCOUNTS
        ));
    }
}
