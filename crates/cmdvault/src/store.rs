//! Record Store backed by sled
//!
//! One sled database holds a named collection tree whose keys are 8-byte
//! big-endian sequence IDs, so iteration order equals ID order. A second
//! tree keeps the per-collection sequence counters that hand out those IDs.

use std::path::Path;

use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
    TransactionResult, TransactionalTree,
};
use sled::{Db, Transactional, Tree};

use crate::error::{CmdvaultError, Result};

/// Tree holding one sequence counter per collection
const SEQUENCES_TREE: &str = "__sequences";

/// Result type returned from inside a write transaction
pub type TxResult<T> = ConflictableTransactionResult<T, CmdvaultError>;

/// Abort the surrounding write transaction with `err`.
pub fn abort(err: impl Into<CmdvaultError>) -> ConflictableTransactionError<CmdvaultError> {
    ConflictableTransactionError::Abort(err.into())
}

/// Big-endian key for a sequence ID.
pub fn encode_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

/// Inverse of [`encode_key`]; `None` if `bytes` is not exactly 8 bytes.
pub fn decode_key(bytes: &[u8]) -> Option<u64> {
    <[u8; 8]>::try_from(bytes).ok().map(u64::from_be_bytes)
}

/// File-backed store handle. Held for the lifetime of the process; the
/// database is flushed and closed when the handle is dropped.
pub struct RecordStore {
    db: Db,
    records: Tree,
    sequences: Tree,
    collection: String,
}

impl RecordStore {
    /// Open (or create) the database at `path` and ensure `collection` exists.
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self> {
        let path = path.as_ref();
        if collection == SEQUENCES_TREE {
            return Err(CmdvaultError::Storage(format!(
                "Collection name {SEQUENCES_TREE} is reserved"
            )));
        }
        tracing::debug!("Opening record store at {}", path.display());

        let db = sled::open(path).map_err(|e| {
            CmdvaultError::Storage(format!(
                "Failed to open database {}: {}",
                path.display(),
                e
            ))
        })?;

        let records = db.open_tree(collection).map_err(|e| {
            CmdvaultError::Storage(format!("Failed to create collection {collection}: {e}"))
        })?;
        let sequences = db.open_tree(SEQUENCES_TREE).map_err(|e| {
            CmdvaultError::Storage(format!("Failed to create collection {SEQUENCES_TREE}: {e}"))
        })?;

        Ok(Self {
            db,
            records,
            sequences,
            collection: collection.to_string(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run `f` in a read-write transaction. Every write made through the
    /// [`WriteTxn`] commits together, or none do if `f` aborts.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: Fn(&WriteTxn<'_>) -> TxResult<T>,
    {
        let outcome: TransactionResult<T, CmdvaultError> =
            (&self.records, &self.sequences).transaction(|(records, sequences)| {
                let txn = WriteTxn {
                    records,
                    sequences,
                    collection: &self.collection,
                };
                f(&txn)
            });

        let value = outcome.map_err(|e| match e {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => CmdvaultError::Sled(e),
        })?;

        self.db.flush()?;
        Ok(value)
    }

    /// Run `f` with read-only access to the collection.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn<'_>) -> Result<T>,
    {
        f(&ReadTxn {
            records: &self.records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write access handed to [`RecordStore::update`] closures.
pub struct WriteTxn<'a> {
    records: &'a TransactionalTree,
    sequences: &'a TransactionalTree,
    collection: &'a str,
}

impl WriteTxn<'_> {
    /// Advance and return the collection's sequence. The first value is 1.
    pub fn next_sequence(&self) -> TxResult<u64> {
        let current = match self.sequences.get(self.collection.as_bytes())? {
            Some(bytes) => decode_key(&bytes).ok_or_else(|| {
                abort(CmdvaultError::Storage(format!(
                    "Corrupt sequence for collection {}",
                    self.collection
                )))
            })?,
            None => 0,
        };

        let next = current.checked_add(1).ok_or_else(|| {
            abort(CmdvaultError::Storage(format!(
                "Sequence exhausted for collection {}",
                self.collection
            )))
        })?;

        self.sequences
            .insert(self.collection.as_bytes(), &encode_key(next)[..])?;
        Ok(next)
    }

    pub fn put(&self, id: u64, value: Vec<u8>) -> TxResult<()> {
        self.records.insert(&encode_key(id)[..], value)?;
        Ok(())
    }
}

/// Read access handed to [`RecordStore::view`] closures.
pub struct ReadTxn<'a> {
    records: &'a Tree,
}

impl ReadTxn<'_> {
    /// Iterate `(id, value)` pairs in ascending ID order.
    pub fn scan(&self) -> impl Iterator<Item = Result<(u64, Vec<u8>)>> + '_ {
        self.records.iter().map(|item| {
            let (key, value) = item?;
            let id = decode_key(&key).ok_or_else(|| {
                CmdvaultError::Storage(format!("Invalid key of {} bytes", key.len()))
            })?;
            Ok((id, value.to_vec()))
        })
    }
}
