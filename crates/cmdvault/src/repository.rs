//! Command Repository: add/list operations over the [`RecordStore`].

use chrono::{DateTime, FixedOffset};

use crate::codec::{DelimitedCodec, RecordCodec};
use crate::command::Command;
use crate::error::Result;
use crate::store::RecordStore;

pub struct CommandRepository<'a, C = DelimitedCodec> {
    store: &'a RecordStore,
    codec: C,
}

impl<'a> CommandRepository<'a, DelimitedCodec> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self::with_codec(store, DelimitedCodec)
    }
}

impl<'a, C: RecordCodec> CommandRepository<'a, C> {
    pub fn with_codec(store: &'a RecordStore, codec: C) -> Self {
        Self { store, codec }
    }

    /// Persist a new command under the next sequence ID and return that ID.
    pub fn add(
        &self,
        technology: &str,
        command: &str,
        reason: &str,
        date_added: DateTime<FixedOffset>,
    ) -> Result<u64> {
        let id = self.store.update(|txn| {
            let id = txn.next_sequence()?;
            let record = Command::new(id, technology, command, reason, date_added);
            txn.put(id, self.codec.encode(&record))?;
            Ok(id)
        })?;

        tracing::debug!(id, collection = self.store.collection(), "Added command");
        Ok(id)
    }

    /// All commands in ascending ID order.
    pub fn list_all(&self) -> Result<Vec<Command>> {
        self.store.view(|txn| {
            txn.scan()
                .map(|item| {
                    let (_, value) = item?;
                    Ok(self.codec.decode(&value)?)
                })
                .collect()
        })
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }
}
