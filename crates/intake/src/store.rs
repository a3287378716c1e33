//! The newest-first record store, mirrored in full to key-value storage
//!
//! Every mutation builds the next sequence, writes all of it under
//! [`RECORDS_KEY`], and only then swaps it in. A failed write leaves both
//! memory and storage as they were.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::record::ClientRecord;
use crate::storage::KeyValueStorage;

/// Storage key for the records blob; bump the suffix on incompatible changes
pub const RECORDS_KEY: &str = "mp_records_v2";

pub struct RecordStore {
  storage: Box<dyn KeyValueStorage>,
  key: String,
  records: Vec<ClientRecord>,
}

impl RecordStore {
  /// Open the store under [`RECORDS_KEY`] and read what is already there
  pub fn load(storage: Box<dyn KeyValueStorage>) -> Self {
    Self::load_with_key(storage, RECORDS_KEY)
  }

  /// Open the store under a custom key. Never fails: unreadable data
  /// loads as empty and undecodable entries are dropped.
  pub fn load_with_key(storage: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
    let key = key.into();
    let records = read_records(storage.as_ref(), &key);
    Self { storage, key, records }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  /// Newest first
  pub fn records(&self) -> &[ClientRecord] {
    &self.records
  }

  pub fn get(&self, id: &str) -> Option<&ClientRecord> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Put `record` at the front and persist
  pub fn append(&mut self, record: ClientRecord) -> Result<(), StoreError> {
    let mut next = Vec::with_capacity(self.records.len() + 1);
    next.push(record);
    next.extend(self.records.iter().cloned());
    self.commit(next)
  }

  /// Replace the record with `id` by `patch(record)` and persist.
  ///
  /// Returns `Ok(None)` without touching storage when no record matches.
  pub fn update_by_id<F>(&mut self, id: &str, patch: F) -> Result<Option<ClientRecord>, StoreError>
  where
    F: FnOnce(ClientRecord) -> ClientRecord,
  {
    let Some(index) = self.records.iter().position(|r| r.id == id) else {
      return Ok(None);
    };

    let mut next = self.records.clone();
    let patched = patch(next[index].clone());
    next[index] = patched.clone();
    self.commit(next)?;
    Ok(Some(patched))
  }

  pub fn clear(&mut self) -> Result<(), StoreError> {
    self.commit(Vec::new())
  }

  fn commit(&mut self, next: Vec<ClientRecord>) -> Result<(), StoreError> {
    let blob = serde_json::to_string(&next)?;
    self.storage.set(&self.key, &blob)?;
    self.records = next;
    Ok(())
  }
}

fn read_records(storage: &dyn KeyValueStorage, key: &str) -> Vec<ClientRecord> {
  let blob = match storage.get(key) {
    Ok(Some(blob)) => blob,
    Ok(None) => return Vec::new(),
    Err(e) => {
      tracing::warn!(key, "could not read stored records, starting empty: {e}");
      return Vec::new();
    }
  };
  decode_records(&blob)
}

/// Decode a stored blob entry by entry, keeping whatever is valid
pub fn decode_records(blob: &str) -> Vec<ClientRecord> {
  let entries = match serde_json::from_str::<Vec<serde_json::Value>>(blob) {
    Ok(entries) => entries,
    Err(e) => {
      tracing::warn!("stored records are not a JSON array, starting empty: {e}");
      return Vec::new();
    }
  };

  let mut seen = HashSet::new();
  let mut records = Vec::with_capacity(entries.len());
  for (index, entry) in entries.into_iter().enumerate() {
    let record = match serde_json::from_value::<ClientRecord>(entry) {
      Ok(record) => record,
      Err(e) => {
        tracing::warn!(index, "dropping stored record that does not decode: {e}");
        continue;
      }
    };
    if record.id.is_empty() {
      tracing::warn!(index, "dropping stored record without an id");
      continue;
    }
    if !seen.insert(record.id.clone()) {
      tracing::warn!(index, id = %record.id, "dropping stored record with a duplicate id");
      continue;
    }
    records.push(record);
  }
  records
}
