use std::collections::HashMap;

use dsstore_types::{FieldValue, FourCc, Record};

use crate::tree::TreeEntry;

/// Merges field occurrences into one [`Record`] per filename.
///
/// A filename's fields may be spread over several tree nodes. Records keep
/// the order in which their filename was first seen; a repeated field code
/// overwrites the earlier value.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    records: Vec<Record>,
    by_name: HashMap<String, usize>,
}

impl RecordAssembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field, creating the record on first sight of `name`.
    pub fn insert(&mut self, name: String, code: FourCc, value: FieldValue) {
        match self.by_name.get(&name) {
            Some(&idx) => {
                self.records[idx].insert(code, value);
            }
            None => {
                let mut record = Record::new(name.clone());
                record.insert(code, value);
                self.by_name.insert(name, self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Add a decoded tree entry.
    pub fn push_entry(&mut self, entry: TreeEntry) {
        self.insert(entry.name, entry.code, entry.value);
    }

    /// Look up a record by filename.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Number of distinct filenames.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no entries were added.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    pub fn finish(self) -> Vec<Record> {
        self.records
    }
}
