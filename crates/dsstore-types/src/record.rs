use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::code::FourCc;
use crate::position::Point;
use crate::value::FieldValue;

/// All fields recorded for one filename.
///
/// Field codes are unique within a record. The container stores fields
/// append-style, so inserting a code that already exists replaces the
/// earlier value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub fields: BTreeMap<FourCc, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, returning the value it replaced.
    pub fn insert(&mut self, code: FourCc, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(code, value)
    }

    /// Value of one field.
    pub fn get(&self, code: &FourCc) -> Option<&FieldValue> {
        self.fields.get(code)
    }

    /// Check whether a field is present.
    pub fn contains(&self, code: &FourCc) -> bool {
        self.fields.contains_key(code)
    }

    /// Iterate fields in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&FourCc, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of distinct fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Icon grid position from the `Iloc` field, if it holds a 16-byte blob.
    pub fn icon_location(&self) -> Option<Point> {
        self.get(&FourCc::ICON_LOCATION)
            .and_then(FieldValue::as_blob)
            .and_then(Point::from_icon_location)
    }
}
