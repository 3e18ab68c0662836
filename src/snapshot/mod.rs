// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Merged, flattened point-in-time views of on-chain entity state.
//!
//! Record content arrives as JSON whose shape is discovered at read time.
//! [`FieldValue`] models that content as a sum type with an explicit
//! [`FieldValue::Wrapped`] variant for the generic tagged single-field
//! containers the ledger representation produces; [`Snapshot`] exposes typed
//! accessors over the merged, unwrapped field map.

pub mod materialize;

use ahash::AHashMap;
use serde_json::Value;

use crate::{common::decimal::LedgerDecimal, common::types::ObjectId, error::FeedError};

/// A mapping from field name to dynamically shaped field value.
pub type FieldMap = AHashMap<String, FieldValue>;

/// A dynamically shaped record field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(u64),
    Text(String),
    List(Vec<FieldValue>),
    Map(FieldMap),
    /// One level of the ledger's generic tagged-value indirection.
    Wrapped(Box<FieldValue>),
}

impl FieldValue {
    /// Converts raw JSON record content into a [`FieldValue`].
    ///
    /// Objects shaped `{ "type": ..., "fields": {...} }` (the generic tagged
    /// container) become [`FieldValue::Wrapped`]; numbers outside the u64
    /// range are carried as text to avoid precision loss.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_u64() {
                Some(v) => Self::Number(v),
                None => Self::Text(n.to_string()),
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                if let Some(inner) = map.get("fields")
                    && map.keys().all(|k| k == "fields" || k == "type")
                {
                    return Self::Wrapped(Box::new(Self::from_json(inner)));
                }
                Self::Map(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Self::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Converts JSON record content into a [`FieldMap`].
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not an object.
    pub fn map_from_json(value: &Value) -> Result<FieldMap, FeedError> {
        match Self::from_json(value).unwrap_indirections() {
            Self::Map(map) => Ok(map),
            other => Err(FeedError::decode(format!(
                "expected object record content, got {other:?}"
            ))),
        }
    }

    /// Recursively replaces every [`FieldValue::Wrapped`] indirection with
    /// its inner value until plain values remain.
    pub fn unwrap_indirections(self) -> Self {
        match self {
            Self::Wrapped(inner) => inner.unwrap_indirections(),
            Self::List(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::unwrap_indirections)
                    .collect(),
            ),
            Self::Map(map) => Self::Map(
                map.into_iter()
                    .map(|(k, v)| (k, v.unwrap_indirections()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Returns the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a u64, accepting numeric or decimal-string
    /// encodings (the provider stringifies wide integers).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a bool, accepting boolean or string encodings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a field map, if it is a map.
    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is a list.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Direction of precedence when primary and child records define the same
/// field name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePrecedence {
    /// The primary record's own fields override child fields (the contract
    /// the materializer holds).
    PrimaryWins,
    /// Child fields override the primary record's fields.
    ChildWins,
}

/// Merges child field maps (in enumeration order, later children overwrite
/// earlier ones) with the primary record's fields per the given precedence.
pub fn merge_field_maps(
    primary: FieldMap,
    children: Vec<FieldMap>,
    precedence: MergePrecedence,
) -> FieldMap {
    let mut merged = FieldMap::default();
    match precedence {
        MergePrecedence::PrimaryWins => {
            for child in children {
                merged.extend(child);
            }
            merged.extend(primary);
        }
        MergePrecedence::ChildWins => {
            merged.extend(primary);
            for child in children {
                merged.extend(child);
            }
        }
    }
    merged
}

/// A merged, flattened, point-in-time read of an entity's on-chain state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    fields: FieldMap,
}

impl Snapshot {
    /// Creates a new [`Snapshot`] from an already merged and unwrapped map.
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// The underlying field map.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Gets a field value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn require(&self, name: &str) -> Result<&FieldValue, FeedError> {
        self.fields
            .get(name)
            .ok_or_else(|| FeedError::missing_field(name))
    }

    /// Gets a text field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not text.
    pub fn get_str(&self, name: &str) -> Result<&str, FeedError> {
        self.require(name)?
            .as_text()
            .ok_or_else(|| FeedError::decode(format!("field `{name}` is not text")))
    }

    /// Gets an unsigned integer field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not numeric.
    pub fn get_u64(&self, name: &str) -> Result<u64, FeedError> {
        self.require(name)?
            .as_u64()
            .ok_or_else(|| FeedError::decode(format!("field `{name}` is not an integer")))
    }

    /// Gets a boolean field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not boolean.
    pub fn get_bool(&self, name: &str) -> Result<bool, FeedError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| FeedError::decode(format!("field `{name}` is not a bool")))
    }

    /// Gets an object id field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a valid address.
    pub fn get_id(&self, name: &str) -> Result<ObjectId, FeedError> {
        ObjectId::new(self.get_str(name)?)
    }

    /// Gets a list field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a list.
    pub fn get_list(&self, name: &str) -> Result<&[FieldValue], FeedError> {
        self.require(name)?
            .as_list()
            .ok_or_else(|| FeedError::decode(format!("field `{name}` is not a list")))
    }

    /// Gets a nested map field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a map.
    pub fn get_map(&self, name: &str) -> Result<&FieldMap, FeedError> {
        self.require(name)?
            .as_map()
            .ok_or_else(|| FeedError::decode(format!("field `{name}` is not a map")))
    }

    /// Gets a fixed-triple decimal field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or the triple is malformed.
    pub fn get_decimal(&self, name: &str) -> Result<LedgerDecimal, FeedError> {
        LedgerDecimal::from_fields(self.get_map(name)?)
    }

    /// Gets a list field of object ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or any element is not a valid
    /// address.
    pub fn get_id_list(&self, name: &str) -> Result<Vec<ObjectId>, FeedError> {
        self.get_list(name)?
            .iter()
            .map(|v| {
                v.as_text()
                    .ok_or_else(|| {
                        FeedError::decode(format!("field `{name}` contains a non-address element"))
                    })
                    .and_then(ObjectId::new)
            })
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn snapshot_from_json(value: serde_json::Value) -> Snapshot {
        Snapshot::new(FieldValue::map_from_json(&value).unwrap())
    }

    #[rstest]
    fn test_wrapped_container_detection() {
        let value = FieldValue::from_json(&json!({
            "type": "0x1::option::Option<u64>",
            "fields": { "value": "42" },
        }));
        assert!(matches!(value, FieldValue::Wrapped(_)));
    }

    #[rstest]
    fn test_unwrap_recurses_through_nested_containers() {
        let value = FieldValue::from_json(&json!({
            "outer": {
                "fields": {
                    "inner": { "type": "t", "fields": { "leaf": "7" } },
                },
            },
        }));
        let unwrapped = value.unwrap_indirections();
        let FieldValue::Map(map) = unwrapped else {
            panic!("expected map");
        };
        let FieldValue::Map(outer) = &map["outer"] else {
            panic!("expected unwrapped outer map");
        };
        let FieldValue::Map(inner) = &outer["inner"] else {
            panic!("expected unwrapped inner map");
        };
        assert_eq!(inner["leaf"], FieldValue::Text("7".to_string()));
    }

    #[rstest]
    fn test_merge_primary_wins() {
        let mut primary = FieldMap::default();
        primary.insert("name".to_string(), FieldValue::Text("A".to_string()));
        let mut child = FieldMap::default();
        child.insert("name".to_string(), FieldValue::Text("B".to_string()));
        child.insert("extra".to_string(), FieldValue::Number(1));

        let merged = merge_field_maps(primary, vec![child], MergePrecedence::PrimaryWins);
        assert_eq!(merged["name"], FieldValue::Text("A".to_string()));
        assert_eq!(merged["extra"], FieldValue::Number(1));
    }

    #[rstest]
    fn test_merge_child_wins() {
        let mut primary = FieldMap::default();
        primary.insert("name".to_string(), FieldValue::Text("A".to_string()));
        let mut child = FieldMap::default();
        child.insert("name".to_string(), FieldValue::Text("B".to_string()));

        let merged = merge_field_maps(primary, vec![child], MergePrecedence::ChildWins);
        assert_eq!(merged["name"], FieldValue::Text("B".to_string()));
    }

    #[rstest]
    fn test_later_child_overwrites_earlier() {
        let mut first = FieldMap::default();
        first.insert("k".to_string(), FieldValue::Number(1));
        let mut second = FieldMap::default();
        second.insert("k".to_string(), FieldValue::Number(2));

        let merged = merge_field_maps(
            FieldMap::default(),
            vec![first, second],
            MergePrecedence::PrimaryWins,
        );
        assert_eq!(merged["k"], FieldValue::Number(2));
    }

    #[rstest]
    fn test_typed_accessors() {
        let snapshot = snapshot_from_json(json!({
            "name": "BTC/USD",
            "batch_size": "3",
            "history_size": 100,
            "disable_crank": false,
            "queue_addr": "0xq1",
            "job_keys": ["0xj1", "0xj2"],
            "variance_threshold": {
                "type": "decimal::Decimal",
                "fields": { "mantissa": "5", "scale": 2, "neg": false },
            },
        }));

        assert_eq!(snapshot.get_str("name").unwrap(), "BTC/USD");
        assert_eq!(snapshot.get_u64("batch_size").unwrap(), 3);
        assert_eq!(snapshot.get_u64("history_size").unwrap(), 100);
        assert!(!snapshot.get_bool("disable_crank").unwrap());
        assert_eq!(snapshot.get_id("queue_addr").unwrap().as_str(), "0xq1");
        assert_eq!(snapshot.get_id_list("job_keys").unwrap().len(), 2);
        assert_eq!(
            snapshot.get_decimal("variance_threshold").unwrap(),
            LedgerDecimal::new(5, 2, false)
        );
    }

    #[rstest]
    fn test_accessor_errors() {
        let snapshot = snapshot_from_json(json!({ "name": "x" }));
        assert!(matches!(
            snapshot.get_str("missing"),
            Err(FeedError::MissingField(_))
        ));
        assert!(matches!(
            snapshot.get_u64("name"),
            Err(FeedError::Decode(_))
        ));
    }
}
