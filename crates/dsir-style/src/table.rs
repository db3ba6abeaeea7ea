//! Run-scoped content-addressed style table
//!
//! [`GlobalVariableTable`] interns [`StyleRecord`]s by the Blake3 hash of
//! their canonical bytes. One table belongs to exactly one conversion run;
//! it is never shared, persisted or evicted from.

use crate::error::StyleError;
use crate::hash::ContentHash;
use crate::record::StyleRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Prefix of every variable identifier
pub const VAR_ID_PREFIX: &str = "style_";

/// Stable identifier of one distinct style record within a run
///
/// Derived from content: `style_` followed by the first 16 hex chars of the
/// record hash, or the full 64 when that prefix is already taken by
/// different content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VarId(String);

impl VarId {
    fn short(hash: &ContentHash) -> Self {
        Self(format!("{VAR_ID_PREFIX}{}", hash.short()))
    }

    fn full(hash: &ContentHash) -> Self {
        Self(format!("{VAR_ID_PREFIX}{hash}"))
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for VarId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Final snapshot of a table, in first-interned order
pub type GlobalVars = IndexMap<VarId, StyleRecord>;

/// Append-only intern table mapping [`VarId`] to [`StyleRecord`]
///
/// # Invariants
/// - content-equal records always receive the same id
/// - distinct contents never share an id
/// - entries are never removed or replaced
#[derive(Debug, Default)]
pub struct GlobalVariableTable {
    by_content: HashMap<ContentHash, VarId>,
    entries: GlobalVars,
}

impl GlobalVariableTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a record, returning its id
    ///
    /// The first occurrence of a content allocates an id; later
    /// occurrences return the existing one without adding an entry.
    ///
    /// # Errors
    /// Returns error if the record cannot be canonically encoded
    pub fn intern(&mut self, record: StyleRecord) -> Result<VarId, StyleError> {
        let hash = ContentHash::compute(&record.canonical_bytes()?);
        if let Some(id) = self.by_content.get(&hash) {
            return Ok(id.clone());
        }

        let mut id = VarId::short(&hash);
        if self.entries.contains_key(&id) {
            id = VarId::full(&hash);
        }
        self.by_content.insert(hash, id.clone());
        self.entries.insert(id.clone(), record);
        Ok(id)
    }

    /// Look up one entry
    #[inline]
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&StyleRecord> {
        self.entries.get(id)
    }

    /// Whether `id` has been allocated
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of distinct records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been interned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the table, yielding the final snapshot
    #[inline]
    #[must_use]
    pub fn into_global_vars(self) -> GlobalVars {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Paint;
    use crate::value::{Color, Scalar};

    fn filled(r: f64, g: f64, b: f64) -> StyleRecord {
        StyleRecord {
            fills: vec![Paint::Solid(Color::from_unit(r, g, b, 1.0))],
            ..StyleRecord::default()
        }
    }

    #[test]
    fn intern_dedups_equal_content() {
        let mut table = GlobalVariableTable::new();
        let a = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        let b = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn intern_separates_distinct_content() {
        let mut table = GlobalVariableTable::new();
        let red = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        let blue = table.intern(filled(0.0, 0.0, 1.0)).unwrap();
        assert_ne!(red, blue);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn var_id_shape() {
        let mut table = GlobalVariableTable::new();
        let id = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        assert!(id.as_str().starts_with(VAR_ID_PREFIX));
        assert_eq!(id.as_str().len(), VAR_ID_PREFIX.len() + 16);
    }

    #[test]
    fn ids_are_stable_across_tables() {
        let mut first = GlobalVariableTable::new();
        let mut second = GlobalVariableTable::new();
        let opacity = StyleRecord {
            opacity: Scalar::new(0.5),
            ..StyleRecord::default()
        };
        assert_eq!(
            first.intern(opacity.clone()).unwrap(),
            second.intern(opacity).unwrap()
        );
    }

    #[test]
    fn resolve_returns_interned_record() {
        let mut table = GlobalVariableTable::new();
        let record = filled(0.0, 1.0, 0.0);
        let id = table.intern(record.clone()).unwrap();
        assert!(table.contains(id.as_str()));
        assert_eq!(table.resolve(id.as_str()), Some(&record));
        assert_eq!(table.resolve("style_missing"), None);
    }

    #[test]
    fn snapshot_preserves_first_interned_order() {
        let mut table = GlobalVariableTable::new();
        let blue = table.intern(filled(0.0, 0.0, 1.0)).unwrap();
        let red = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        table.intern(filled(0.0, 0.0, 1.0)).unwrap();

        let vars = table.into_global_vars();
        let keys: Vec<_> = vars.keys().cloned().collect();
        assert_eq!(keys, vec![blue, red]);
    }

    #[test]
    fn snapshot_serializes_as_object() {
        let mut table = GlobalVariableTable::new();
        let id = table.intern(filled(1.0, 0.0, 0.0)).unwrap();
        let json = serde_json::to_value(table.into_global_vars()).unwrap();
        assert_eq!(json[id.as_str()]["fills"][0]["color"], "#FF0000");
    }
}
