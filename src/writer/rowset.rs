use std::collections::BTreeMap;

use crate::mapper::Row;

/// Rows deduplicated by natural key. The first row seen for a key wins and
/// iteration follows key order, so repeated loads insert identically.
#[derive(Debug, Clone)]
pub struct RowSet<K: Ord> {
    rows: BTreeMap<K, Row>,
}

impl<K: Ord> RowSet<K> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Returns false when the key was already present
    pub fn insert(&mut self, key: K, row: Row) -> bool {
        match self.rows.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(row);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows.into_values().collect()
    }
}

impl<K: Ord> Default for RowSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::SqlValue;

    #[test]
    fn test_first_occurrence_wins() {
        let mut set = RowSet::new();
        assert!(set.insert(5, Row::new(vec![SqlValue::Text("first".into())])));
        assert!(!set.insert(5, Row::new(vec![SqlValue::Text("second".into())])));
        assert!(set.insert(2, Row::new(vec![SqlValue::Text("other".into())])));

        assert_eq!(set.len(), 2);
        let rows = set.into_rows();
        assert_eq!(rows[0].values[0], SqlValue::Text("other".into()));
        assert_eq!(rows[1].values[0], SqlValue::Text("first".into()));
    }
}
