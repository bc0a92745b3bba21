//! Keyed in-memory table of records

use crate::error::{Result, StoreError};
use crate::record::Record;
use crate::schema::{find_column, ColumnType, GroupKey, Query, Value};
use std::collections::BTreeMap;

/// Mean and standard deviation of one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStat {
    /// Group the statistics belong to
    pub group: GroupKey,
    /// Mean of the group's values
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Number of records in the group
    pub count: usize,
}

/// Records of one type, kept in insertion order and indexed by key
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    records: Vec<R>,
    index: BTreeMap<R::Key, usize>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: BTreeMap::new(),
        }
    }
}

impl<R: Record> Table<R> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; its key must be new
    pub fn insert(&mut self, record: R) -> Result<()> {
        let key = record.key().clone();
        if self.index.contains_key(&key) {
            return Err(StoreError::duplicate_key(key.to_string()));
        }
        log::trace!("insert {}", key);
        self.index.insert(key, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Insert every record, stopping at the first duplicate
    pub fn extend<I: IntoIterator<Item = R>>(&mut self, records: I) -> Result<()> {
        records.into_iter().try_for_each(|record| self.insert(record))
    }

    /// Record with the given key
    pub fn get(&self, key: &R::Key) -> Result<&R> {
        self.index
            .get(key)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| StoreError::key_not_found(key.to_string()))
    }

    /// Remove and return the record with the given key
    pub fn remove(&mut self, key: &R::Key) -> Result<R> {
        let pos = self
            .index
            .remove(key)
            .ok_or_else(|| StoreError::key_not_found(key.to_string()))?;
        let record = self.records.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        log::trace!("removed {}", key);
        Ok(record)
    }

    /// Whether a key is present
    pub fn contains(&self, key: &R::Key) -> bool {
        self.index.contains_key(key)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.index.keys()
    }

    /// New table holding the records that match `query`
    pub fn filter(&self, query: &Query) -> Result<Self> {
        for column in query.columns() {
            find_column(R::SCHEMA, column)?;
        }
        let mut matched = Self::new();
        for record in &self.records {
            let accepted = query.constraints().all(|(column, values)| {
                record
                    .get(column)
                    .is_some_and(|value| values.contains(&value))
            });
            if accepted {
                matched.insert(record.clone())?;
            }
        }
        log::debug!("filter kept {} of {} record(s)", matched.len(), self.len());
        Ok(matched)
    }

    /// All values of one column, in insertion order
    pub fn column(&self, name: &str) -> Result<Vec<Value>> {
        find_column(R::SCHEMA, name)?;
        Ok(self
            .records
            .iter()
            .filter_map(|record| record.get(name))
            .collect())
    }

    /// Numeric values of the `value` column
    pub fn values(&self) -> Result<Vec<f64>> {
        self.numeric_column("value")
    }

    /// Numeric values of any integer or float column
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = find_column(R::SCHEMA, name)?;
        if column.ty == ColumnType::Text {
            return Err(StoreError::type_mismatch(name, "number", column.ty.to_string()));
        }
        Ok(self
            .records
            .iter()
            .filter_map(|record| record.get(name).and_then(|v| v.as_f64()))
            .collect())
    }

    /// Mean and standard deviation of `value_column`, grouped by `group_by`
    ///
    /// Groups are returned in ascending key order.
    pub fn group_stats(&self, group_by: &str, value_column: &str) -> Result<Vec<GroupStat>> {
        let group_column = find_column(R::SCHEMA, group_by)?;
        if group_column.ty == ColumnType::Float {
            return Err(StoreError::type_mismatch(
                group_by,
                "text or integer",
                group_column.ty.to_string(),
            ));
        }
        // validates the value column
        self.numeric_column(value_column)?;

        let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
        for record in &self.records {
            let key = record.get(group_by).and_then(GroupKey::from_value);
            let value = record.get(value_column).and_then(|v| v.as_f64());
            if let (Some(key), Some(value)) = (key, value) {
                groups.entry(key).or_default().push(value);
            }
        }
        if groups.is_empty() {
            return Err(StoreError::empty(format!("no values in {}", value_column)));
        }

        Ok(groups
            .into_iter()
            .map(|(group, values)| {
                let count = values.len();
                let mean = values.iter().sum::<f64>() / count as f64;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
                GroupStat {
                    group,
                    mean,
                    std: var.sqrt(),
                    count,
                }
            })
            .collect())
    }
}

impl<R: Record> FromIterator<R> for Table<R> {
    /// Later records with an already seen key are dropped
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            if let Err(err) = table.insert(record) {
                log::warn!("skipping record: {}", err);
            }
        }
        table
    }
}

impl<'a, R: Record> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Entry, ScoreEntry};

    fn scores() -> Table<ScoreEntry> {
        let mut table = Table::new();
        table
            .extend([
                ScoreEntry::new("a", "x", 1, 1.0),
                ScoreEntry::new("b", "x", 1, 3.0),
                ScoreEntry::new("c", "y", 2, 5.0),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = Table::new();
        table.insert(Entry::new("k1", "first", 0.5)).unwrap();
        assert_eq!(table.get(&"k1".to_string()).unwrap().value, 0.5);
        assert_eq!(
            table.insert(Entry::new("k1", "again", 1.0)),
            Err(StoreError::duplicate_key("k1"))
        );
        assert_eq!(
            table.get(&"k2".to_string()).unwrap_err(),
            StoreError::key_not_found("k2")
        );
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut table = scores();
        let removed = table.remove(&"a".to_string()).unwrap();
        assert_eq!(removed.value, 1.0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&"c".to_string()).unwrap().cond_id, 2);
        assert!(table.remove(&"a".to_string()).is_err());
    }

    #[test]
    fn test_filter() {
        let table = scores();
        let picked = table
            .filter(&Query::new().with("label", ["x"]).with("cond_id", [1i64, 2]))
            .unwrap();
        assert_eq!(picked.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);

        assert_eq!(table.filter(&Query::new()).unwrap().len(), 3);
        assert_eq!(
            table.filter(&Query::new().with("colour", ["red"])).unwrap_err(),
            StoreError::unknown_column("colour")
        );
    }

    #[test]
    fn test_columns_and_values() {
        let table = scores();
        assert_eq!(table.values().unwrap(), vec![1.0, 3.0, 5.0]);
        assert_eq!(
            table.column("label").unwrap(),
            vec![Value::from("x"), Value::from("x"), Value::from("y")]
        );
        assert!(matches!(
            table.numeric_column("label"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_group_stats() {
        let stats = scores().group_stats("cond_id", "value").unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].group, GroupKey::Integer(1));
        assert_eq!(stats[0].mean, 2.0);
        assert_eq!(stats[0].std, 1.0);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].std, 0.0);

        assert!(matches!(
            Table::<ScoreEntry>::new().group_stats("cond_id", "value"),
            Err(StoreError::Empty { .. })
        ));
        assert!(matches!(
            scores().group_stats("value", "value"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_iterator_drops_duplicates() {
        let table: Table<Entry> = vec![Entry::new("k", "a", 1.0), Entry::new("k", "b", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"k".to_string()).unwrap().label, "a");
    }
}
