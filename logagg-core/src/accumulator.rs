//! Grouping accumulator
//!
//! Hash map from key to the samples seen for it, in arrival order. Keys are
//! only sorted once, when the accumulator is consumed.

use crate::extract::GroupKey;
use fxhash::FxHashMap;
use std::collections::BTreeMap;

/// Samples per group, sorted by key
pub type Groups = BTreeMap<GroupKey, Vec<f64>>;

/// Mutable key → samples map for one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct GroupAccumulator {
    groups: FxHashMap<GroupKey, Vec<f64>>,
}

impl GroupAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the group for `key`, creating the group if new
    pub fn push(&mut self, key: GroupKey, value: f64) {
        self.groups.entry(key).or_default().push(value);
    }

    /// Samples recorded for `key`
    pub fn get(&self, key: &GroupKey) -> Option<&[f64]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True before the first sample
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Samples across all groups
    pub fn total_samples(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Consume into a key-ordered map
    pub fn into_sorted(self) -> Groups {
        self.groups.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_creates_and_appends() {
        let mut acc = GroupAccumulator::new();
        acc.push(GroupKey::text("a"), 10.0);
        acc.push(GroupKey::text("b"), 5.0);
        acc.push(GroupKey::text("a"), 20.0);

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.total_samples(), 3);
        assert_eq!(acc.get(&GroupKey::text("a")), Some(&[10.0, 20.0][..]));
        assert_eq!(acc.get(&GroupKey::text("z")), None);
    }

    #[test]
    fn test_into_sorted_orders_keys() {
        let mut acc = GroupAccumulator::new();
        for key in [30.0, 10.0, 20.0] {
            acc.push(GroupKey::number(key), key);
        }
        let keys: Vec<GroupKey> = acc.into_sorted().into_keys().collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::number(10.0),
                GroupKey::number(20.0),
                GroupKey::number(30.0)
            ]
        );
    }

    #[test]
    fn test_empty() {
        let acc = GroupAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.into_sorted().is_empty());
    }
}
