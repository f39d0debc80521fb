use std::collections::HashMap;
use std::hash::Hash;

use crate::processing::statistics;

/// How a group of values is reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Median,
}

impl Reducer {
    pub fn label(&self) -> &'static str {
        match self {
            Reducer::Mean => "Mean",
            Reducer::Median => "Median",
        }
    }

    /// Reduce one group. `None` on an empty group, so a combination
    /// with no data never inherits a value from a previous one.
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Reducer::Mean => statistics::mean(values),
            Reducer::Median => Some(statistics::median(values)),
        }
    }
}

/// Partition items by a key, preserving first-seen key order.
pub fn group_by<T, K, F>(items: &[T], mut key_fn: F) -> Vec<(K, Vec<&T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();
    for item in items {
        let key = key_fn(item);
        match slots.get(&key) {
            Some(&i) => groups[i].1.push(item),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }
    groups
}

/// Group rows by a key, extract a numeric value per row, reduce each
/// group. Rows with a missing value are dropped before reduction, and a
/// group with no usable values produces no entry at all.
pub fn aggregate<T, K, KF, VF>(
    items: &[T],
    key_fn: KF,
    mut value_fn: VF,
    reducer: Reducer,
) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    KF: FnMut(&T) -> K,
    VF: FnMut(&T) -> Option<f64>,
{
    let mut out = Vec::new();
    for (key, members) in group_by(items, key_fn) {
        let values: Vec<f64> = members.iter().copied().filter_map(|m| value_fn(m)).collect();
        if let Some(reduced) = reducer.reduce(&values) {
            out.push((key, reduced));
        }
    }
    out
}

/// Two-level rollup: group by an outer key, then aggregate each group
/// by an inner key. Both levels keep first-seen order.
pub fn rollup2<T, K1, K2, F1, F2, VF>(
    items: &[T],
    outer_fn: F1,
    mut inner_fn: F2,
    mut value_fn: VF,
    reducer: Reducer,
) -> Vec<(K1, Vec<(K2, f64)>)>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
    F1: FnMut(&T) -> K1,
    F2: FnMut(&T) -> K2,
    VF: FnMut(&T) -> Option<f64>,
{
    group_by(items, outer_fn)
        .into_iter()
        .map(|(key, members)| {
            let inner = aggregate(&members, |m| inner_fn(m), |m| value_fn(m), reducer);
            (key, inner)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn group_by_keeps_insertion_order() {
        let items = ["b", "a", "b", "c", "a"];
        let groups = group_by(&items, |s| s.to_string());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[2].1.len(), 1);
    }

    #[test]
    fn aggregate_by_mean() {
        let rows = [("x", 1.0), ("y", 10.0), ("x", 3.0)];
        let out = aggregate(&rows, |r| r.0, |r| Some(r.1), Reducer::Mean);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "x");
        assert!((out[0].1 - 2.0).abs() < 1e-9);
        assert!((out[1].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn aggregate_median_order_invariant() {
        let rows = [("a", 5.0), ("a", 1.0), ("a", 9.0), ("b", 2.0)];
        let shuffled = [("b", 2.0), ("a", 9.0), ("a", 5.0), ("a", 1.0)];
        let lhs = aggregate(&rows, |r| r.0, |r| Some(r.1), Reducer::Median);
        let rhs = aggregate(&shuffled, |r| r.0, |r| Some(r.1), Reducer::Median);
        for (key, value) in &lhs {
            let other = rhs.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
            assert_eq!(other, Some(*value));
        }
    }

    #[test]
    fn aggregate_drops_missing_values() {
        let rows = [("a", Some(2.0)), ("a", None), ("a", Some(4.0)), ("b", None)];
        let out = aggregate(&rows, |r| r.0, |r| r.1, Reducer::Mean);
        // group "b" had no usable values, so it must not appear
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "a");
        assert!((out[0].1 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn reducer_empty_group_is_none() {
        assert_eq!(Reducer::Mean.reduce(&[]), None);
        assert_eq!(Reducer::Median.reduce(&[]), None);
    }

    #[test]
    fn rollup2_nests_in_order() {
        // (date, series, value)
        let rows = [
            (1, "house", 100.0),
            (1, "unit", 50.0),
            (2, "house", 120.0),
            (1, "house", 110.0),
        ];
        let out = rollup2(&rows, |r| r.0, |r| r.1, |r| Some(r.2), Reducer::Median);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, 1);
        assert_eq!(out[0].1.len(), 2);
        assert_eq!(out[0].1[0].0, "house");
        assert!((out[0].1[0].1 - 105.0).abs() < 1e-9);
        assert!((out[0].1[1].1 - 50.0).abs() < 1e-9);
        assert_eq!(out[1].0, 2);
        assert!((out[1].1[0].1 - 120.0).abs() < 1e-9);
    }
}
