//! Relational helpers over typed records.
//!
//! These mirror the SQL aggregate semantics the marts rely on: nulls are
//! skipped by `SUM`/`AVG`/`MIN`/`MAX` and `COUNT(DISTINCT ...)`, an empty
//! `SUM` is coalesced to zero and an empty `AVG` stays null.

use std::collections::{BTreeMap, BTreeSet};

/// Group rows by a key, keeping input order within each group.
pub fn group_by<'a, T, K, F>(rows: &'a [T], key: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Pair every left row with its match in `lookup`, if any.
///
/// Left rows are never dropped; the right side is `None` when the key is
/// absent.
pub fn left_join<'a, L, K, R, F>(
    left: &'a [L],
    lookup: &'a BTreeMap<K, R>,
    key: F,
) -> Vec<(&'a L, Option<&'a R>)>
where
    K: Ord,
    F: Fn(&L) -> &K,
{
    left.iter().map(|row| (row, lookup.get(key(row)))).collect()
}

/// Number of distinct non-null values.
pub fn count_distinct<I, V>(values: I) -> i64
where
    I: IntoIterator<Item = Option<V>>,
    V: Ord,
{
    let distinct: BTreeSet<V> = values.into_iter().flatten().collect();
    distinct.len() as i64
}

/// Sum of non-null values, zero when there are none.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// Mean of non-null values, `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (total, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

/// Count rows matching a predicate.
pub fn count_where<T, F>(rows: &[&T], predicate: F) -> i64
where
    F: Fn(&T) -> bool,
{
    rows.iter().filter(|row| predicate(**row)).count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_keeps_order() {
        let rows = [("a", 1), ("b", 2), ("a", 3)];
        let groups = group_by(&rows, |r| r.0);
        assert_eq!(groups["a"], vec![&("a", 1), &("a", 3)]);
        assert_eq!(groups["b"].len(), 1);
    }

    #[test]
    fn test_left_join_keeps_unmatched() {
        let left = ["x".to_string(), "y".to_string()];
        let mut right = BTreeMap::new();
        right.insert("x".to_string(), 10);
        let joined = left_join(&left, &right, |l| l);
        assert_eq!(joined[0].1, Some(&10));
        assert_eq!(joined[1].1, None);
    }

    #[test]
    fn test_aggregates_skip_nulls() {
        assert_eq!(count_distinct(vec![Some("a"), None, Some("a"), Some("b")]), 2);
        assert_eq!(sum(vec![Some(1.5), None, Some(2.5)]), 4.0);
        assert_eq!(sum(Vec::new()), 0.0);
        assert_eq!(mean(vec![Some(10.0), None, Some(20.0)]), Some(15.0));
        assert_eq!(mean(vec![None]), None);
    }

    #[test]
    fn test_count_where() {
        let values = [1, 2, 3, 4];
        let refs: Vec<&i32> = values.iter().collect();
        assert_eq!(count_where(&refs, |v| v % 2 == 0), 2);
    }
}
