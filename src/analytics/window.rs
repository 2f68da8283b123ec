//! Partitioned window helpers
//!
//! Windowed aggregation (`SUM/AVG/LAG ... OVER (PARTITION BY .. ORDER BY ..)`)
//! is expressed as: group records into partitions keyed by an ordered key,
//! sort each partition by its order key, then run one pass per partition.

use std::collections::BTreeMap;

/// Group items into partitions, each sorted by `order_key`
///
/// Partitions iterate in ascending key order. Sorting within a partition is
/// stable, so equal order keys keep their input order.
pub fn partition_by<T, K, O, FK, FO>(items: Vec<T>, partition_key: FK, order_key: FO) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    O: Ord,
    FK: Fn(&T) -> K,
    FO: Fn(&T) -> O,
{
    let mut partitions: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        partitions.entry(partition_key(&item)).or_default().push(item);
    }
    for rows in partitions.values_mut() {
        rows.sort_by_key(|row| order_key(row));
    }
    partitions
}

/// Running sum over an ordered sequence
pub fn running_sum<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = 0.0;
    values
        .into_iter()
        .map(|v| {
            acc += v;
            acc
        })
        .collect()
}

/// Running mean over an ordered sequence (mean of everything up to and including each item)
pub fn running_mean<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect()
}

/// Previous value for each position, `None` for the first
pub fn lag<T: Copy>(values: &[T]) -> Vec<Option<T>> {
    let mut previous = None;
    values
        .iter()
        .map(|&v| {
            let out = previous;
            previous = Some(v);
            out
        })
        .collect()
}

/// Arithmetic mean, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
