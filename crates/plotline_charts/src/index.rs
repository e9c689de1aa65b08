//! Per-key buckets over the global flat list.

use rustc_hash::FxHashMap;

use crate::key::{Key, KeyId, KeyOrder};
use crate::series::FlatPoint;

// Relative (to the key span) slack when snapping an inverted continuous key
// back onto an existing bucket key.
const SNAP_EPSILON: f64 = 1e-9;

/// All points sharing one key, in flat order.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyBucket {
    pub key: Key,
    pub series: Vec<FlatPoint>,
}

impl KeyBucket {
    /// Sum of the non-null values in this bucket.
    pub fn total(&self) -> f64 {
        self.series.iter().filter_map(|p| p.value).sum()
    }
}

/// Ordered sequence of [`KeyBucket`]s (`dataByKey`).
#[derive(Clone, Debug, PartialEq)]
pub struct KeyIndex {
    buckets: Vec<KeyBucket>,
    order: KeyOrder,
    snap: f64,
}

impl KeyIndex {
    /// Groups `flat` by exact key equality, keeping first-occurrence order.
    ///
    /// `flat` is expected to be ordered by `order` already, so buckets come
    /// out ordered as well and bisection over them is valid.
    pub fn build(flat: &[FlatPoint], order: KeyOrder) -> Self {
        let mut slots: FxHashMap<KeyId, usize> = FxHashMap::default();
        let mut buckets: Vec<KeyBucket> = Vec::new();
        for p in flat {
            let slot = *slots.entry(p.key.id()).or_insert_with(|| {
                buckets.push(KeyBucket {
                    key: p.key.clone(),
                    series: Vec::new(),
                });
                buckets.len() - 1
            });
            buckets[slot].series.push(p.clone());
        }

        let snap = match (
            buckets.first().and_then(|b| b.key.as_f64()),
            buckets.last().and_then(|b| b.key.as_f64()),
        ) {
            // Keys near ±f64::MAX overflow the span; cap it so snap stays finite.
            (Some(a), Some(b)) => (b - a).abs().min(f64::MAX) * SNAP_EPSILON,
            _ => 0.0,
        };

        Self {
            buckets,
            order,
            snap,
        }
    }

    pub fn buckets(&self) -> &[KeyBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&KeyBucket> {
        self.buckets.get(idx)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.buckets.iter().map(|b| &b.key)
    }

    pub fn order(&self) -> &KeyOrder {
        &self.order
    }

    /// Index of the first bucket whose key is `>= key`.
    pub fn bisect_left(&self, key: &Key) -> usize {
        self.order.bisect_left(&self.buckets, key, |b| &b.key)
    }

    /// Bucket index for `key` under left bisection, or `None` past the end.
    ///
    /// A continuous query that lands within floating error just above a
    /// bucket key resolves to that bucket, so `lookup(invert(map(k)))` finds `k`.
    pub fn lookup_index(&self, key: &Key) -> Option<usize> {
        let i = self.bisect_left(key);
        if i > 0 {
            if let (Some(prev), Some(q)) = (self.buckets[i - 1].key.as_f64(), key.as_f64()) {
                if (q - prev).abs() <= self.snap {
                    return Some(i - 1);
                }
            }
        }
        (i < self.buckets.len()).then_some(i)
    }

    pub fn lookup(&self, key: &Key) -> Option<&KeyBucket> {
        self.lookup_index(key).map(|i| &self.buckets[i])
    }

    /// Index of the bucket with exactly this key.
    pub fn position(&self, key: &Key) -> Option<usize> {
        let i = self.bisect_left(key);
        self.buckets
            .get(i)
            .filter(|b| b.key.id() == key.id())
            .map(|_| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeyConfig, KeyType};
    use crate::normalize::normalize;
    use crate::series::{RawPoint, RawSeries};

    fn index_of(raw: &[RawSeries], key_type: KeyType) -> KeyIndex {
        let cfg = KeyConfig::new(key_type);
        let n = normalize(raw, &cfg).unwrap();
        KeyIndex::build(&n.flat, KeyOrder::new(&cfg))
    }

    fn numeric() -> Vec<RawSeries> {
        vec![
            RawSeries::new("x", vec![RawPoint::new(1.0, Some(10.0)), RawPoint::new(2.0, Some(20.0))]),
            RawSeries::new("y", vec![RawPoint::new(1.0, Some(5.0)), RawPoint::new(4.0, None)]),
        ]
    }

    #[test]
    fn buckets_group_equal_keys_in_order() {
        let idx = index_of(&numeric(), KeyType::Number);
        let keys: Vec<f64> = idx.keys().filter_map(Key::as_f64).collect();
        assert_eq!(keys, vec![1.0, 2.0, 4.0]);
        let first = idx.get(0).unwrap();
        let ids: Vec<&str> = first.series.iter().map(|p| &*p.id).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(first.total(), 15.0);
    }

    #[test]
    fn lookup_uses_left_bisection() {
        let idx = index_of(&numeric(), KeyType::Number);
        assert_eq!(idx.lookup(&Key::Number(1.5)).unwrap().key, Key::Number(2.0));
        assert_eq!(idx.lookup(&Key::Number(0.0)).unwrap().key, Key::Number(1.0));
        assert!(idx.lookup(&Key::Number(4.5)).is_none());
    }

    #[test]
    fn lookup_absorbs_floating_error_just_above_a_key() {
        let idx = index_of(&numeric(), KeyType::Number);
        let q = Key::Number(2.0 + 1e-12);
        assert_eq!(idx.lookup(&q).unwrap().key, Key::Number(2.0));
    }

    #[test]
    fn extreme_keys_do_not_snap_everything_to_the_first_bucket() {
        let raw = vec![RawSeries::new(
            "s",
            vec![RawPoint::new(-f64::MAX, Some(1.0)), RawPoint::new(f64::MAX, Some(2.0))],
        )];
        let idx = index_of(&raw, KeyType::Number);
        assert!(idx.snap.is_finite());
        assert_eq!(idx.lookup_index(&Key::Number(0.0)), Some(1));
        assert_eq!(idx.lookup_index(&Key::Number(-f64::MAX)), Some(0));
    }

    #[test]
    fn time_buckets_use_instant_equality() {
        let raw = vec![
            RawSeries::new("a", vec![RawPoint::new("2024-01-01T00:00:00Z", Some(1.0))]),
            RawSeries::new("b", vec![RawPoint::new("2024-01-01 02:00:00", Some(1.0))]),
            RawSeries::new("c", vec![RawPoint::new("2024-01-01T04:00:00+02:00", Some(1.0))]),
        ];
        let idx = index_of(&raw, KeyType::Time);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get(1).unwrap().series.len(), 2);
    }

    #[test]
    fn position_requires_exact_key() {
        let idx = index_of(&numeric(), KeyType::Number);
        assert_eq!(idx.position(&Key::Number(4.0)), Some(2));
        assert_eq!(idx.position(&Key::Number(3.0)), None);
    }
}
