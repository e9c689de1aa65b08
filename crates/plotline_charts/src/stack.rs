//! Cumulative stacking for additive chart variants.
//!
//! Series stack in insertion order with a zero baseline: no reordering, no
//! centering, no normalization.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::NullPolicy;
use crate::group::Axis;
use crate::index::KeyIndex;
use crate::key::Key;
use crate::series::Series;

/// One stacked row per key bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct StackRow {
    pub key: Key,
    /// Value per series id; `None` is a retained null, excluded from the sum.
    pub values: IndexMap<Arc<str>, Option<f64>>,
    /// `[y0, y1]` band per series id, `None` where the value is `None`.
    pub bands: IndexMap<Arc<str>, Option<(f64, f64)>>,
    pub total: f64,
}

impl StackRow {
    pub fn band(&self, id: &str) -> Option<(f64, f64)> {
        self.bands.get(id).copied().flatten()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackLayout {
    pub axis: Axis,
    /// Rows aligned with the key index: `rows[i]` stacks bucket `i`.
    pub rows: Vec<StackRow>,
    /// Min and max over every band edge and zero. Equals `[0, max total]` only
    /// when all values are non-negative.
    pub y_domain: (f64, f64),
}

impl StackLayout {
    /// Stacks the series at `members` (indices into `series`) over every bucket.
    pub fn build(index: &KeyIndex, series: &[Series], members: &[usize], policy: NullPolicy) -> Self {
        let ids: Vec<Arc<str>> = members
            .iter()
            .filter_map(|&i| series.get(i).map(|s| s.id.clone()))
            .collect();

        let mut rows = Vec::with_capacity(index.len());
        let mut lo = 0.0f64;
        let mut hi = 0.0f64;

        for bucket in index.buckets() {
            // None: series absent at this key; Some(None): present but null.
            let mut seen: IndexMap<Arc<str>, Option<Option<f64>>> =
                ids.iter().map(|id| (id.clone(), None)).collect();
            for p in bucket.series.iter().filter(|p| members.contains(&p.series)) {
                if let Some(slot) = seen.get_mut(&*p.id) {
                    // Duplicate keys within one series add up.
                    *slot = Some(match (slot.flatten(), p.value) {
                        (Some(a), Some(b)) => Some(a + b),
                        (a, b) => a.or(b),
                    });
                }
            }

            let mut values = IndexMap::with_capacity(ids.len());
            let mut bands = IndexMap::with_capacity(ids.len());
            let mut cur = 0.0f64;
            for (id, v) in seen {
                let v = match policy {
                    NullPolicy::Zero => Some(v.flatten().unwrap_or(0.0)),
                    NullPolicy::Retain => v.flatten(),
                };
                let band = v.map(|v| {
                    let b = (cur, cur + v);
                    cur += v;
                    lo = lo.min(b.0.min(b.1));
                    hi = hi.max(b.0.max(b.1));
                    b
                });
                values.insert(id.clone(), v);
                bands.insert(id, band);
            }

            rows.push(StackRow {
                key: bucket.key.clone(),
                values,
                bands,
                total: cur,
            });
        }

        // The domain spans every band edge and zero. With mixed signs `hi`
        // can exceed the largest row total.
        Self {
            axis: Axis::Primary,
            rows,
            y_domain: (lo, hi),
        }
    }

    pub fn on_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn row(&self, idx: usize) -> Option<&StackRow> {
        self.rows.get(idx)
    }

    pub fn series_ids(&self) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.rows.first().into_iter().flat_map(|r| r.bands.keys())
    }

    /// `(key, band)` for one series across all rows.
    pub fn series_bands<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (&'a Key, Option<(f64, f64)>)> + 'a {
        self.rows.iter().map(move |r| (&r.key, r.band(id)))
    }
}
