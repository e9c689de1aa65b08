//! Normalization: clone, coerce and order raw series.
//!
//! The caller's series are only borrowed; every output value is freshly built,
//! so the normalized data never aliases input.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::config::{InvalidKeyPolicy, KeyConfig, KeyType};
use crate::error::{ChartError, Result};
use crate::key::{finite_number, parse_number, parse_time, Key, KeyOrder};
use crate::series::{DataPoint, FlatPoint, RawScalar, RawSeries, Series};

/// Output of [`normalize`].
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedData {
    pub by_series: Vec<Series>,
    /// All points of all series, ordered by key (stable across series order).
    pub flat: Vec<FlatPoint>,
    /// Points dropped under [`InvalidKeyPolicy::Skip`].
    pub skipped: usize,
}

/// Coerces a raw key under the declared key type.
pub fn coerce_key(raw: &RawScalar, key_type: KeyType) -> Option<Key> {
    match (key_type, raw) {
        (KeyType::Time, RawScalar::Number(ms)) => Key::time_from_millis(*ms),
        (KeyType::Time, RawScalar::Text(s)) => parse_time(s)
            .map(Key::Time)
            .or_else(|| parse_number(s).and_then(Key::time_from_millis)),
        (KeyType::Number, RawScalar::Number(v)) => finite_number(*v).map(Key::Number),
        (KeyType::Number, RawScalar::Text(s)) => parse_number(s).map(Key::Number),
        (KeyType::Category, RawScalar::Text(s)) => Some(Key::Category(s.clone())),
        (KeyType::Category, RawScalar::Number(v)) => Some(Key::Category(format!("{v}"))),
    }
}

/// Coerces a raw value to a number; `null` stays `None`.
///
/// The outer `Err` means the value was present but not numeric.
pub(crate) fn coerce_value(raw: Option<&RawScalar>) -> std::result::Result<Option<f64>, ()> {
    match raw {
        None => Ok(None),
        Some(RawScalar::Number(v)) => finite_number(*v).map(Some).ok_or(()),
        Some(RawScalar::Text(s)) => parse_number(s).map(Some).ok_or(()),
    }
}

/// Builds the canonical, ordered representation of `raw`.
pub fn normalize(raw: &[RawSeries], config: &KeyConfig) -> Result<NormalizedData> {
    let order = KeyOrder::new(config);
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut by_series = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;

    for rs in raw {
        if !seen.insert(rs.id.as_str()) {
            return Err(ChartError::DuplicateSeriesId { id: rs.id.clone() });
        }

        let mut values = Vec::with_capacity(rs.values.len());
        for (index, p) in rs.values.iter().enumerate() {
            let key = coerce_key(&p.key, config.key_type);
            let value = coerce_value(p.value.as_ref());
            let err = match (key, value) {
                (Some(key), Ok(value)) => {
                    values.push(DataPoint { key, value });
                    continue;
                }
                (None, _) => ChartError::UnparsableKey {
                    series: rs.id.clone(),
                    index,
                    raw: p.key.to_string(),
                    key_type: config.key_type.as_str(),
                },
                (Some(_), Err(())) => ChartError::UnparsableValue {
                    series: rs.id.clone(),
                    index,
                    raw: p.value.as_ref().map(|v| v.to_string()).unwrap_or_default(),
                },
            };
            match config.invalid_keys {
                InvalidKeyPolicy::Reject => return Err(err),
                InvalidKeyPolicy::Skip => {
                    warn!("skipping point: {err}");
                    skipped += 1;
                }
            }
        }

        // Stable: duplicate keys keep their input order.
        values.sort_by(|a, b| order.compare(&a.key, &b.key));

        let id: Arc<str> = Arc::from(rs.id.as_str());
        let label: Arc<str> = match &rs.label {
            Some(l) => Arc::from(l.as_str()),
            None => id.clone(),
        };
        let group: Arc<str> = Arc::from(rs.group.as_deref().unwrap_or(""));
        by_series.push(Series {
            id,
            label,
            group,
            values,
        });
    }

    let mut flat: Vec<FlatPoint> = by_series
        .iter()
        .enumerate()
        .flat_map(|(si, s)| {
            s.values.iter().map(move |p| FlatPoint {
                series: si,
                id: s.id.clone(),
                label: s.label.clone(),
                group: s.group.clone(),
                key: p.key.clone(),
                value: p.value,
            })
        })
        .collect();
    flat.sort_by(|a, b| order.compare(&a.key, &b.key));

    debug!(
        series = by_series.len(),
        points = flat.len(),
        skipped,
        key_type = %config.key_type,
        "normalized series"
    );

    Ok(NormalizedData {
        by_series,
        flat,
        skipped,
    })
}
