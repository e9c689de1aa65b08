//! Canonical x keys and the comparator that orders them.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rustc_hash::FxHashMap;

use crate::config::{CategorySort, KeyConfig, KeyType};

/// A coerced x key. All keys of one chart share the configured [`KeyType`].
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Time(DateTime<Utc>),
    Number(f64),
    Category(String),
}

impl Key {
    /// Position on a continuous axis: epoch milliseconds for time, the value for numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Time(t) => {
                let sub_ms = f64::from(t.timestamp_subsec_nanos() % 1_000_000) / 1_000_000.0;
                Some(t.timestamp_millis() as f64 + sub_ms)
            }
            Self::Number(v) => Some(*v),
            Self::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(s) => Some(s),
            _ => None,
        }
    }

    /// Exact identity used for bucketing (instant equality for time).
    pub(crate) fn id(&self) -> KeyId {
        match self {
            Self::Time(t) => KeyId::Instant(t.timestamp(), t.timestamp_subsec_nanos()),
            Self::Number(v) => KeyId::Number(v.to_bits()),
            Self::Category(s) => KeyId::Category(s.clone()),
        }
    }

    /// Builds a time key from (fractional) epoch milliseconds.
    pub fn time_from_millis(ms: f64) -> Option<Self> {
        if !ms.is_finite() {
            return None;
        }
        let secs = (ms / 1000.0).floor();
        let nanos = ((ms - secs * 1000.0) * 1_000_000.0).round() as u32;
        let (secs, nanos) = if nanos >= 1_000_000_000 {
            (secs + 1.0, nanos - 1_000_000_000)
        } else {
            (secs, nanos)
        };
        Utc.timestamp_opt(secs as i64, nanos).single().map(Self::Time)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Number(v) => write!(f, "{v}"),
            Self::Category(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeyId {
    Instant(i64, u32),
    Number(u64),
    Category(String),
}

/// Ordered `[min, max]` pair of keys.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyExtent {
    pub start: Key,
    pub end: Key,
}

impl KeyExtent {
    pub fn new(start: Key, end: Key) -> Self {
        Self { start, end }
    }
}

/// Parses a time key: RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DD` (UTC).
pub fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parses a finite number, folding `-0` into `0` so equal keys bucket together.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().and_then(finite_number)
}

pub(crate) fn finite_number(v: f64) -> Option<f64> {
    if !v.is_finite() {
        return None;
    }
    Some(if v == 0.0 { 0.0 } else { v })
}

/// Comparator selected by key type.
///
/// The same ordering is used for every series, for the global flat list and
/// for bisection over bucket keys.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyOrder {
    key_type: KeyType,
    descending: bool,
    explicit: Option<FxHashMap<String, usize>>,
}

impl KeyOrder {
    pub fn new(config: &KeyConfig) -> Self {
        let (descending, explicit) = match &config.sort {
            CategorySort::Ascending => (false, None),
            CategorySort::Descending => (true, None),
            CategorySort::Explicit(order) => {
                let mut rank = FxHashMap::default();
                for (i, c) in order.iter().enumerate() {
                    rank.entry(c.clone()).or_insert(i);
                }
                (false, Some(rank))
            }
        };
        Self {
            key_type: config.key_type,
            // Only category keys honor a sort direction.
            descending: descending && config.key_type == KeyType::Category,
            explicit: explicit.filter(|_| config.key_type == KeyType::Category),
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn compare(&self, a: &Key, b: &Key) -> Ordering {
        match (a, b) {
            (Key::Time(a), Key::Time(b)) => a.cmp(b),
            (Key::Number(a), Key::Number(b)) => a.total_cmp(b),
            (Key::Category(a), Key::Category(b)) => {
                let ord = match &self.explicit {
                    Some(rank) => {
                        let ra = rank.get(a.as_str()).copied().unwrap_or(usize::MAX);
                        let rb = rank.get(b.as_str()).copied().unwrap_or(usize::MAX);
                        ra.cmp(&rb).then_with(|| collate(a, b))
                    }
                    None => collate(a, b),
                };
                if self.descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
            // Mixed kinds never occur after coercion; keep the order total anyway.
            _ => rank_of(a).cmp(&rank_of(b)),
        }
    }

    /// Index of the first key in `keys` that is `>= query` (left bisection).
    pub fn bisect_left<T>(&self, items: &[T], query: &Key, key_of: impl Fn(&T) -> &Key) -> usize {
        let mut lo = 0usize;
        let mut hi = items.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.compare(key_of(&items[mid]), query) == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

fn rank_of(k: &Key) -> u8 {
    match k {
        Key::Time(_) => 0,
        Key::Number(_) => 1,
        Key::Category(_) => 2,
    }
}

/// Case-insensitive lexicographic order with a case-sensitive tiebreak.
///
/// Only identical strings compare equal, so bucketing by comparator and by
/// identity agree.
pub fn collate(a: &str, b: &str) -> Ordering {
    let fa = a.chars().flat_map(char::to_lowercase);
    let fb = b.chars().flat_map(char::to_lowercase);
    fa.cmp(fb).then_with(|| a.cmp(b))
}
