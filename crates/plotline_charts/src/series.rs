//! Input contract and the normalized series shapes derived from it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::Key;

/// A raw key or value as it appears in input JSON: a number or a string.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RawScalar {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawScalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawPoint {
    pub key: RawScalar,
    #[serde(default)]
    pub value: Option<RawScalar>,
}

impl RawPoint {
    pub fn new(key: impl Into<RawScalar>, value: Option<f64>) -> Self {
        Self {
            key: key.into(),
            value: value.map(RawScalar::Number),
        }
    }
}

/// One caller-owned series. The pipeline never mutates it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawSeries {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub values: Vec<RawPoint>,
}

impl RawSeries {
    pub fn new(id: impl Into<String>, values: Vec<RawPoint>) -> Self {
        Self {
            id: id.into(),
            label: None,
            group: None,
            values,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&Series> for RawSeries {
    fn from(s: &Series) -> Self {
        let values = s
            .values
            .iter()
            .map(|p| RawPoint {
                key: match &p.key {
                    Key::Number(v) => RawScalar::Number(*v),
                    k => RawScalar::Text(k.to_string()),
                },
                value: p.value.map(RawScalar::Number),
            })
            .collect();
        Self {
            id: s.id.to_string(),
            label: Some(s.label.to_string()),
            group: Some(s.group.to_string()),
            values,
        }
    }
}

/// `{series: [...]}` input document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SeriesInput {
    #[serde(default)]
    pub series: Vec<RawSeries>,
}

impl SeriesInput {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub key: Key,
    pub value: Option<f64>,
}

/// A normalized series: coerced keys and values, ordered by key.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub id: Arc<str>,
    pub label: Arc<str>,
    pub group: Arc<str>,
    pub values: Vec<DataPoint>,
}

/// One (series, point) pair in the global ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatPoint {
    /// Index of the owning series in `data_by_series`.
    pub series: usize,
    pub id: Arc<str>,
    pub label: Arc<str>,
    pub group: Arc<str>,
    pub key: Key,
    pub value: Option<f64>,
}
