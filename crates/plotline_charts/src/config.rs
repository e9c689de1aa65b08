//! Chart configuration.
//!
//! Configuration arrives in a loose, serde-facing shape ([`ChartOptions`]) that
//! mirrors the embedding API (camelCase string enums). It is validated exactly
//! once into a [`ChartConfig`], which splits the fields per concern:
//! - [`KeyConfig`]: key type, category ordering, invalid-key policy
//! - [`StackConfig`]: chart type and null handling for stacked variants
//! - [`ColorConfig`]: color schema and fallback color
//! - [`BrushConfig`]: brush interaction settings
//!
//! Unknown enum strings are rejected here instead of falling back to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Domain of the x keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    Time,
    Number,
    /// Discrete string keys (`"string"` in configuration).
    Category,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Number => "number",
            Self::Category => "string",
        }
    }

    pub fn is_continuous(&self) -> bool {
        !matches!(self, Self::Category)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Self::Time),
            "number" => Ok(Self::Number),
            "string" | "category" => Ok(Self::Category),
            _ => Err(ChartError::InvalidKeyType {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChartType {
    #[default]
    Line,
    Area,
    Bar,
    Scatter,
    StackedArea,
    StackedBar,
}

impl ChartType {
    /// Additive variants use the stack layout and its derived y-domain.
    pub fn is_stacked(&self) -> bool {
        matches!(self, Self::StackedArea | Self::StackedBar)
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "line" => Ok(Self::Line),
            "area" => Ok(Self::Area),
            "bar" => Ok(Self::Bar),
            "scatter" => Ok(Self::Scatter),
            "stackedarea" => Ok(Self::StackedArea),
            "stackedbar" => Ok(Self::StackedBar),
            _ => Err(ChartError::InvalidChartType {
                value: s.to_string(),
            }),
        }
    }
}

/// How missing or `null` values are treated when stacking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Missing values stack as 0.
    #[default]
    Zero,
    /// Missing values stay `None` and are excluded from the cumulative sum.
    Retain,
}

impl FromStr for NullPolicy {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "fill" => Ok(Self::Zero),
            "retain" | "keep" => Ok(Self::Retain),
            _ => Err(ChartError::InvalidOption {
                field: "nullPolicy",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering of category (string) keys.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CategorySort {
    #[default]
    Ascending,
    Descending,
    /// Listed categories first, in list order; the rest ascending after them.
    Explicit(Vec<String>),
}

/// What to do with a key or value that cannot be coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InvalidKeyPolicy {
    /// Abort the rebuild with an error naming the point.
    #[default]
    Reject,
    /// Drop the point, log it and count it in the chart state.
    Skip,
}

impl FromStr for InvalidKeyPolicy {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            _ => Err(ChartError::InvalidOption {
                field: "invalidKeys",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyConfig {
    pub key_type: KeyType,
    pub sort: CategorySort,
    pub invalid_keys: InvalidKeyPolicy,
}

impl KeyConfig {
    pub fn new(key_type: KeyType) -> Self {
        Self {
            key_type,
            sort: CategorySort::default(),
            invalid_keys: InvalidKeyPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StackConfig {
    pub chart_type: ChartType,
    pub null_policy: NullPolicy,
}

impl StackConfig {
    pub fn is_stacked(&self) -> bool {
        self.chart_type.is_stacked()
    }
}

/// One color schema entry: `{key?, value, ...}`.
///
/// Extra fields are carried through untouched for renderers (e.g. dash style).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ColorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ColorEntry {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(value)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorConfig {
    pub schema: Vec<ColorEntry>,
    pub default_color: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            schema: Vec::new(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrushConfig {
    pub enabled: bool,
    /// Selections narrower than this (in pixels) count as empty.
    pub min_selection_px: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_selection_px: 1.0,
        }
    }
}

/// Size of the plotting area in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(width) || !ok(height) {
            return Err(ChartError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

const DEFAULT_COLOR: &str = "#999999";
const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_HEIGHT: f64 = 400.0;

/// Loosely-typed options as supplied by an embedder (TOML or JSON).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    pub key_type: String,
    pub chart_type: String,
    pub width: f64,
    pub height: f64,
    pub color_schema: Vec<ColorEntry>,
    pub default_color: String,
    pub null_policy: String,
    pub category_sort: String,
    pub category_order: Vec<String>,
    pub invalid_keys: String,
    pub brush: BrushConfig,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            key_type: "number".to_string(),
            chart_type: "line".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_schema: Vec::new(),
            default_color: DEFAULT_COLOR.to_string(),
            null_policy: "zero".to_string(),
            category_sort: "ascending".to_string(),
            category_order: Vec::new(),
            invalid_keys: "reject".to_string(),
            brush: BrushConfig::default(),
        }
    }
}

impl ChartOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Validated chart configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub key: KeyConfig,
    pub stack: StackConfig,
    pub color: ColorConfig,
    pub brush: BrushConfig,
    pub dimensions: Dimensions,
}

impl ChartConfig {
    pub fn new(key_type: KeyType, chart_type: ChartType, width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            key: KeyConfig::new(key_type),
            stack: StackConfig {
                chart_type,
                null_policy: NullPolicy::default(),
            },
            color: ColorConfig::default(),
            brush: BrushConfig::default(),
            dimensions: Dimensions::new(width, height)?,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        ChartOptions::from_toml_str(s)?.try_into()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        ChartOptions::from_json_str(s)?.try_into()
    }

    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.stack.null_policy = policy;
        self
    }

    pub fn with_category_sort(mut self, sort: CategorySort) -> Self {
        self.key.sort = sort;
        self
    }

    pub fn with_invalid_keys(mut self, policy: InvalidKeyPolicy) -> Self {
        self.key.invalid_keys = policy;
        self
    }

    pub fn with_colors(mut self, schema: Vec<ColorEntry>, default_color: impl Into<String>) -> Self {
        self.color = ColorConfig {
            schema,
            default_color: default_color.into(),
        };
        self
    }
}

impl TryFrom<ChartOptions> for ChartConfig {
    type Error = ChartError;

    fn try_from(o: ChartOptions) -> Result<Self> {
        let key_type: KeyType = o.key_type.parse()?;
        let chart_type: ChartType = o.chart_type.parse()?;
        let null_policy: NullPolicy = o.null_policy.parse()?;
        let invalid_keys: InvalidKeyPolicy = o.invalid_keys.parse()?;

        let sort = match o.category_sort.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => CategorySort::Ascending,
            "descending" | "desc" => CategorySort::Descending,
            "explicit" if !o.category_order.is_empty() => CategorySort::Explicit(o.category_order),
            _ => {
                return Err(ChartError::InvalidOption {
                    field: "categorySort",
                    value: o.category_sort,
                })
            }
        };

        if !o.brush.min_selection_px.is_finite() || o.brush.min_selection_px < 0.0 {
            return Err(ChartError::InvalidOption {
                field: "brush.minSelectionPx",
                value: o.brush.min_selection_px.to_string(),
            });
        }

        Ok(Self {
            key: KeyConfig {
                key_type,
                sort,
                invalid_keys,
            },
            stack: StackConfig {
                chart_type,
                null_policy,
            },
            color: ColorConfig {
                schema: o.color_schema,
                default_color: o.default_color,
            },
            brush: o.brush,
            dimensions: Dimensions::new(o.width, o.height)?,
        })
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            key: KeyConfig::new(KeyType::Number),
            stack: StackConfig::default(),
            color: ColorConfig::default(),
            brush: BrushConfig::default(),
            dimensions: Dimensions {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            },
        }
    }
}
