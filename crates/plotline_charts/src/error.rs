use thiserror::Error;

/// Errors surfaced by a chart rebuild or by configuration validation.
///
/// Structural errors abort the rebuild before any state is installed.
/// Out-of-range pointer positions are not errors: they resolve to `None`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("unknown key type '{value}' (expected one of: time, number, string)")]
    InvalidKeyType { value: String },

    #[error("unknown chart type '{value}' (expected one of: line, area, bar, scatter, stacked-area, stacked-bar)")]
    InvalidChartType { value: String },

    #[error("invalid value '{value}' for option '{field}'")]
    InvalidOption { field: &'static str, value: String },

    #[error("chart dimensions must be positive and finite, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("series '{series}' point {index}: key '{raw}' is not a valid {key_type} key")]
    UnparsableKey {
        series: String,
        index: usize,
        raw: String,
        key_type: &'static str,
    },

    #[error("series '{series}' point {index}: value '{raw}' is not numeric")]
    UnparsableValue {
        series: String,
        index: usize,
        raw: String,
    },

    #[error("cannot build the {axis} scale: no data in domain")]
    EmptyDomain { axis: &'static str },

    #[error("found {count} distinct series groups ({groups:?}); at most 2 axes are supported")]
    AxisGroupOverflow { count: usize, groups: Vec<String> },

    #[error("duplicate series id '{id}'")]
    DuplicateSeriesId { id: String },

    #[error("{format} parse error: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ChartError>;

impl From<serde_json::Error> for ChartError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            format: "json",
            message: e.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChartError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse {
            format: "toml",
            message: e.to_string(),
        }
    }
}
