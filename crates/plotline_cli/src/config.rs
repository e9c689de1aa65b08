//! Loading chart options and series input from disk

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use plotline_charts::config::{ChartConfig, ChartOptions};
use plotline_charts::series::{RawSeries, SeriesInput};

/// Load chart options from a `.toml` or `.json` file; no file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let options = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ChartOptions::from_json_str(&content),
        Some("toml") | None => ChartOptions::from_toml_str(&content),
        Some(other) => anyhow::bail!(
            "Unsupported config format `.{other}` for {}. Use .toml or .json.",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    ChartConfig::try_from(options).with_context(|| format!("Invalid options in {}", path.display()))
}

/// Load `{"series": [...]}` from a JSON file.
pub fn load_input(path: &Path) -> Result<Vec<RawSeries>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let input = SeriesInput::from_json_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(input.series)
}
