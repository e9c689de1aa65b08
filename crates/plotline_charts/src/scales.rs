//! Derives the x, y, y2 and color scales for one rebuild.

use tracing::trace;

use crate::color::ColorScale;
use crate::config::{ChartConfig, KeyType};
use crate::error::{ChartError, Result};
use crate::group::{Axis, AxisGroups};
use crate::index::KeyIndex;
use crate::normalize::NormalizedData;
use crate::scale::{LinearScale, XScale, NICE_TICK_COUNT};
use crate::stack::StackLayout;

#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSet {
    pub x: XScale,
    pub y: LinearScale,
    pub y2: Option<LinearScale>,
    pub color: ColorScale,
    pub has_second_axis: bool,
}

impl ScaleSet {
    /// Y scale for `axis`, falling back to the primary one.
    pub fn y_for(&self, axis: Axis) -> &LinearScale {
        match (axis, &self.y2) {
            (Axis::Secondary, Some(y2)) => y2,
            _ => &self.y,
        }
    }
}

/// Builds every scale from normalized data.
///
/// `stacks` holds the stack layouts of a stacked chart (one per axis); an axis
/// with a layout takes its y-domain from the layout instead of raw values.
pub fn build_scales(
    data: &NormalizedData,
    index: &KeyIndex,
    groups: &AxisGroups,
    stacks: &[StackLayout],
    config: &ChartConfig,
) -> Result<ScaleSet> {
    let dims = config.dimensions;
    let x = build_x(index, config.key.key_type, dims.width)?;

    let y = build_y(data, groups, stacks, Axis::Primary, dims.height)?
        .ok_or(ChartError::EmptyDomain { axis: "y" })?;
    let y2 = if groups.has_second_axis() {
        Some(
            build_y(data, groups, stacks, Axis::Secondary, dims.height)?
                .ok_or(ChartError::EmptyDomain { axis: "y2" })?,
        )
    } else {
        None
    };

    let color = ColorScale::new(data.by_series.iter().map(|s| &s.id), &config.color);

    trace!(x = ?x.range(), y = ?y.domain(), y2 = ?y2.map(|s| s.domain()), "built scales");

    Ok(ScaleSet {
        x,
        y,
        has_second_axis: y2.is_some(),
        y2,
        color,
    })
}

fn build_x(index: &KeyIndex, key_type: KeyType, width: f64) -> Result<XScale> {
    if index.is_empty() {
        return Err(ChartError::EmptyDomain { axis: "x" });
    }
    match key_type {
        KeyType::Category => {
            let domain: Vec<String> = index
                .keys()
                .filter_map(|k| k.as_category().map(str::to_string))
                .collect();
            Ok(XScale::category(domain, width))
        }
        KeyType::Time | KeyType::Number => {
            let (lo, hi) = min_max(index.keys().filter_map(|k| k.as_f64()))
                .ok_or(ChartError::EmptyDomain { axis: "x" })?;
            let s = LinearScale::new(lo, hi, 0.0, width);
            Ok(if key_type == KeyType::Time {
                XScale::Time(s)
            } else {
                XScale::Number(s)
            })
        }
    }
}

fn build_y(
    data: &NormalizedData,
    groups: &AxisGroups,
    stacks: &[StackLayout],
    axis: Axis,
    height: f64,
) -> Result<Option<LinearScale>> {
    let extent = match stacks.iter().find(|s| s.axis == axis) {
        Some(stack) if !stack.rows.is_empty() => Some(stack.y_domain),
        Some(_) => None,
        None => min_max(
            groups
                .members(axis)
                .filter_map(|i| data.by_series.get(i))
                .flat_map(|s| s.values.iter().filter_map(|p| p.value)),
        ),
    };
    Ok(extent.map(|(lo, hi)| {
        let (lo, hi) = widen_degenerate(lo, hi);
        LinearScale::new(lo, hi, height, 0.0).nice(NICE_TICK_COUNT)
    }))
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// A single distinct value gets a domain anchored at zero.
fn widen_degenerate(lo: f64, hi: f64) -> (f64, f64) {
    if lo != hi {
        return (lo, hi);
    }
    if lo > 0.0 {
        (0.0, lo)
    } else if lo < 0.0 {
        (lo, 0.0)
    } else {
        (0.0, 1.0)
    }
}
