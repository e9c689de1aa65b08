//! Immutable per-rebuild snapshot of the derived chart model.

use tracing::debug;

use crate::config::ChartConfig;
use crate::error::Result;
use crate::group::{Axis, AxisGroups};
use crate::index::{KeyBucket, KeyIndex};
use crate::invert::CoordinateInverter;
use crate::key::KeyOrder;
use crate::normalize::{normalize, NormalizedData};
use crate::scales::{build_scales, ScaleSet};
use crate::series::{RawSeries, Series};
use crate::stack::StackLayout;

/// Everything derived from one (input, config) pair.
///
/// A snapshot is built in one pass and never patched: a data or
/// configuration change produces a new snapshot that replaces the old one.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartState {
    pub data: NormalizedData,
    pub index: KeyIndex,
    pub groups: AxisGroups,
    pub scales: ScaleSet,
    /// One layout per axis for stacked chart types; empty otherwise.
    pub stacks: Vec<StackLayout>,
}

impl ChartState {
    /// normalize → index → split → stack → scales.
    ///
    /// Any structural error is returned before a snapshot exists.
    pub fn build(raw: &[RawSeries], config: &ChartConfig) -> Result<Self> {
        let data = normalize(raw, &config.key)?;
        let index = KeyIndex::build(&data.flat, KeyOrder::new(&config.key));
        let groups = AxisGroups::split(&data.by_series)?;

        let mut stacks = Vec::new();
        if config.stack.is_stacked() {
            let mut axes = vec![Axis::Primary];
            if groups.has_second_axis() {
                axes.push(Axis::Secondary);
            }
            for axis in axes {
                let members: Vec<usize> = groups.members(axis).collect();
                stacks.push(
                    StackLayout::build(&index, &data.by_series, &members, config.stack.null_policy)
                        .on_axis(axis),
                );
            }
        }

        let scales = build_scales(&data, &index, &groups, &stacks, config)?;

        debug!(
            series = data.by_series.len(),
            points = data.flat.len(),
            buckets = index.len(),
            second_axis = groups.has_second_axis(),
            stacked = !stacks.is_empty(),
            skipped = data.skipped,
            "rebuilt chart state"
        );

        Ok(Self {
            data,
            index,
            groups,
            scales,
            stacks,
        })
    }

    pub fn data_by_series(&self) -> &[Series] {
        &self.data.by_series
    }

    pub fn data_by_key(&self) -> &[KeyBucket] {
        self.index.buckets()
    }

    pub fn stack(&self, axis: Axis) -> Option<&StackLayout> {
        self.stacks.iter().find(|s| s.axis == axis)
    }

    pub fn skipped_points(&self) -> usize {
        self.data.skipped
    }

    pub fn inverter(&self) -> CoordinateInverter<'_> {
        CoordinateInverter::new(&self.scales.x, &self.index)
    }
}
