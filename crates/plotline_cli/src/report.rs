//! JSON views of the derived chart model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use plotline_charts::prelude::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub key_type: &'static str,
    pub stacked: bool,
    pub x: XReport,
    pub y_domain: (f64, f64),
    pub y_ticks: Vec<f64>,
    pub y2_domain: Option<(f64, f64)>,
    pub groups: Vec<String>,
    pub buckets: Vec<BucketReport>,
    pub stacks: Vec<StackReport>,
    pub legend: Vec<LegendEntry>,
    pub skipped_points: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XReport {
    pub continuous: bool,
    pub range: (f64, f64),
    pub step: f64,
    pub first: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketReport {
    pub key: String,
    pub pixel_x: Option<f64>,
    pub total: f64,
    pub points: Vec<PointReport>,
}

#[derive(Debug, Serialize)]
pub struct PointReport {
    pub id: String,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackReport {
    pub axis: &'static str,
    pub y_domain: (f64, f64),
    pub rows: Vec<StackRowReport>,
}

#[derive(Debug, Serialize)]
pub struct StackRowReport {
    pub key: String,
    pub total: f64,
    pub bands: Vec<BandReport>,
}

#[derive(Debug, Serialize)]
pub struct BandReport {
    pub id: String,
    pub band: Option<(f64, f64)>,
}

#[derive(Debug, Serialize)]
pub struct LegendEntry {
    pub id: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvertReport {
    pub px: f64,
    pub key: Option<String>,
    pub bucket: Option<BucketReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushReport {
    pub from: f64,
    pub to: f64,
    pub brush_events: usize,
    pub extent: Option<(String, String)>,
    pub selection_px: Option<(f64, f64)>,
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Primary => "primary",
        Axis::Secondary => "secondary",
    }
}

fn bucket_report(bucket: &KeyBucket, inv: &CoordinateInverter<'_>) -> BucketReport {
    BucketReport {
        key: bucket.key.to_string(),
        pixel_x: inv.pixel_of(&bucket.key),
        total: bucket.total(),
        points: bucket
            .series
            .iter()
            .map(|p| PointReport {
                id: p.id.to_string(),
                value: p.value,
            })
            .collect(),
    }
}

pub fn inspect(state: &ChartState, config: &ChartConfig) -> InspectReport {
    let inv = state.inverter();
    let scales = &state.scales;
    InspectReport {
        key_type: config.key.key_type.as_str(),
        stacked: config.stack.is_stacked(),
        x: XReport {
            continuous: scales.x.is_continuous(),
            range: scales.x.range(),
            step: scales.x.step(),
            first: state.index.keys().next().map(ToString::to_string),
            last: state.index.keys().last().map(ToString::to_string),
        },
        y_domain: scales.y.domain(),
        y_ticks: scales.y.ticks(5),
        y2_domain: scales.y2.as_ref().map(LinearScale::domain),
        groups: [&state.groups.primary, &state.groups.secondary]
            .into_iter()
            .flatten()
            .map(|g| g.to_string())
            .collect(),
        buckets: state
            .data_by_key()
            .iter()
            .map(|b| bucket_report(b, &inv))
            .collect(),
        stacks: state
            .stacks
            .iter()
            .map(|s| StackReport {
                axis: axis_name(s.axis),
                y_domain: s.y_domain,
                rows: s
                    .rows
                    .iter()
                    .map(|r| StackRowReport {
                        key: r.key.to_string(),
                        total: r.total,
                        bands: r
                            .bands
                            .iter()
                            .map(|(id, band)| BandReport {
                                id: id.to_string(),
                                band: *band,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
        legend: scales
            .color
            .legend()
            .map(|(id, color)| LegendEntry {
                id: id.to_string(),
                color: color.to_string(),
            })
            .collect(),
        skipped_points: state.skipped_points(),
    }
}

pub fn invert(state: &ChartState, px: f64) -> InvertReport {
    let inv = state.inverter();
    InvertReport {
        px,
        key: inv.invert(px).map(|k| k.to_string()),
        bucket: inv.bucket_at(px).map(|b| bucket_report(b, &inv)),
    }
}

/// Replays a user drag from `from` to `to` across the middle of the plot.
pub fn brush(chart: &mut SeriesChart, from: f64, to: f64) -> BrushReport {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let listener = chart.subscribe_all(move |event| {
        if event.brush().is_some() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    });

    let y = chart.config().dimensions.height * 0.5;
    if chart.pointer_down(from, y) {
        chart.pointer_move(to, y);
        chart.pointer_up(to, GestureSource::User);
    }
    chart.unsubscribe(listener);

    BrushReport {
        from,
        to,
        brush_events: seen.load(Ordering::Relaxed),
        extent: chart
            .brush()
            .committed_extent()
            .map(|e| (e.start.to_string(), e.end.to_string())),
        selection_px: chart.brush().selection_px(),
    }
}
