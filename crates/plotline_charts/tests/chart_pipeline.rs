use std::sync::{Arc, Mutex};

use plotline_charts::prelude::*;
use pretty_assertions::assert_eq;

fn number_series(id: &str, points: &[(f64, Option<f64>)]) -> RawSeries {
    RawSeries::new(
        id,
        points.iter().map(|&(k, v)| RawPoint::new(k, v)).collect(),
    )
}

#[test]
fn stacked_retain_excludes_null_from_totals() {
    let input = vec![
        number_series("X", &[(1.0, Some(10.0)), (2.0, Some(20.0))]),
        number_series("Y", &[(1.0, Some(5.0)), (2.0, None)]),
    ];
    let cfg = ChartConfig::new(KeyType::Number, ChartType::StackedArea, 600.0, 400.0)
        .unwrap()
        .with_null_policy(NullPolicy::Retain);
    let state = ChartState::build(&input, &cfg).unwrap();
    let stack = state.stack(Axis::Primary).unwrap();

    let first = stack.row(0).unwrap();
    assert_eq!(first.key, Key::Number(1.0));
    assert_eq!(first.values["X"], Some(10.0));
    assert_eq!(first.values["Y"], Some(5.0));
    assert_eq!(first.total, 15.0);

    let second = stack.row(1).unwrap();
    assert_eq!(second.values["X"], Some(20.0));
    assert_eq!(second.values["Y"], None);
    assert_eq!(second.total, 20.0);

    assert_eq!(stack.y_domain, (0.0, 20.0));
    assert_eq!(state.scales.y.domain(), (0.0, 20.0));
}

#[test]
fn category_points_are_evenly_stepped() {
    let input = vec![RawSeries::new(
        "s",
        ["e", "b", "d", "a", "c"]
            .iter()
            .map(|k| RawPoint::new(*k, Some(1.0)))
            .collect(),
    )];
    let cfg = ChartConfig::new(KeyType::Category, ChartType::Bar, 400.0, 300.0).unwrap();
    let state = ChartState::build(&input, &cfg).unwrap();

    let keys: Vec<String> = state.index.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(state.scales.x.step(), 80.0);
    assert_eq!(
        state.scales.x.map_key(&Key::Category(keys[2].clone())),
        Some(160.0)
    );
}

fn brush_chart() -> SeriesChart {
    let points: Vec<(f64, Option<f64>)> =
        (0..=10).map(|i| (i as f64 * 100.0, Some(i as f64))).collect();
    let cfg = ChartConfig::new(KeyType::Number, ChartType::Line, 500.0, 200.0).unwrap();
    SeriesChart::new(cfg, vec![number_series("s", &points)]).unwrap()
}

fn brush_log(chart: &mut SeriesChart) -> Arc<Mutex<Vec<BrushExtentEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    chart.subscribe(EventKind::BrushEnd, move |e| {
        if let Some(b) = e.brush() {
            sink.lock().unwrap().push(b.clone());
        }
    });
    log
}

fn as_number(key: &Key) -> f64 {
    key.as_f64().unwrap()
}

#[test]
fn drag_commits_domain_extent() {
    let mut chart = brush_chart();
    let ends = brush_log(&mut chart);

    assert!(chart.pointer_down(50.0, 100.0));
    chart.pointer_move(150.0, 100.0);
    assert_eq!(chart.pointer_up(150.0, GestureSource::User), 1);

    let ends = ends.lock().unwrap();
    assert_eq!(ends.len(), 1);
    let extent = &ends[0].extent;
    assert!((as_number(&extent.start) - 100.0).abs() < 1e-9);
    assert!((as_number(&extent.end) - 300.0).abs() < 1e-9);
    let (a, b) = ends[0].selection_px;
    assert!((a - 50.0).abs() < 1e-9 && (b - 150.0).abs() < 1e-9);
    assert_eq!(chart.brush().phase(), BrushPhase::Committed);
}

#[test]
fn zero_width_selection_emits_nothing() {
    let mut chart = brush_chart();
    let ends = brush_log(&mut chart);

    assert!(chart.pointer_down(120.0, 100.0));
    assert_eq!(chart.pointer_up(120.0, GestureSource::User), 0);
    chart.clear_brush();

    assert!(ends.lock().unwrap().is_empty());
    assert_eq!(chart.brush().phase(), BrushPhase::Idle);
}

#[test]
fn category_brush_commits_snapped_selection() {
    let input = vec![RawSeries::new(
        "s",
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|k| RawPoint::new(*k, Some(1.0)))
            .collect(),
    )];
    let cfg = ChartConfig::new(KeyType::Category, ChartType::Bar, 400.0, 300.0).unwrap();
    let mut chart = SeriesChart::new(cfg, input).unwrap();
    let ends = brush_log(&mut chart);

    assert!(chart.pointer_down(50.0, 150.0));
    chart.pointer_move(250.0, 150.0);
    chart.pointer_up(250.0, GestureSource::User);

    let ends = ends.lock().unwrap();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].extent.start, Key::Category("a".into()));
    assert_eq!(ends[0].extent.end, Key::Category("d".into()));
    assert_eq!(ends[0].selection_px, (0.0, 240.0));
}

#[test]
fn kind_listeners_run_before_catch_all() {
    let mut chart = brush_chart();
    let order = Arc::new(Mutex::new(Vec::new()));
    let a = Arc::clone(&order);
    chart.subscribe_all(move |_| a.lock().unwrap().push("all"));
    let b = Arc::clone(&order);
    chart.subscribe(EventKind::Hover, move |_| b.lock().unwrap().push("hover"));

    assert_eq!(chart.pointer_move(100.0, 10.0), 2);
    assert_eq!(*order.lock().unwrap(), vec!["hover", "all"]);
}

#[test]
fn second_group_gets_its_own_axis() {
    let input = vec![
        number_series("price", &[(1.0, Some(10.0)), (2.0, Some(12.0))]).with_group("usd"),
        number_series("volume", &[(1.0, Some(9000.0)), (2.0, Some(7000.0))]).with_group("units"),
    ];
    let state = ChartState::build(&input, &ChartConfig::default()).unwrap();
    assert!(state.scales.has_second_axis);
    assert_eq!(state.groups.axis_of(1), Axis::Secondary);
    let y2 = state.scales.y2.as_ref().unwrap();
    assert!(y2.domain().1 >= 9000.0);
    assert!(state.scales.y.domain().1 < 100.0);
}

#[test]
fn third_group_is_rejected() {
    let input = vec![
        number_series("a", &[(1.0, Some(1.0))]).with_group("g1"),
        number_series("b", &[(1.0, Some(1.0))]).with_group("g2"),
        number_series("c", &[(1.0, Some(1.0))]).with_group("g3"),
    ];
    let err = ChartState::build(&input, &ChartConfig::default()).unwrap_err();
    assert!(matches!(err, ChartError::AxisGroupOverflow { count: 3, .. }));
}

#[test]
fn unknown_key_type_is_rejected() {
    let err = "bogus".parse::<KeyType>().unwrap_err();
    assert!(matches!(err, ChartError::InvalidKeyType { .. }));

    let opts = ChartOptions::from_json_str(r#"{"keyType": "bogus"}"#).unwrap();
    assert!(matches!(
        ChartConfig::try_from(opts),
        Err(ChartError::InvalidKeyType { .. })
    ));
}

#[test]
fn empty_input_has_no_x_domain() {
    let err = ChartState::build(&[], &ChartConfig::default()).unwrap_err();
    assert!(matches!(err, ChartError::EmptyDomain { .. }));
}

#[test]
fn skip_policy_counts_dropped_points() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let input = vec![RawSeries::new(
        "s",
        vec![
            RawPoint::new(1.0, Some(1.0)),
            RawPoint::new("garbage", Some(2.0)),
            RawPoint::new(3.0, Some(3.0)),
        ],
    )];
    let cfg = ChartConfig::default().with_invalid_keys(InvalidKeyPolicy::Skip);
    let state = ChartState::build(&input, &cfg).unwrap();
    assert_eq!(state.skipped_points(), 1);
    assert_eq!(state.data_by_key().len(), 2);

    let err = ChartState::build(&input, &ChartConfig::default()).unwrap_err();
    assert!(matches!(err, ChartError::UnparsableKey { index: 1, .. }));
}

#[test]
fn json_input_with_time_keys() {
    let doc = r#"{
        "series": [
            {"id": "cpu", "values": [
                {"key": "2024-01-01T00:00:00Z", "value": 1},
                {"key": "2024-01-01 00:05:00", "value": 2},
                {"key": 1704067800000, "value": null}
            ]}
        ]
    }"#;
    let input = SeriesInput::from_json_str(doc).unwrap();
    let cfg = ChartConfig::new(KeyType::Time, ChartType::Line, 300.0, 100.0).unwrap();
    let state = ChartState::build(&input.series, &cfg).unwrap();

    assert_eq!(state.data_by_key().len(), 3);
    let values: Vec<Option<f64>> = state.data_by_series()[0]
        .values
        .iter()
        .map(|p| p.value)
        .collect();
    assert_eq!(values, vec![Some(1.0), Some(2.0), None]);
    assert_eq!(state.scales.x.range(), (0.0, 300.0));
}
