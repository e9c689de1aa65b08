use plotline_charts::prelude::*;
use pretty_assertions::assert_eq;

fn mixed_numbers() -> Vec<RawSeries> {
    vec![
        RawSeries::new(
            "a",
            vec![
                RawPoint::new(5.0, Some(1.0)),
                RawPoint::new("2", Some(4.0)),
                RawPoint::new(9.5, None),
                RawPoint::new(-3.0, Some(2.0)),
            ],
        ),
        RawSeries::new(
            "b",
            vec![
                RawPoint::new(2.0, Some(1.5)),
                RawPoint::new(7.0, Some(-2.0)),
                RawPoint::new(5.0, Some(3.0)),
            ],
        ),
    ]
}

fn time_series() -> Vec<RawSeries> {
    vec![RawSeries::new(
        "t",
        vec![
            RawPoint::new("2024-05-02T00:00:00Z", Some(3.0)),
            RawPoint::new("2024-05-01", Some(1.0)),
            RawPoint::new("2024-05-01 12:30:00", Some(2.0)),
            RawPoint::new(1_714_780_800_000.0, Some(4.0)),
        ],
    )]
}

fn config(key_type: KeyType, chart_type: ChartType) -> ChartConfig {
    ChartConfig::new(key_type, chart_type, 640.0, 320.0).unwrap()
}

#[test]
fn series_values_are_sorted_by_key() {
    for (input, key_type) in [
        (mixed_numbers(), KeyType::Number),
        (time_series(), KeyType::Time),
    ] {
        let state = ChartState::build(&input, &config(key_type, ChartType::Line)).unwrap();
        let order = state.index.order();
        for s in state.data_by_series() {
            for pair in s.values.windows(2) {
                assert_ne!(
                    order.compare(&pair[0].key, &pair[1].key),
                    std::cmp::Ordering::Greater,
                    "series {} out of order",
                    s.id
                );
            }
        }
    }
}

#[test]
fn normalizing_twice_changes_nothing() {
    for (input, key_type) in [
        (mixed_numbers(), KeyType::Number),
        (time_series(), KeyType::Time),
    ] {
        let cfg = config(key_type, ChartType::Line);
        let once = ChartState::build(&input, &cfg).unwrap();
        let again: Vec<RawSeries> = once.data_by_series().iter().map(RawSeries::from).collect();
        let twice = ChartState::build(&again, &cfg).unwrap();
        assert_eq!(once.data_by_series(), twice.data_by_series());
        assert_eq!(once.data_by_key(), twice.data_by_key());
    }
}

#[test]
fn continuous_domain_spans_the_width() {
    for (input, key_type) in [
        (mixed_numbers(), KeyType::Number),
        (time_series(), KeyType::Time),
    ] {
        let state = ChartState::build(&input, &config(key_type, ChartType::Line)).unwrap();
        let first = &state.data_by_key()[0].key;
        let last = &state.data_by_key()[state.data_by_key().len() - 1].key;
        let x = &state.scales.x;
        assert!(x.map_key(first).unwrap().abs() < 1e-9);
        assert!((x.map_key(last).unwrap() - 640.0).abs() < 1e-9);
    }
}

#[test]
fn inverting_a_mapped_key_returns_it() {
    for (input, key_type, tolerance) in [
        (mixed_numbers(), KeyType::Number, 1e-9),
        (time_series(), KeyType::Time, 1.0),
    ] {
        let state = ChartState::build(&input, &config(key_type, ChartType::Line)).unwrap();
        let inv = state.inverter();
        for (i, bucket) in state.data_by_key().iter().enumerate() {
            let px = inv.pixel_of(&bucket.key).unwrap();
            let back = inv.invert(px).unwrap();
            let (want, got) = (bucket.key.as_f64().unwrap(), back.as_f64().unwrap());
            assert!((want - got).abs() <= tolerance, "{want} vs {got}");
            assert_eq!(inv.bucket_index_at(px), Some(i));
        }
        assert!(inv.invert(-1.0).is_none());
        assert!(inv.invert(641.0).is_none());
    }
}

#[test]
fn stacked_bands_add_up_to_totals() {
    for policy in [NullPolicy::Zero, NullPolicy::Retain] {
        let cfg = config(KeyType::Number, ChartType::StackedBar).with_null_policy(policy);
        let state = ChartState::build(&mixed_numbers(), &cfg).unwrap();
        let stack = state.stack(Axis::Primary).unwrap();
        assert_eq!(stack.rows.len(), state.data_by_key().len());
        for row in &stack.rows {
            let heights: f64 = row.bands.values().flatten().map(|(lo, hi)| hi - lo).sum();
            let values: f64 = row.values.values().flatten().sum();
            assert!((heights - row.total).abs() < 1e-9);
            assert!((values - row.total).abs() < 1e-9);
        }
    }
}

#[test]
fn colors_are_stable() {
    let cfg = config(KeyType::Number, ChartType::Line).with_colors(
        vec![ColorEntry::keyed("b", "#ff0000"), ColorEntry::new("#00ff00")],
        "#999999",
    );
    let one = ChartState::build(&mixed_numbers(), &cfg).unwrap();
    let two = ChartState::build(&mixed_numbers(), &cfg).unwrap();

    let first: Vec<(String, String)> = one
        .scales
        .color
        .legend()
        .map(|(id, c)| (id.to_string(), c.to_string()))
        .collect();
    let second: Vec<(String, String)> = two
        .scales
        .color
        .legend()
        .map(|(id, c)| (id.to_string(), c.to_string()))
        .collect();
    assert_eq!(first, second);
    assert_eq!(one.scales.color.color("b"), "#ff0000");
    assert_eq!(one.scales.color.color("b"), one.scales.color.color("b"));
    assert_eq!(one.scales.color.color("unknown"), "#999999");
}
