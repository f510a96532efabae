use chrono::{NaiveDate, NaiveDateTime};
use trendline::data::datetime::parse_timestamp;
use trendline::render::scale::TimeTickUnit;
use trendline::{
    Chart, ChartConfig, ChartRequest, Entry, Error, Period, RelativeRange, Statistic, YScaleKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("trendline=trace")
        .with_test_writer()
        .try_init();
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

/// Half a year of morning weigh-ins, parsed the way the storage layer hands them over.
fn weigh_ins() -> Vec<Entry> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..182u64)
        .map(|i| {
            let day = start.checked_add_days(chrono::Days::new(i)).unwrap();
            let raw = format!("{}T07:30:00", day.format("%Y-%m-%d"));
            let ts = parse_timestamp(&raw).unwrap();
            Entry::new(ts, 80.0 - (i as f64) * 0.02, 7)
        })
        .collect()
}

#[test]
fn monthly_dashboard_from_json_request() {
    init_tracing();
    let request = ChartRequest::from_json(r#"{"period": "month", "statistic": "median"}"#).unwrap();
    let config = ChartConfig::from_json(r#"{"width": 600, "height": 200}"#).unwrap();

    let mut chart = Chart::new(config);
    chart.load(&weigh_ins(), &request, now());
    let frame = chart.frame();

    let agg = frame.aggregation.as_ref().unwrap();
    assert_eq!(
        agg.labels,
        vec!["2024-01-01", "2024-02-01", "2024-03-01", "2024-04-01", "2024-05-01", "2024-06-01"]
    );
    assert_eq!(agg.column(Statistic::Count).as_ref(), &[31.0, 29.0, 31.0, 30.0, 31.0, 30.0]);
    assert_eq!(frame.points.len(), 6);
    // Medians decrease month over month, so pixel heights increase downward.
    assert!(frame.pixels.windows(2).all(|w| w[0].y < w[1].y));
    assert_eq!(frame.x_scale.as_ref().unwrap().unit, TimeTickUnit::Months);
}

#[test]
fn quarter_range_with_rolling_window() {
    init_tracing();
    let request = ChartRequest {
        period: Period::Week,
        statistic: Statistic::Mean,
        range: RelativeRange::Quarter,
        window: Some(4),
    };
    let mut chart = Chart::new(ChartConfig::default());
    chart.load(&weigh_ins(), &request, now());
    let frame = chart.frame();

    let weeks = frame.aggregation.as_ref().unwrap().len();
    assert_eq!(frame.points.len(), weeks - 3);
    assert!(frame.points.windows(2).all(|w| w[0].x < w[1].x));
}

#[test]
fn log_scale_chart_panned_back() {
    init_tracing();
    let config = ChartConfig {
        y_scale: YScaleKind::Log,
        view_days: 30.0,
        ..ChartConfig::default()
    };
    let mut chart = Chart::new(config);
    chart.load(&weigh_ins(), &ChartRequest::default(), now());

    let vp = chart.viewport_mut();
    vp.pointer_enter();
    vp.begin_pan(100.0);
    vp.pan_to(400.0, 800.0);
    vp.end_pan();
    let offset = chart.viewport().pan_offset_days();
    assert!(offset > 0.0 && offset <= chart.viewport().max_offset_days());

    let frame = chart.frame();
    let scale = frame.x_scale.as_ref().unwrap();
    assert!(scale.span_days() <= 30.0);
    assert!(!frame.pixels.is_empty());
    assert!(frame.y_scale.ticks.iter().all(|t| *t > 0.0));
}

#[test]
fn unknown_statistic_draws_a_flat_zero_line() {
    init_tracing();
    let request =
        ChartRequest::from_json(r#"{"period": "month", "statistic": "stddev", "window": 2}"#).unwrap();
    assert_eq!(request.statistic, Statistic::Unknown);

    let mut chart = Chart::new(ChartConfig::default());
    chart.load(&weigh_ins(), &request, now());
    let frame = chart.frame();
    assert_eq!(frame.points.len(), 5);
    assert!(frame.points.iter().all(|p| p.y == 0.0));
    assert!(frame.y_scale.is_degenerate());
    assert_eq!(frame.y_labels, vec!["0"]);
}

#[test]
fn unparsable_timestamps_are_reported() {
    let err = parse_timestamp("31/31/2024").unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp(_)));
}
