use cornergraph_core::*;
use serde_json::json;

fn corner_session() -> Vec<serde_json::Value> {
    // 2 s rett, 3 s høyresving, 2 s rett, 10 Hz
    (0..70)
        .map(|i| {
            let in_corner = (20..50).contains(&i);
            json!({
                "time_s": i as f64 * 0.1,
                "speed_kph": if in_corner { 110.0 } else { 180.0 },
                "lateral_g": if in_corner { 1.3 } else { 0.0 },
                "yaw_rate_deg_s": if in_corner { 20.0 } else { 0.0 },
                "steer_angle_deg": if in_corner { 2.0 } else { 0.0 },
            })
        })
        .collect()
}

#[test]
fn smoke_json_entry_point() {
    let samples = corner_session();
    let setup = json!({ "car_name": "bmw_m4_gt3", "wheelbase_m": 2.81 });
    let cfg = json!({ "smoothing_window": 5 });

    let cfg_json = serde_json::to_string(&cfg).unwrap();
    let out = analyze_session_json(
        &serde_json::to_string(&samples).unwrap(),
        &serde_json::to_string(&setup).unwrap(),
        Some(cfg_json.as_str()),
    )
    .unwrap();

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["car_name"], "bmw_m4_gt3");
    assert_eq!(v["points"].as_array().map(|a| a.len()), Some(70));
    assert_eq!(v["corners"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(v["corners"][0]["direction"], "right");
    let recs = v["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty() && recs.len() <= 6);
    assert!(v["generated_at"].is_string());
}

#[test]
fn json_parse_error_carries_path() {
    let samples = json!([{ "time_s": 0.0, "speed_kph": "fast", "lateral_g": 0.0,
                           "yaw_rate_deg_s": 0.0, "steer_angle_deg": 0.0 }]);
    let err = analyze_session_json(&samples.to_string(), "{}", None).unwrap_err();
    match err {
        AnalysisError::Parse { what, path, .. } => {
            assert_eq!(what, "samples");
            assert!(path.contains("speed_kph"), "path={path}");
        }
        other => panic!("forventet parse-feil, fikk {other:?}"),
    }
}

#[test]
fn empty_json_session_is_an_error() {
    let err = analyze_session_json("[]", "{}", None).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptySession));
}

#[test]
fn observed_run_updates_counters() {
    let samples: Vec<TelemetrySample> = serde_json::from_value(json!(corner_session())).unwrap();
    let metrics = PipelineMetrics::new().unwrap();

    let report =
        analyze_session_observed(&samples, &SetupConfig::default(), &AnalysisCfg::default(), &metrics).unwrap();
    assert_eq!(report.corners.len(), 1);

    assert_eq!(metrics.runs_total.get(), 1);
    assert_eq!(metrics.samples_total.get(), 70);
    assert_eq!(metrics.corners_total.get(), 1);
    assert_eq!(metrics.corners_discarded_total.get(), 0);

    let text = metrics.render();
    assert!(text.contains("cornergraph_runs_total 1"));
    assert!(text.contains("cornergraph_stale_results_total 0"));
}

#[test]
fn two_metric_instances_do_not_collide() {
    let a = PipelineMetrics::new().unwrap();
    let b = PipelineMetrics::new().unwrap();
    a.runs_total.inc();
    assert_eq!(b.runs_total.get(), 0);
    assert_eq!(a.registry().gather().len(), 6);
}
