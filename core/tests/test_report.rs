use cornergraph_core::cli::format_balance_report;
use cornergraph_core::suspension::summarize_suspension;
use cornergraph_core::trajectory::track_map;
use cornergraph_core::*;

fn with_travel(front: f64, rear: f64) -> TelemetrySample {
    TelemetrySample::new(0.0, 150.0, 1.0, 10.0, 3.0).with_suspension_travel([front, front, rear, rear])
}

#[test]
fn suspension_counts_bumpstop_hits() {
    let cfg = AnalysisCfg::default();
    let mut samples: Vec<_> = (0..4).map(|_| with_travel(50.0, 40.0)).collect();
    samples.extend((0..6).map(|_| with_travel(95.0, 60.0)));
    samples.push(TelemetrySample::new(0.0, 150.0, 0.0, 0.0, 0.0)); // uten kanal

    let s = summarize_suspension(&samples, &cfg).expect("sammendrag");
    assert_eq!(s.samples, 10);
    assert_eq!(s.front_bumpstop_hits, 6);
    assert_eq!(s.rear_bumpstop_hits, 0);
    assert!((s.avg_front_travel_pct - 77.0).abs() < 1e-9);
    assert!(!s.ride_height_issues);
    assert!(s.front_bottoming(&cfg));
}

#[test]
fn no_suspension_channel_gives_none() {
    let samples = vec![TelemetrySample::new(0.0, 100.0, 0.0, 0.0, 0.0)];
    assert!(summarize_suspension(&samples, &AnalysisCfg::default()).is_none());
}

#[test]
fn bottoming_front_removes_front_ride_height_advice() {
    // understeer-sving (giring stemmer med lateral-G, men langt under modellen)
    // der fronten slår i bumpstop hele veien
    let samples: Vec<_> = (0..30)
        .map(|i| {
            TelemetrySample::new(i as f64 * 0.1, 100.0, 1.5, 30.0, 20.0)
                .with_suspension_travel([96.0, 96.0, 50.0, 50.0])
        })
        .collect();
    let cfg = AnalysisCfg { max_recommendations: 50, ..AnalysisCfg::default() };
    let report = analyze_session(&samples, &SetupConfig::default(), &cfg).unwrap();

    assert_eq!(report.stats.primary_issue, HandlingState::Understeer);
    assert!(report.suspension.as_ref().map(|s| s.front_bottoming(&cfg)).unwrap_or(false));
    assert!(report
        .recommendations
        .iter()
        .all(|r| r.target_parameter != SetupParameter::FrontRideHeight));
}

#[test]
fn straight_trajectory_runs_along_x() {
    // 36 km/t i 10 s, ingen giring
    let samples: Vec<_> = (0..=10).map(|i| TelemetrySample::new(i as f64, 36.0, 0.0, 0.0, 0.0)).collect();
    let path = reconstruct_trajectory(&samples);
    assert_eq!(path.len(), 11);
    assert!((path[10].x - 100.0).abs() < 1e-9);
    assert!(path[10].y.abs() < 1e-9);

    let map = track_map(&samples, 0.5);
    assert_eq!(map.len(), 2);
}

#[test]
fn full_circle_returns_near_start() {
    // 36°/s i 10 s = én runde
    let samples: Vec<_> = (0..=1000)
        .map(|i| TelemetrySample::new(i as f64 * 0.01, 72.0, 1.3, 36.0, 5.0))
        .collect();
    let path = reconstruct_trajectory(&samples);
    let end = path[path.len() - 1];
    assert!(end.x.hypot(end.y) < 1.0, "slutt ({}, {})", end.x, end.y);
    assert!(track_map(&samples, 0.5).len() > 4);
}

#[test]
fn text_report_lists_corners_and_recommendations() {
    let samples: Vec<_> = (0..40)
        .map(|i| TelemetrySample::new(i as f64 * 0.1, 100.0, if i < 30 { -1.4 } else { 0.0 }, -5.0, -10.0))
        .collect();
    let setup = SetupConfig { car_name: Some("audi_r8_lms_evo".into()), ..SetupConfig::default() };
    let report = analyze_session(&samples, &setup, &AnalysisCfg::default()).unwrap();

    let text = format_balance_report(&report);
    assert!(text.contains("audi_r8_lms_evo"));
    assert!(text.contains("Corners: 1"));
    assert!(text.contains("Left"));
    assert!(text.contains("Recommendations:"));
    assert!(text.contains(&report.recommendations[0].title));
    let first = &report.recommendations[0];
    assert!(text.contains(&format!("[{:?} / {:?}]", first.priority, first.group)));
}
