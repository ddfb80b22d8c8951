use cornergraph_core::physics::{bicycle_yaw_rate_deg_s, classify_gradient, fill_distance_if_missing, G};
use cornergraph_core::*;

fn neutral_setup() -> SetupConfig {
    SetupConfig {
        front_toe_deg: 0.0,
        rear_toe_deg: 0.0,
        front_camber_deg: -3.0,
        rear_camber_deg: -3.0,
        front_arb: 5,
        rear_arb: 5,
        ..SetupConfig::default()
    }
}

#[test]
fn state_always_matches_thresholds() {
    let setup = SetupConfig::default();
    let bias = compute_setup_bias(&setup);
    let cfg = AnalysisCfg::default();

    for lat in [-2.0, -1.2, -0.5, -0.05, 0.0, 0.3, 0.9, 1.8] {
        for yaw in [-40.0, -10.0, 0.0, 5.0, 25.0] {
            for steer in [-30.0, -5.0, 0.0, 2.0, 20.0] {
                let s = TelemetrySample::new(0.0, 120.0, lat, yaw, steer);
                let p = compute_gradient(&s, &setup, &bias);
                let expected = if p.gradient > cfg.understeer_threshold {
                    HandlingState::Understeer
                } else if p.gradient < cfg.oversteer_threshold {
                    HandlingState::Oversteer
                } else {
                    HandlingState::Neutral
                };
                assert_eq!(p.state, expected, "feil tilstand for lat={lat} yaw={yaw} steer={steer}");
                assert!((p.severity - p.gradient.abs()).abs() < 1e-12);
                assert!(p.confidence >= 0.0 && p.confidence <= 100.0);
            }
        }
    }
}

#[test]
fn gradient_is_clamped_for_extreme_inputs() {
    let setup = SetupConfig::default();
    let bias = compute_setup_bias(&setup);

    let extremes = [
        TelemetrySample::new(0.0, 0.01, 1.5, 0.0, 90.0),
        TelemetrySample::new(0.0, 0.0, -3.0, 200.0, -89.0),
        TelemetrySample::new(0.0, 400.0, 0.11, -500.0, 45.0),
    ];
    for s in &extremes {
        let p = compute_gradient(s, &setup, &bias);
        assert!(p.gradient.is_finite());
        assert!(p.gradient.abs() <= 0.5 + 1e-12, "gradient {} utenfor clamp", p.gradient);
    }
}

#[test]
fn below_min_lateral_g_only_bias_remains() {
    let setup = neutral_setup();
    let bias = compute_setup_bias(&setup);
    let s = TelemetrySample::new(0.0, 150.0, 0.05, 30.0, 10.0);
    let p = compute_gradient(&s, &setup, &bias);
    assert_eq!(p.gradient, 0.0);
    assert_eq!(p.state, HandlingState::Neutral);
}

#[test]
fn non_finite_sample_degrades_to_neutral() {
    let setup = SetupConfig::default();
    let bias = compute_setup_bias(&setup);
    let s = TelemetrySample::new(0.0, 100.0, f64::NAN, 10.0, 5.0);
    let p = compute_gradient(&s, &setup, &bias);
    assert_eq!(p.gradient, 0.0);
    assert_eq!(p.state, HandlingState::Neutral);
    assert_eq!(p.confidence, 0.0);
}

#[test]
fn matching_yaw_gives_zero_gradient_and_full_confidence() {
    let setup = neutral_setup();
    let bias = compute_setup_bias(&setup);
    assert_eq!(bias.net(), 0.0);

    // giring som modellen predikerer for 100 km/t og 1.2 g
    let v = 100.0 / 3.6;
    let lat = 1.2;
    let yaw_rad = lat * G / v;
    let steer_deg = (yaw_rad * setup.wheelbase() / v).atan().to_degrees();
    let s = TelemetrySample::new(0.0, 100.0, lat, yaw_rad.to_degrees(), steer_deg);

    let p = compute_gradient(&s, &setup, &bias);
    assert!(p.gradient.abs() < 1e-9, "gradient={}", p.gradient);
    assert!(p.confidence > 99.9);
    assert!((p.theoretical_yaw_rate_deg_s - bicycle_yaw_rate_deg_s(100.0, steer_deg, &setup)).abs() < 1e-9);
}

#[test]
fn less_rotation_than_predicted_is_understeer_in_both_directions() {
    let setup = neutral_setup();
    let bias = compute_setup_bias(&setup);

    let right = TelemetrySample::new(0.0, 100.0, 1.2, 5.0, 1.0);
    let left = TelemetrySample::new(0.0, 100.0, -1.2, -5.0, -1.0);
    let pr = compute_gradient(&right, &setup, &bias);
    let pl = compute_gradient(&left, &setup, &bias);

    assert!(pr.gradient > 0.0);
    assert!((pr.gradient - pl.gradient).abs() < 1e-12, "fortegn skal normaliseres mot svingretning");
}

#[test]
fn custom_thresholds_are_respected() {
    let cfg = AnalysisCfg { understeer_threshold: 0.2, oversteer_threshold: -0.2, ..AnalysisCfg::default() };
    assert_eq!(classify_gradient(0.1, &cfg), HandlingState::Neutral);
    assert_eq!(classify_gradient(0.21, &cfg), HandlingState::Understeer);
    assert_eq!(classify_gradient(-0.21, &cfg), HandlingState::Oversteer);
}

#[test]
fn distance_is_integrated_from_speed() {
    let mut samples: Vec<_> = (0..5)
        .map(|i| TelemetrySample::new(i as f64, 36.0, 0.0, 0.0, 0.0))
        .collect();
    fill_distance_if_missing(&mut samples);
    // 36 km/t = 10 m/s
    assert_eq!(samples[0].distance_m, Some(0.0));
    assert!((samples[4].distance_m.unwrap_or(0.0) - 40.0).abs() < 1e-9);
}

#[test]
fn existing_distance_is_left_alone() {
    let mut samples = vec![
        TelemetrySample::new(0.0, 36.0, 0.0, 0.0, 0.0).with_distance(100.0),
        TelemetrySample::new(1.0, 36.0, 0.0, 0.0, 0.0),
    ];
    fill_distance_if_missing(&mut samples);
    assert_eq!(samples[0].distance_m, Some(100.0));
    assert_eq!(samples[1].distance_m, None);
}
