use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::SetupConfig;
use crate::physics::RoundTo;
use crate::types::{
    AnalysisCfg, BalanceStats, CornerSegment, HandlingState, Priority, Recommendation, RuleGroup,
    SetupParameter,
};

/// Vilkår som må holde for at en regel skal brukes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGuard {
    Always,
    /// Hoppes over når fronten bunner ut (bumpstop-treff over grensen).
    FrontPlatformOk,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub parameter: SetupParameter,
    pub delta: f64, // 0.0 => "behold"
    pub priority: Priority,
    pub group: RuleGroup,
    pub title: &'static str,
    pub rationale: &'static str,
    pub guard: RuleGuard,
}

fn rule(
    parameter: SetupParameter,
    delta: f64,
    priority: Priority,
    title: &'static str,
    rationale: &'static str,
) -> Rule {
    Rule { parameter, delta, priority, group: parameter.group(), title, rationale, guard: RuleGuard::Always }
}

/// Kontekst utenfor svingene som kan slå av regler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationContext {
    pub front_bottoming: bool,
}

/// Regeltabell per hovedproblem, i prioritert tabellrekkefølge.
/// `Neutral` er det faste "balansert"-settet.
pub static RULES: Lazy<HashMap<HandlingState, Vec<Rule>>> = Lazy::new(|| {
    use Priority::*;
    use SetupParameter::*;

    let understeer = vec![
        rule(FrontArb, -2.0, Critical, "Soften front anti-roll bar", "Increases front mechanical grip"),
        rule(RearArb, 1.0, Moderate, "Stiffen rear anti-roll bar", "Reduces rear grip to aid rotation"),
        rule(BrakeBalance, -0.4, Moderate, "Shift brake bias rearward", "Promotes trail-braking rotation"),
        rule(FrontCamber, -0.2, Moderate, "Increase front negative camber", "Improves mid-corner front grip"),
        rule(RearWing, -1.0, Moderate, "Decrease rear wing", "Reduces rear downforce to aid rotation"),
        rule(FrontSpringRate, -10.0, Minor, "Soften front springs", "Allows more weight transfer forward"),
        rule(FrontToe, -0.05, Minor, "Add slight front toe out", "Improves turn-in response"),
        Rule {
            guard: RuleGuard::FrontPlatformOk,
            ..rule(FrontRideHeight, -2.0, Minor, "Lower front ride height", "Increases rake, shifts aero forward")
        },
        rule(RearRideHeight, 2.0, Minor, "Raise rear ride height", "Increases rake, shifts aero forward"),
        rule(Splitter, 1.0, Minor, "Increase front splitter", "Shifts aero balance forward"),
        rule(TractionControl, -1.0, Minor, "Reduce TC for more rotation on exit", "Allows more wheel slip"),
        rule(FrontTyrePressure, -0.2, Minor, "Lower front tyre pressures", "Increases front contact patch"),
        rule(RearTyrePressure, 0.2, Minor, "Increase rear tyre pressures", "Reduces rear grip to aid rotation"),
        rule(Abs, -1.0, Minor, "Reduce ABS intervention", "Can help bite on turn-in"),
    ];

    let oversteer = vec![
        rule(RearArb, -2.0, Critical, "Soften rear anti-roll bar", "Increases rear mechanical grip"),
        rule(FrontArb, 2.0, Moderate, "Stiffen front anti-roll bar", "Reduces front grip, balances car"),
        rule(BrakeBalance, 0.4, Moderate, "Shift brake bias forward", "Reduces lift-off oversteer"),
        rule(RearWing, 1.0, Moderate, "Increase rear wing", "Increases rear stability"),
        rule(DifferentialPower, -5.0, Moderate, "Reduce differential power lock", "Calms power oversteer on exit"),
        rule(RearSpringRate, -10.0, Minor, "Soften rear springs", "Improves traction and stability"),
        rule(RearCamber, -0.2, Minor, "Increase rear negative camber", "Improves rear grip mid-corner"),
        rule(RearToe, 0.05, Minor, "Add rear toe-in", "Stabilises the rear on entry"),
        rule(FrontRideHeight, 2.0, Minor, "Raise front ride height", "Reduces rake, shifts aero rearward"),
        rule(RearRideHeight, -2.0, Minor, "Lower rear ride height", "Reduces rake, shifts aero rearward"),
        rule(TractionControl, 1.0, Minor, "Increase TC for more stability", "Reduces power oversteer"),
        rule(TractionControl2, 1.0, Minor, "Increase TC2 for better traction", "Catches snaps on throttle"),
        rule(RearTyrePressure, -0.2, Minor, "Lower rear tyre pressures", "Increases rear contact patch"),
        rule(FrontTyrePressure, 0.2, Minor, "Increase front tyre pressures", "Reduces front grip slightly"),
    ];

    let balanced = vec![
        rule(FrontArb, 0.0, Minor, "Mechanical balance is strong", "ARBs and springs are in a good window"),
        rule(BrakeBalance, 0.0, Minor, "Brake bias is in a good window", "No major changes needed"),
        rule(RearRideHeight, 0.0, Minor, "Ride height and rake are optimal", "Platform is working efficiently"),
    ];

    let mut m = HashMap::new();
    m.insert(HandlingState::Understeer, understeer);
    m.insert(HandlingState::Oversteer, oversteer);
    m.insert(HandlingState::Neutral, balanced);
    m
});

/// Hovedproblem fra prosentfordelingen. Understeer sjekkes først.
pub fn classify_issue(pct_understeer: f64, pct_oversteer: f64, cfg: &AnalysisCfg) -> HandlingState {
    if pct_understeer > cfg.understeer_pct_threshold {
        HandlingState::Understeer
    } else if pct_oversteer > cfg.oversteer_pct_threshold {
        HandlingState::Oversteer
    } else {
        HandlingState::Neutral
    }
}

/// Aggregert balanse over alle svinger.
pub fn balance_stats(segments: &[CornerSegment], cfg: &AnalysisCfg) -> BalanceStats {
    if segments.is_empty() {
        return BalanceStats::default();
    }

    let n = segments.len() as f64;
    let count = |state: HandlingState| segments.iter().filter(|s| s.dominant_state == state).count() as f64;
    let pct_understeer = 100.0 * count(HandlingState::Understeer) / n;
    let pct_oversteer = 100.0 * count(HandlingState::Oversteer) / n;
    let pct_neutral = 100.0 * count(HandlingState::Neutral) / n;

    // vekt = antall samples × snittkonfidens
    let mut wsum = 0.0;
    let mut gsum = 0.0;
    for s in segments {
        let w = s.sample_count as f64 * (s.avg_confidence / 100.0);
        if w.is_finite() && w > 0.0 && s.avg_gradient.is_finite() {
            wsum += w;
            gsum += w * s.avg_gradient;
        }
    }
    let weighted_avg_gradient = if wsum > 0.0 { gsum / wsum } else { 0.0 };

    BalanceStats {
        corner_count: segments.len(),
        pct_understeer,
        pct_oversteer,
        pct_neutral,
        weighted_avg_gradient,
        primary_issue: classify_issue(pct_understeer, pct_oversteer, cfg),
    }
}

fn maintain(rule: &Rule, setup: &SetupConfig) -> Recommendation {
    let current = rule.parameter.current_value(setup).unwrap_or(f64::NAN);
    let kept = rule.parameter.clamp(current);
    Recommendation {
        title: rule.title.to_string(),
        target_parameter: rule.parameter,
        current_value: if current.is_finite() { current } else { kept },
        recommended_value: kept,
        priority: rule.priority,
        group: rule.group,
        expected_impact: rule.rationale.to_string(),
    }
}

fn balanced_set(setup: &SetupConfig) -> Vec<Recommendation> {
    RULES
        .get(&HandlingState::Neutral)
        .map(|rules| rules.iter().map(|r| maintain(r, setup)).collect())
        .unwrap_or_default()
}

/// Anbefalinger for et gitt hovedproblem. Aldri tom.
pub fn recommend_for_issue(
    issue: HandlingState,
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
    ctx: &RecommendationContext,
) -> Vec<Recommendation> {
    let cap = cfg.max_recommendations.max(1);

    let rules = match issue {
        HandlingState::Neutral => {
            let mut out = balanced_set(setup);
            out.truncate(cap);
            return out;
        }
        _ => RULES.get(&issue).map(Vec::as_slice).unwrap_or(&[]),
    };

    let mut out = Vec::new();
    for r in rules {
        if r.guard == RuleGuard::FrontPlatformOk && ctx.front_bottoming {
            log::debug!("skipping '{}': front is bottoming out", r.title);
            continue;
        }
        let Some(current) = r.parameter.current_value(setup) else { continue };

        let target = r.parameter.clamp(current + r.delta).round_to(3);
        let step = target - current;
        // no-op (allerede ved grensen) undertrykkes
        if step.abs() <= 1e-9 {
            continue;
        }
        // nåverdi utenfor området: klemmingen ville flyttet motsatt vei av regelen
        if step.signum() != r.delta.signum() {
            log::debug!("skipping '{}': current {current} is outside the valid range", r.title);
            continue;
        }

        out.push(Recommendation {
            title: r.title.to_string(),
            target_parameter: r.parameter,
            current_value: current,
            recommended_value: target,
            priority: r.priority,
            group: r.group,
            expected_impact: r.rationale.to_string(),
        });
    }

    if out.is_empty() {
        // alle justeringer står ved grensen
        let first = rules.iter().find(|r| r.parameter.current_value(setup).is_some());
        match first {
            Some(r) => {
                let mut rec = maintain(r, setup);
                rec.title = format!("All {} adjustments are at their limits", issue.label());
                rec.expected_impact = "Consider driving-style changes or a different baseline setup".to_string();
                out.push(rec);
            }
            None => out = balanced_set(setup),
        }
    }

    // stabil sortering: prioritet, deretter tabellrekkefølge
    out.sort_by_key(|r| r.priority);
    out.truncate(cap);
    out
}

/// Full variant med terskler og kontekst.
pub fn generate_recommendations_with(
    segments: &[CornerSegment],
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
    ctx: &RecommendationContext,
) -> Vec<Recommendation> {
    let stats = balance_stats(segments, cfg);
    log::debug!(
        "balance: {:.1}% US / {:.1}% OS / {:.1}% neutral over {} corners => {}",
        stats.pct_understeer,
        stats.pct_oversteer,
        stats.pct_neutral,
        stats.corner_count,
        stats.primary_issue.label()
    );
    recommend_for_issue(stats.primary_issue, setup, cfg, ctx)
}

/// Standardterskler, ingen ekstra kontekst.
pub fn generate_recommendations(segments: &[CornerSegment], setup: &SetupConfig) -> Vec<Recommendation> {
    generate_recommendations_with(segments, setup, &AnalysisCfg::default(), &RecommendationContext::default())
}
