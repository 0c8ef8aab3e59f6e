/// Risk derivations for the monitoring dashboard.
///
/// Everything here is a pure function of the simulation state and the zone
/// registry. The composite risk score is fully deterministic; zone scoring
/// and the projection series mix in a small uniform jitter on every call —
/// that is a deliberate property of a "live" demo feed, not an accident.
/// Jitter comes from an injected `Rng` so a seeded stream pins the output.
///
/// # Rounding
/// Scores are reported to one decimal place. `round1` is the single
/// rounding helper so every caller agrees on the precision.

use rand::Rng;

use crate::model::{Severity, SimulationState};
use crate::zones::{self, Zone, ZONE_REGISTRY};

/// Projection horizon labels, index-aligned with the series values.
pub const PREDICTION_LABELS: [&str; 6] = ["Now", "1h", "3h", "6h", "12h", "24h"];

/// Day labels for the synthetic model-accuracy series.
pub const ACCURACY_LABELS: [&str; 7] = ["-6d", "-5d", "-4d", "-3d", "-2d", "-1d", "Today"];

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Composite risk score
// ---------------------------------------------------------------------------

/// Computes the composite site risk score in [0, 10], one decimal.
///
/// Weighted blend: 60% mean geological base risk, 20% rainfall influence,
/// 15% seismic influence, 5% blasting influence. Each influence is the
/// simulation field over its reference ceiling (rain/200, seismic/8,
/// blasting/100), capped at 1. Deterministic — no jitter in this function.
pub fn compute_risk_score(sim: &SimulationState) -> f64 {
    let rain_influence = (sim.rainfall_mm / 200.0).min(1.0);
    let seismic_influence = (sim.seismic_mag / 8.0).min(1.0);
    let blast_influence = (sim.blasting_level / 100.0).min(1.0);
    let composite = zones::average_base_risk() * 0.6
        + rain_influence * 0.2
        + seismic_influence * 0.15
        + blast_influence * 0.05;
    round1(composite * 10.0)
}

// ---------------------------------------------------------------------------
// Zone severity annotation
// ---------------------------------------------------------------------------

/// A registry zone annotated with its live score and severity tier.
pub struct ScoredZone {
    pub zone: &'static Zone,
    /// Live score in [0, 1].
    pub score: f64,
    pub severity: Severity,
}

/// Severity tier for a zone score. Boundaries are exclusive-below:
/// a score of exactly 0.7 is Medium, exactly 0.4 is Low.
pub fn classify_score(score: f64) -> Severity {
    if score > 0.7 {
        Severity::High
    } else if score > 0.4 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Annotates every registry zone with a live score and severity.
///
/// Per zone: 60% base risk, 25% rainfall factor, 15% seismic factor, plus
/// uniform jitter in [0, 0.05), capped at 1. Not idempotent across calls.
pub fn zone_severities(sim: &SimulationState, rng: &mut impl Rng) -> Vec<ScoredZone> {
    let rain_factor = (sim.rainfall_mm / 200.0).min(1.0);
    let seismic_factor = (sim.seismic_mag / 8.0).min(1.0);
    ZONE_REGISTRY
        .iter()
        .map(|zone| {
            let noise = rng.gen_range(0.0..0.05);
            let score = (zone.base_risk * 0.6 + rain_factor * 0.25 + seismic_factor * 0.15 + noise)
                .min(1.0);
            ScoredZone {
                zone,
                score,
                severity: classify_score(score),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Projection series
// ---------------------------------------------------------------------------

/// Generates the 6-point risk projection over the horizons in
/// [`PREDICTION_LABELS`].
///
/// The baseline is the current composite risk score; each successive point
/// adds a drift term (rain*0.01 + seismic*0.2 + uniform(-1,1)) scaled by
/// half the point index, clamped to [0, 10] and rounded to one decimal.
/// Point 0 therefore always equals the baseline exactly.
pub fn prediction_series(sim: &SimulationState, rng: &mut impl Rng) -> Vec<f64> {
    let baseline = compute_risk_score(sim);
    (0..PREDICTION_LABELS.len())
        .map(|i| {
            let drift =
                sim.rainfall_mm * 0.01 + sim.seismic_mag * 0.2 + rng.gen_range(-1.0..1.0);
            round1((baseline + drift * (i as f64 / 2.0)).clamp(0.0, 10.0))
        })
        .collect()
}

/// Synthetic trailing model-accuracy percentages for the dashboard's
/// accuracy chart, one per label in [`ACCURACY_LABELS`]. Values hover
/// around 87% with a mild upward trend and per-point jitter, held to
/// [80, 97] and one decimal.
pub fn accuracy_series(rng: &mut impl Rng) -> Vec<f64> {
    (0..ACCURACY_LABELS.len())
        .map(|i| {
            let value = 87.0 + i as f64 * 0.4 + rng.gen_range(-3.0..3.0);
            round1(value.clamp(80.0, 97.0))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
