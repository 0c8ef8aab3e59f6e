/// Alert emission rules.
///
/// Two paths create alerts:
/// - the periodic tick runs [`evaluate_tick_rules`] — read-only query
///   handlers never do, so polling the dashboard cannot amplify alerts;
/// - an explicit simulation-parameter update runs
///   [`maybe_simulated_event_alert`] synchronously when the submitted
///   values cross the simulated-event thresholds.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::alert::feed::AlertFeed;
use crate::model::{Severity, SimulationState};

// ---------------------------------------------------------------------------
// Rule constants
// ---------------------------------------------------------------------------

/// Composite risk score at or above which the threshold rule fires.
pub const RISK_ALERT_THRESHOLD: f64 = 7.5;

/// Dedup marker: while an unacknowledged alert containing this substring
/// exists, the threshold rule stays quiet.
pub const THRESHOLD_ALERT_MARKER: &str = "probability exceeded";

/// Base probability of a spurious sensor-malfunction alert per tick;
/// blasting activity adds `blasting_level / 5000` on top.
pub const MALFUNCTION_BASE_PROBABILITY: f64 = 0.02;

/// Rainfall above which a parameter update itself raises a simulated-event
/// alert (exclusive).
pub const SIMULATED_EVENT_RAINFALL_MM: f64 = 150.0;

/// Seismic magnitude above which a parameter update itself raises a
/// simulated-event alert (exclusive).
pub const SIMULATED_EVENT_SEISMIC_MAG: f64 = 6.0;

/// Zone credited with threshold-rule alerts; the steepest wall on site.
const THRESHOLD_ALERT_ZONE: &str = "Sector A - West Wall";

const MALFUNCTION_ALERT_ZONE: &str = "Sensor Network";

const SIMULATED_ALERT_ZONE: &str = "Simulation Control";

// ---------------------------------------------------------------------------
// Tick-driven rules
// ---------------------------------------------------------------------------

/// Runs both per-tick rules against the feed. The two rules are
/// independent: a single tick may emit zero, one, or two alerts.
///
/// Rule 1 — threshold: if `risk_score` ≥ 7.5 and no unacknowledged
/// threshold alert is outstanding, emit a High alert whose message embeds
/// the score as a whole percentage (score 7.8 → "78%").
///
/// Rule 2 — malfunction: with probability 0.02 + blasting/5000, emit a
/// Medium sensor-malfunction alert.
pub fn evaluate_tick_rules(
    feed: &mut AlertFeed,
    sim: &SimulationState,
    risk_score: f64,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) {
    if risk_score >= RISK_ALERT_THRESHOLD
        && !feed.has_unacknowledged_containing(THRESHOLD_ALERT_MARKER)
    {
        let pct = (risk_score * 10.0).round() as i64;
        feed.push(
            THRESHOLD_ALERT_ZONE,
            format!("Rockfall probability exceeded {}% threshold", pct),
            Severity::High,
            now,
        );
    }

    let malfunction_p = MALFUNCTION_BASE_PROBABILITY + sim.blasting_level / 5000.0;
    if rng.gen_bool(malfunction_p.clamp(0.0, 1.0)) {
        feed.push(
            MALFUNCTION_ALERT_ZONE,
            "Sensor malfunction detected - intermittent telemetry".to_string(),
            Severity::Medium,
            now,
        );
    }
}

// ---------------------------------------------------------------------------
// Update-driven rule
// ---------------------------------------------------------------------------

/// After a parameter update is applied, emits one High "Simulated" alert
/// if the resulting state crossed either simulated-event threshold
/// (rainfall > 150 mm or seismic > 6.0). Independent of, and in addition
/// to, whatever the next tick emits.
pub fn maybe_simulated_event_alert(
    feed: &mut AlertFeed,
    sim: &SimulationState,
    now: DateTime<Utc>,
) {
    if sim.rainfall_mm > SIMULATED_EVENT_RAINFALL_MM || sim.seismic_mag > SIMULATED_EVENT_SEISMIC_MAG
    {
        feed.push(
            SIMULATED_ALERT_ZONE,
            format!(
                "Simulated event: rainfall {:.0}mm, seismic magnitude {:.1}",
                sim.rainfall_mm, sim.seismic_mag
            ),
            Severity::High,
            now,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
