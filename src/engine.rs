/// The simulation & risk engine.
///
/// One `Engine` instance per process owns every piece of mutable state:
/// the simulation inputs, the alert feed, the settings singleton, and the
/// RNG stream behind the jittered reads. Everything lives in a single
/// `Mutex`, so each operation is atomic relative to every other operation
/// — the background tick serializes against request handlers through the
/// same lock. No operation holds the lock across I/O; all computation is
/// in-memory and near-instant.
///
/// Read-only queries never create alerts. Alert emission happens in
/// exactly two places: the periodic tick and an explicit parameter update
/// that crosses the simulated-event thresholds.
///
/// # Clock and randomness injection
/// Mutating entry points come in pairs (`tick` / `tick_at`, etc.) so tests
/// control timestamps; `with_seed` pins the RNG stream.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::alert::{rules, AlertFeed};
use crate::analysis::{self, ScoredZone};
use crate::logging::{self, Component};
use crate::model::{
    Alert, EngineError, SimulationState, SimulationUpdate, WeatherImpact, RAINFALL_MAX_MM,
    SEISMIC_MAX_MAG,
};
use crate::sensors::{self, SensorDefinition, SensorReading, SENSOR_REGISTRY};
use crate::settings::{Settings, SettingsUpdate};

struct EngineState {
    sim: SimulationState,
    feed: AlertFeed,
    settings: Settings,
    rng: ChaCha8Rng,
}

/// Handle to the engine. Cheap to clone via `Arc`; request handlers and
/// the tick thread share one instance.
pub struct Engine {
    state: Mutex<EngineState>,
}

/// A registry sensor paired with its freshly synthesized reading.
pub struct SensorSample {
    pub sensor: &'static SensorDefinition,
    pub reading: SensorReading,
}

/// Snapshot backing the predictions panel.
pub struct PredictionData {
    pub current_risk_score: f64,
    pub series: Vec<f64>,
    pub accuracy: Vec<f64>,
}

impl Engine {
    /// Creates an engine with zeroed simulation state and an
    /// entropy-seeded RNG stream.
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Creates an engine with a pinned RNG stream, for reproducible demos
    /// and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Engine {
            state: Mutex::new(EngineState {
                sim: SimulationState::default(),
                feed: AlertFeed::new(),
                settings: Settings::default(),
                rng,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().unwrap()
    }

    // -----------------------------------------------------------------------
    // Simulation state
    // -----------------------------------------------------------------------

    /// Current simulation inputs.
    pub fn simulation(&self) -> SimulationState {
        self.lock().sim
    }

    /// Applies a partial parameter update, clamping each present field.
    ///
    /// If the resulting state crosses a simulated-event threshold
    /// (rainfall > 150 mm or seismic > 6.0), one High "Simulated" alert is
    /// prepended synchronously, independent of the next tick. A rejected
    /// (non-finite) update leaves both state and feed untouched.
    pub fn update_simulation(
        &self,
        update: &SimulationUpdate,
    ) -> Result<SimulationState, EngineError> {
        self.update_simulation_at(update, Utc::now())
    }

    /// As [`Engine::update_simulation`], with an injected clock for tests.
    pub fn update_simulation_at(
        &self,
        update: &SimulationUpdate,
        now: DateTime<Utc>,
    ) -> Result<SimulationState, EngineError> {
        let mut state = self.lock();
        state.sim.apply(update)?;
        let sim = state.sim;
        rules::maybe_simulated_event_alert(&mut state.feed, &sim, now);
        logging::info(
            Component::Engine,
            None,
            &format!(
                "simulation updated: rain {:.1}mm seismic {:.1} blasting {:.1}",
                sim.rainfall_mm, sim.seismic_mag, sim.blasting_level
            ),
        );
        Ok(sim)
    }

    // -----------------------------------------------------------------------
    // Periodic tick
    // -----------------------------------------------------------------------

    /// One drift-and-evaluate cycle: perturbs the simulation state and
    /// runs the tick-driven alert rules. The only autonomous mutation in
    /// the system.
    ///
    /// Rainfall drifts by uniform(-2, 2) only while already nonzero — it
    /// never spontaneously starts raining. Seismic magnitude always
    /// drifts by uniform(-0.1, 0.1). Both re-clamp into range.
    pub fn tick(&self) {
        self.tick_at(Utc::now());
    }

    /// As [`Engine::tick`], with an injected clock for tests.
    pub fn tick_at(&self, now: DateTime<Utc>) {
        let mut state = self.lock();

        if state.sim.rainfall_mm > 0.0 {
            let delta = state.rng.gen_range(-2.0..2.0);
            state.sim.rainfall_mm = (state.sim.rainfall_mm + delta).clamp(0.0, RAINFALL_MAX_MM);
        }
        let delta = state.rng.gen_range(-0.1..0.1);
        state.sim.seismic_mag = (state.sim.seismic_mag + delta).clamp(0.0, SEISMIC_MAX_MAG);

        let sim = state.sim;
        let risk = analysis::compute_risk_score(&sim);
        logging::debug(
            Component::Tick,
            None,
            &format!(
                "drifted to rain {:.1}mm seismic {:.2}, risk {:.1}",
                sim.rainfall_mm, sim.seismic_mag, risk
            ),
        );

        let newest_before = state.feed.all().first().map(|a| a.id);
        let EngineState { feed, rng, .. } = &mut *state;
        rules::evaluate_tick_rules(feed, &sim, risk, rng, now);
        for alert in state.feed.all() {
            if Some(alert.id) <= newest_before {
                break;
            }
            logging::warn(
                Component::Alert,
                Some(&alert.zone),
                &format!("{} [{}]", alert.msg, alert.severity),
            );
        }
    }

    // -----------------------------------------------------------------------
    // Derived reads
    // -----------------------------------------------------------------------

    /// Deterministic composite risk score for the current state.
    pub fn risk_score(&self) -> f64 {
        analysis::compute_risk_score(&self.lock().sim)
    }

    /// Weather impact tier for the current rainfall.
    pub fn weather_impact(&self) -> WeatherImpact {
        WeatherImpact::from_rainfall(self.lock().sim.rainfall_mm)
    }

    /// Fresh synthetic readings for every registry sensor. Jittered per
    /// call; consumes the engine's RNG stream.
    pub fn sensor_snapshot(&self) -> Vec<SensorSample> {
        let mut state = self.lock();
        let sim = state.sim;
        SENSOR_REGISTRY
            .iter()
            .map(|sensor| SensorSample {
                sensor,
                reading: sensors::generate_reading(sensor, &sim, &mut state.rng),
            })
            .collect()
    }

    /// Every registry zone annotated with a live score and severity.
    /// Jittered per call.
    pub fn zone_snapshot(&self) -> Vec<ScoredZone> {
        let mut state = self.lock();
        let sim = state.sim;
        analysis::zone_severities(&sim, &mut state.rng)
    }

    /// Projection and accuracy series for the predictions panel.
    pub fn predictions(&self) -> PredictionData {
        let mut state = self.lock();
        let sim = state.sim;
        PredictionData {
            current_risk_score: analysis::compute_risk_score(&sim),
            series: analysis::prediction_series(&sim, &mut state.rng),
            accuracy: analysis::accuracy_series(&mut state.rng),
        }
    }

    // -----------------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------------

    /// The `count` most recent alerts, newest first.
    pub fn recent_alerts(&self, count: usize) -> Vec<Alert> {
        self.lock().feed.recent(count).to_vec()
    }

    /// Number of unacknowledged alerts.
    pub fn active_alert_count(&self) -> usize {
        self.lock().feed.unacknowledged_count()
    }

    /// Total number of retained alerts (≤ feed cap).
    pub fn alert_count(&self) -> usize {
        self.lock().feed.len()
    }

    /// Marks an alert acknowledged and returns the updated record.
    /// Re-acknowledging succeeds; an unknown id is `AlertNotFound`.
    pub fn acknowledge_alert(&self, id: i64) -> Result<Alert, EngineError> {
        let mut state = self.lock();
        let alert = state.feed.acknowledge(id)?.clone();
        logging::info(
            Component::Alert,
            Some(&alert.zone),
            &format!("alert {} acknowledged", alert.id),
        );
        Ok(alert)
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> Settings {
        self.lock().settings.clone()
    }

    /// Applies a per-section shallow merge and returns the full settings.
    pub fn update_settings(&self, update: SettingsUpdate) -> Settings {
        let mut state = self.lock();
        state.settings.merge(update);
        logging::info(Component::Engine, None, "settings updated");
        state.settings.clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

// ---------------------------------------------------------------------------
// Background ticker
// ---------------------------------------------------------------------------

/// Spawns the tick thread. Runs for the life of the process; the daemon
/// never joins it.
pub fn spawn_ticker(engine: Arc<Engine>, interval: Duration) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        engine.tick();
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_engine_starts_at_rest() {
        let engine = Engine::with_seed(1);
        let sim = engine.simulation();
        assert_eq!(sim, SimulationState::default());
        assert_eq!(engine.risk_score(), 2.9, "pinned all-zero score");
        assert_eq!(engine.alert_count(), 0);
    }

    #[test]
    fn test_update_clamps_and_reports_new_state() {
        let engine = Engine::with_seed(1);
        let sim = engine
            .update_simulation_at(
                &SimulationUpdate {
                    rainfall_mm: Some(500.0),
                    ..Default::default()
                },
                fixed_now(),
            )
            .expect("finite update should succeed");
        assert_eq!(sim.rainfall_mm, 300.0);
    }

    #[test]
    fn test_seismic_update_above_6_raises_simulated_alert() {
        let engine = Engine::with_seed(1);
        engine
            .update_simulation_at(
                &SimulationUpdate {
                    seismic_mag: Some(7.0),
                    ..Default::default()
                },
                fixed_now(),
            )
            .expect("update should succeed");
        let alerts = engine.recent_alerts(20);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].msg.starts_with("Simulated event"));
        assert_eq!(alerts[0].severity, crate::model::Severity::High);
    }

    #[test]
    fn test_rainfall_never_starts_from_dry_state_under_ticks() {
        let engine = Engine::with_seed(9);
        for _ in 0..200 {
            engine.tick_at(fixed_now());
        }
        assert_eq!(
            engine.simulation().rainfall_mm,
            0.0,
            "dry state must stay dry under drift"
        );
    }

    #[test]
    fn test_tick_drift_keeps_state_inside_clamps() {
        let engine = Engine::with_seed(4);
        engine
            .update_simulation_at(
                &SimulationUpdate {
                    rainfall_mm: Some(1.0),
                    seismic_mag: Some(9.95),
                    ..Default::default()
                },
                fixed_now(),
            )
            .expect("update should succeed");
        for _ in 0..500 {
            engine.tick_at(fixed_now());
            let sim = engine.simulation();
            assert!((0.0..=RAINFALL_MAX_MM).contains(&sim.rainfall_mm));
            assert!((0.0..=SEISMIC_MAX_MAG).contains(&sim.seismic_mag));
        }
    }

    #[test]
    fn test_reads_never_create_alerts() {
        let engine = Engine::with_seed(6);
        engine
            .update_simulation_at(
                &SimulationUpdate {
                    rainfall_mm: Some(140.0),
                    seismic_mag: Some(5.9),
                    blasting_level: Some(90.0),
                },
                fixed_now(),
            )
            .expect("update below simulated-event thresholds");
        assert_eq!(engine.alert_count(), 0);

        // Hammer every read path; none may emit an alert.
        for _ in 0..50 {
            let _ = engine.risk_score();
            let _ = engine.weather_impact();
            let _ = engine.sensor_snapshot();
            let _ = engine.zone_snapshot();
            let _ = engine.predictions();
            let _ = engine.recent_alerts(20);
            let _ = engine.active_alert_count();
        }
        assert_eq!(engine.alert_count(), 0, "read paths must be side-effect free");
    }

    #[test]
    fn test_alert_cap_holds_under_sustained_threshold_ticks() {
        let engine = Engine::with_seed(8);
        // Max out everything: risk 6.9 is below the threshold rule, so
        // drive the cap through repeated simulated-event updates instead.
        for _ in 0..60 {
            engine
                .update_simulation_at(
                    &SimulationUpdate {
                        seismic_mag: Some(8.0),
                        ..Default::default()
                    },
                    fixed_now(),
                )
                .expect("update should succeed");
        }
        assert_eq!(engine.alert_count(), 50);
    }

    #[test]
    fn test_acknowledge_roundtrip_through_engine() {
        let engine = Engine::with_seed(10);
        engine
            .update_simulation_at(
                &SimulationUpdate {
                    rainfall_mm: Some(200.0),
                    ..Default::default()
                },
                fixed_now(),
            )
            .expect("update should succeed");
        let id = engine.recent_alerts(1)[0].id;
        assert_eq!(engine.active_alert_count(), 1);

        let acked = engine.acknowledge_alert(id).expect("known id");
        assert!(acked.acknowledged);
        assert_eq!(engine.active_alert_count(), 0);

        // Idempotent re-ack, then a genuinely unknown id.
        engine.acknowledge_alert(id).expect("re-ack is a no-op success");
        assert_eq!(
            engine.acknowledge_alert(id + 999),
            Err(EngineError::AlertNotFound(id + 999))
        );
    }

    #[test]
    fn test_seeded_engines_agree_on_jittered_reads() {
        let a = Engine::with_seed(1234);
        let b = Engine::with_seed(1234);
        let update = SimulationUpdate {
            rainfall_mm: Some(80.0),
            seismic_mag: Some(3.0),
            blasting_level: Some(20.0),
        };
        a.update_simulation_at(&update, fixed_now()).expect("update");
        b.update_simulation_at(&update, fixed_now()).expect("update");

        let pa = a.predictions();
        let pb = b.predictions();
        assert_eq!(pa.series, pb.series);
        assert_eq!(pa.accuracy, pb.accuracy);

        let za: Vec<f64> = a.zone_snapshot().iter().map(|z| z.score).collect();
        let zb: Vec<f64> = b.zone_snapshot().iter().map(|z| z.score).collect();
        assert_eq!(za, zb);
    }
}
