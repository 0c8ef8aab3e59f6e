/// Response shaping for the dashboard's JSON boundary.
///
/// The HTTP transport itself is out of scope here — whatever serves these
/// payloads calls one function per operation and serializes the returned
/// struct. Field names follow the dashboard's camelCase contract via
/// serde renames, so the wire shape is pinned in this one module.

use chrono::Utc;
use serde::Serialize;

use crate::analysis::{ACCURACY_LABELS, PREDICTION_LABELS};
use crate::engine::Engine;
use crate::model::{Alert, EngineError, Severity, SimulationState, SimulationUpdate, WeatherImpact};
use crate::sensors::SensorStatus;
use crate::settings::{Settings, SettingsUpdate};
use crate::zones::ZONE_REGISTRY;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    /// Unacknowledged alert count.
    pub active_alerts: usize,
    /// "online/total" over a fresh sensor sample, e.g. "5/6".
    pub sensors_online: String,
    pub risk_score: f64,
    pub weather_impact: WeatherImpact,
    /// RFC 3339.
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorResponse {
    pub id: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    /// Formatted reading, per-kind precision, e.g. "1.042 mm/day".
    pub value: String,
    /// E.g. "87%".
    pub battery: String,
    pub status: SensorStatus,
    pub last_update: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub labels: Vec<&'static str>,
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsResponse {
    pub current_risk_score: f64,
    pub series: SeriesResponse,
    pub accuracy: SeriesResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapZoneResponse {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Live score in [0, 1].
    pub score: f64,
    pub severity: Severity,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub generated_at: String,
    pub overview: OverviewResponse,
    /// The five most recent alerts.
    pub top_alerts: Vec<Alert>,
    pub zones: Vec<String>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Number of alerts the dashboard's alert list shows.
const ALERT_PAGE: usize = 20;

/// Alerts included in an exported report.
const REPORT_ALERTS: usize = 5;

pub fn get_overview(engine: &Engine) -> OverviewResponse {
    let samples = engine.sensor_snapshot();
    let online = samples
        .iter()
        .filter(|s| s.reading.status == SensorStatus::Online)
        .count();
    OverviewResponse {
        active_alerts: engine.active_alert_count(),
        sensors_online: format!("{}/{}", online, samples.len()),
        risk_score: engine.risk_score(),
        weather_impact: engine.weather_impact(),
        last_updated: Utc::now().to_rfc3339(),
    }
}

pub fn get_sensors(engine: &Engine) -> Vec<SensorResponse> {
    let now = Utc::now().to_rfc3339();
    engine
        .sensor_snapshot()
        .into_iter()
        .map(|sample| SensorResponse {
            id: sample.sensor.id.to_string(),
            code: sample.sensor.code.to_string(),
            kind: sample.sensor.kind.to_string(),
            location: sample.sensor.location.to_string(),
            value: format!(
                "{:.prec$} {}",
                sample.reading.value,
                sample.sensor.unit,
                prec = sample.reading.precision
            ),
            battery: format!("{}%", sample.reading.battery_pct),
            status: sample.reading.status,
            last_update: now.clone(),
        })
        .collect()
}

pub fn get_alerts(engine: &Engine) -> Vec<Alert> {
    engine.recent_alerts(ALERT_PAGE)
}

pub fn acknowledge_alert(engine: &Engine, id: i64) -> Result<Alert, EngineError> {
    engine.acknowledge_alert(id)
}

pub fn get_predictions(engine: &Engine) -> PredictionsResponse {
    let data = engine.predictions();
    PredictionsResponse {
        current_risk_score: data.current_risk_score,
        series: SeriesResponse {
            labels: PREDICTION_LABELS.to_vec(),
            values: data.series,
        },
        accuracy: SeriesResponse {
            labels: ACCURACY_LABELS.to_vec(),
            values: data.accuracy,
        },
    }
}

pub fn get_map(engine: &Engine) -> Vec<MapZoneResponse> {
    engine
        .zone_snapshot()
        .into_iter()
        .map(|scored| MapZoneResponse {
            id: scored.zone.id.to_string(),
            name: scored.zone.name.to_string(),
            lat: scored.zone.latitude,
            lng: scored.zone.longitude,
            score: scored.score,
            severity: scored.severity,
        })
        .collect()
}

pub fn get_simulation(engine: &Engine) -> SimulationState {
    engine.simulation()
}

pub fn set_simulation(
    engine: &Engine,
    update: &SimulationUpdate,
) -> Result<SimulationState, EngineError> {
    engine.update_simulation(update)
}

pub fn get_settings(engine: &Engine) -> Settings {
    engine.settings()
}

pub fn set_settings(engine: &Engine, update: SettingsUpdate) -> Settings {
    engine.update_settings(update)
}

/// One-shot report export: overview summary, the five most recent alerts,
/// and the monitored zone names.
pub fn export_report(engine: &Engine) -> ReportResponse {
    ReportResponse {
        generated_at: Utc::now().to_rfc3339(),
        overview: get_overview(engine),
        top_alerts: engine.recent_alerts(REPORT_ALERTS),
        zones: ZONE_REGISTRY.iter().map(|z| z.name.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_shape_serializes_with_contract_keys() {
        let engine = Engine::with_seed(1);
        let json = serde_json::to_value(get_overview(&engine)).expect("serialize");
        assert!(json["activeAlerts"].is_u64());
        assert_eq!(json["riskScore"], serde_json::json!(2.9));
        assert_eq!(json["weatherImpact"], "Low");
        let online = json["sensorsOnline"].as_str().expect("string");
        assert!(online.ends_with("/6"), "got {}", online);
        let ts = json["lastUpdated"].as_str().expect("string");
        assert!(
            chrono::DateTime::parse_from_rfc3339(ts).is_ok(),
            "lastUpdated not RFC 3339: {}",
            ts
        );
    }

    #[test]
    fn test_sensor_values_carry_unit_and_precision() {
        let engine = Engine::with_seed(2);
        let sensors = get_sensors(&engine);
        assert_eq!(sensors.len(), 6);
        let seismometer = sensors
            .iter()
            .find(|s| s.kind == "Seismometer")
            .expect("registry has a seismometer");
        // Four decimal places, then the unit.
        let number = seismometer
            .value
            .strip_suffix(" mm/s")
            .unwrap_or_else(|| panic!("value missing unit: {}", seismometer.value));
        let decimals = number.split('.').nth(1).expect("decimal point");
        assert_eq!(decimals.len(), 4, "seismometer precision: {}", seismometer.value);

        let inclinometer = sensors.iter().find(|s| s.kind == "Inclinometer").expect("exists");
        let number = inclinometer
            .value
            .strip_suffix(" mm/day")
            .unwrap_or_else(|| panic!("value missing unit: {}", inclinometer.value));
        assert_eq!(number.split('.').nth(1).expect("decimal point").len(), 3);

        for sensor in &sensors {
            assert!(sensor.battery.ends_with('%'), "battery: {}", sensor.battery);
        }
    }

    #[test]
    fn test_alert_page_is_capped_at_twenty() {
        let engine = Engine::with_seed(3);
        for _ in 0..30 {
            engine
                .update_simulation(&SimulationUpdate {
                    seismic_mag: Some(8.0),
                    ..Default::default()
                })
                .expect("update should succeed");
        }
        assert_eq!(get_alerts(&engine).len(), 20);
    }

    #[test]
    fn test_predictions_shape_is_label_aligned() {
        let engine = Engine::with_seed(4);
        let predictions = get_predictions(&engine);
        assert_eq!(predictions.series.labels.len(), predictions.series.values.len());
        assert_eq!(predictions.series.labels[0], "Now");
        assert_eq!(predictions.series.values[0], predictions.current_risk_score);
        assert_eq!(predictions.accuracy.labels.len(), predictions.accuracy.values.len());
    }

    #[test]
    fn test_map_covers_registry_with_severities() {
        let engine = Engine::with_seed(5);
        let map = get_map(&engine);
        assert_eq!(map.len(), ZONE_REGISTRY.len());
        // At rest, the 0.75 base-risk wall scores 0.45..0.50 → Medium,
        // and the 0.25 haul road scores 0.15..0.20 → Low.
        let west_wall = map.iter().find(|z| z.id == "zone-a").expect("zone-a");
        assert_eq!(west_wall.severity, Severity::Medium);
        let haul_road = map.iter().find(|z| z.id == "zone-c").expect("zone-c");
        assert_eq!(haul_road.severity, Severity::Low);
    }

    #[test]
    fn test_report_bundles_overview_alerts_and_zones() {
        let engine = Engine::with_seed(6);
        for _ in 0..8 {
            engine
                .update_simulation(&SimulationUpdate {
                    rainfall_mm: Some(200.0),
                    ..Default::default()
                })
                .expect("update should succeed");
        }
        let report = export_report(&engine);
        assert_eq!(report.top_alerts.len(), 5, "report carries the top five alerts");
        assert_eq!(report.zones.len(), 3);
        assert!(report.zones.contains(&"Sector A - West Wall".to_string()));
    }
}
