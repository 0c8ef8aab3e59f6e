/// Zone registry for the open-pit monitoring demo.
///
/// Defines the canonical list of pit sectors covered by the dashboard map,
/// with their locations and intrinsic geological base risk. This is the
/// single source of truth for zone identity — all other modules should
/// reference zones from here rather than hardcoding names.
///
/// Base risk is fixed per zone; the live score and severity tier are
/// derived at query time in `analysis` from the current simulation state.

// ---------------------------------------------------------------------------
// Zone metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitored pit sector.
pub struct Zone {
    /// Short stable identifier, used in API payloads.
    pub id: &'static str,
    /// Human-readable sector name shown on the dashboard map.
    pub name: &'static str,
    /// WGS84 latitude of the sector centroid.
    pub latitude: f64,
    /// WGS84 longitude of the sector centroid.
    pub longitude: f64,
    /// Intrinsic geological risk in [0, 1], from the site survey.
    /// Higher means steeper, more fractured, or more weathered rock.
    pub base_risk: f64,
}

/// All monitored sectors, ordered by descending base risk.
pub static ZONE_REGISTRY: &[Zone] = &[
    Zone {
        id: "zone-a",
        name: "Sector A - West Wall",
        latitude: -23.3582,
        longitude: 119.7321,
        base_risk: 0.75,
    },
    Zone {
        id: "zone-b",
        name: "Sector B - North Bench",
        latitude: -23.3511,
        longitude: 119.7389,
        base_risk: 0.45,
    },
    Zone {
        id: "zone-c",
        name: "Sector C - South Haul Road",
        latitude: -23.3654,
        longitude: 119.7402,
        base_risk: 0.25,
    },
];

/// Mean base risk across the registry, the dominant term of the composite
/// risk score. With the current registry this is (0.75+0.45+0.25)/3.
pub fn average_base_risk() -> f64 {
    let sum: f64 = ZONE_REGISTRY.iter().map(|z| z.base_risk).sum();
    sum / ZONE_REGISTRY.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
