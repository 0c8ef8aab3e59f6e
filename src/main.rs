/// Daemon entry point: load config, start logging, build the engine,
/// spawn the background tick, and periodically print an overview so an
/// operator tailing the console sees the simulation drifting.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rockmon_service::api;
use rockmon_service::config::{ServiceConfig, DEFAULT_CONFIG_PATH};
use rockmon_service::engine::{self, Engine};
use rockmon_service::logging::{self, Component, LogLevel};

fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match ServiceConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    logging::init_logger(
        LogLevel::from_config(&config.logging.level),
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );
    logging::info(Component::System, None, "rockmon service starting");

    let engine = Arc::new(match config.rng_seed {
        Some(seed) => Engine::with_seed(seed),
        None => Engine::new(),
    });
    if let Some(seed) = config.rng_seed {
        logging::info(Component::System, None, &format!("RNG pinned to seed {}", seed));
    }

    let interval = Duration::from_secs(config.tick_interval_secs.max(1));
    engine::spawn_ticker(Arc::clone(&engine), interval);
    logging::info(
        Component::System,
        None,
        &format!("tick every {}s, {} zones, {} sensors",
            interval.as_secs(),
            rockmon_service::zones::ZONE_REGISTRY.len(),
            rockmon_service::sensors::SENSOR_REGISTRY.len()),
    );

    // Operator heartbeat: one overview line every ten ticks.
    loop {
        std::thread::sleep(interval * 10);
        let overview = api::get_overview(&engine);
        logging::info(
            Component::Engine,
            None,
            &format!(
                "risk {:.1}, sensors {}, {} active alerts, weather {:?}",
                overview.risk_score,
                overview.sensors_online,
                overview.active_alerts,
                overview.weather_impact
            ),
        );
    }
}
