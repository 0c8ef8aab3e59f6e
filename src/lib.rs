//! Rockfall monitoring demo backend.
//!
//! A single `engine::Engine` owns all mutable state (simulation inputs,
//! alert feed, settings); `api` shapes its reads and writes into the
//! dashboard's JSON contract; everything under `analysis`, `zones`, and
//! `sensors` is pure derivation over that state.

pub mod alert;
pub mod analysis;
pub mod api;
pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod sensors;
pub mod settings;
pub mod zones;
