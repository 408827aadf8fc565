pub mod config;
pub mod error;
pub mod model;
pub mod notices;
pub mod service;
pub mod telemetry;
