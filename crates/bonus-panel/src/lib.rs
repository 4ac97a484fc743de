pub mod bonus;
pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;
