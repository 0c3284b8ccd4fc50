//! Hourly water level logger: polls a sensor backend, stores readings in
//! Postgres and serves them over HTTP.

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod range;
pub mod sensors;
