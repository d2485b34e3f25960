// Shared library for the signup API: settings, persistence and telemetry

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod telemetry;
pub mod users;
pub mod validation;
