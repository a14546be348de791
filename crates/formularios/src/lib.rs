pub mod config;
pub mod error;
pub mod postings;
pub mod telemetry;
