//! Batch of independent environment replicas stepped as one environment.
mod base;
mod config;
pub use base::BatchEnv;
pub use config::BatchEnvConfig;
