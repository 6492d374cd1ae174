//! Dashboard-facing layer over `market_indicators`: TOML configuration, request
//! handling and the `chart-compute` CLI.

pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod request;

pub use config::{DashboardConfig, load_config_path, load_config_str};
pub use error::ServiceError;
pub use request::{ChartService, ComputeRequest};
