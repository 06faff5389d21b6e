pub mod app_config;
pub mod config;
pub mod error;
pub mod scan_config;
pub mod seeds;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use scan_config::{load_scan_config, parse_scan_config, ScanConfig};
pub use seeds::{MetroSeed, DEFAULT_METRO_SEEDS};
pub use types::{
    AggregateKey, AvailabilityFact, FulfillmentType, LocationFields, LocationSeed, StoreRecord,
    TieBreak,
};
