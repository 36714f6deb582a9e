pub mod app_config;
mod config;
pub mod device;
pub mod stores;

pub use app_config::{AppConfig, Environment, RateLimitConfig, SearchConfig};
pub use config::{load_app_config, load_app_config_from_env, load_search_config};
pub use device::{is_compact_viewport, DeviceInfo, Platform};
pub use stores::{
    load_store_dataset, parse_store_dataset, Coordinates, DatasetError, Geometry, StoreDataset,
    StoreFeature, StoreId, StoreRecord,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
