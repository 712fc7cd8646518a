// Configuration loading
// Loaded from <config dir>/tariffscope/tariffscope.toml

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
    config_path, default_document_path, CacheConfig, DocumentConfig, LiveApiConfig, SourcesConfig, TariffConfig,
    ENV_DOCUMENT, ENV_LIVE_API,
};
