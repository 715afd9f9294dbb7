//! Workspace settings (`.ts-catalog.json`)
/// Settings file loader
mod loader;
/// Settings manager
mod manager;
/// Settings types and validation
mod types;

pub use loader::SETTINGS_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    CatalogSettings,
    ConfigError,
    ValidationError,
};
