// Config layer - environment-driven configuration
pub mod logging;
pub mod security_settings;

pub use security_settings::{SecuritySettings, SettingsError};
