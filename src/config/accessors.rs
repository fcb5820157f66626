use std::sync::OnceLock;

use super::core::MocktailConfig;
use super::loader::load_config;

/// Cache the configuration
static CONFIG: OnceLock<MocktailConfig> = OnceLock::new();

/// Get the cached configuration
pub fn get_config() -> &'static MocktailConfig {
    CONFIG.get_or_init(load_config)
}

