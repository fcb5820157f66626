//! Configuration for mock generation.
//!
//! Settings come from `.mocktail.toml` in the working directory or one of its
//! ancestors. Every field has a default, so an absent file is the common case.

mod accessors;
mod core;
mod loader;

pub use accessors::get_config;
pub use self::core::{default_constructor_name, MockSettings, MocktailConfig, RedefinitionPolicy};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
