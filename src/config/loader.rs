use std::fs;
use std::path::{Path, PathBuf};

use super::core::MocktailConfig;
use crate::common::is_identifier;
use crate::errors::{MockError, Result};

pub const CONFIG_FILE_NAME: &str = ".mocktail.toml";

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<MocktailConfig> {
    let config = toml::from_str::<MocktailConfig>(contents)
        .map_err(|e| MockError::Config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;

    if !is_identifier(&config.mock.constructor_name) {
        return Err(MockError::Config(format!(
            "constructor_name `{}` is not an identifier",
            config.mock.constructor_name
        )));
    }

    Ok(config)
}

/// Try loading config from a specific path; missing files are not an error
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<MocktailConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
    .take(max_depth)
}

/// Load `.mocktail.toml` from `start` or the nearest ancestor holding one
pub fn load_config_from(start: &Path) -> MocktailConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No {} found after checking {} directories. Using default config.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            MocktailConfig::default()
        })
}

pub fn load_config() -> MocktailConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            MocktailConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedefinitionPolicy;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [mock]
            constructor_name = "init"
            redefinition = "replace"
            sanitize = false
        "#})
        .unwrap();

        assert_eq!(config.mock.constructor_name, "init");
        assert_eq!(config.mock.redefinition, RedefinitionPolicy::Replace);
        assert!(!config.mock.sanitize);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, MocktailConfig::default());
        assert_eq!(config.mock.constructor_name, "__construct");
        assert_eq!(config.mock.redefinition, RedefinitionPolicy::Reject);
        assert!(config.mock.sanitize);
    }

    #[test]
    fn test_rejects_bad_constructor_name() {
        let err = parse_and_validate_config("[mock]\nconstructor_name = \"not valid\"\n")
            .unwrap_err();
        assert!(matches!(err, MockError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(parse_and_validate_config("[mock]\nredefinition = \"merge\"\n").is_err());
    }

    #[test]
    fn test_load_config_from_ancestor() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[mock]\nredefinition = \"replace\"\n",
        )
        .unwrap();

        let config = load_config_from(&nested);
        assert_eq!(config.mock.redefinition, RedefinitionPolicy::Replace);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "[mock\n").unwrap();

        assert_eq!(load_config_from(root.path()), MocktailConfig::default());
    }
}
