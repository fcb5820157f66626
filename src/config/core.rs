use serde::{Deserialize, Serialize};

/// Root configuration structure for mocktail
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MocktailConfig {
    /// Mock generation settings
    #[serde(default)]
    pub mock: MockSettings,
}

/// What `generate_class_mock` does when a class name is already installed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RedefinitionPolicy {
    /// Fail with `MockError::MockInstallation`
    #[default]
    Reject,
    /// Install the new mock in place of the old one
    Replace,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockSettings {
    /// Declared name that marks a method as the constructor (case-insensitive)
    #[serde(default = "default_constructor_name")]
    pub constructor_name: String,

    #[serde(default)]
    pub redefinition: RedefinitionPolicy,

    /// Blank comments and string literals before scanning
    #[serde(default = "default_sanitize")]
    pub sanitize: bool,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            constructor_name: default_constructor_name(),
            redefinition: RedefinitionPolicy::default(),
            sanitize: default_sanitize(),
        }
    }
}

pub fn default_constructor_name() -> String {
    "__construct".to_string()
}

pub fn default_sanitize() -> bool {
    true
}

impl MocktailConfig {
    /// Config with the given redefinition policy and defaults elsewhere
    pub fn with_redefinition(policy: RedefinitionPolicy) -> Self {
        let mut config = Self::default();
        config.mock.redefinition = policy;
        config
    }
}
