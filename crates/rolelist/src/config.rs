//! Configuration for list models.
//!
//! A [`ListModelConfig`] can be built in code with the `with_*` setters or
//! loaded from TOML:
//!
//! ```
//! use rolelist::config::{IndexBase, ListModelConfig};
//!
//! let config = ListModelConfig::from_toml_str(r#"
//!     default_role_name = "display"
//!     setter_index_base = "one"
//! "#).unwrap();
//!
//! assert_eq!(config.default_role_name, "display");
//! assert_eq!(config.setter_index_base, IndexBase::One);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the implicit role when none is configured.
pub const DEFAULT_ROLE_NAME: &str = "string";

/// Whether setters receive rows counted from zero or from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBase {
    /// Row `n` is passed as `n`.
    #[default]
    Zero,
    /// Row `n` is passed as `n + 1`, for runtimes with 1-based arrays.
    One,
}

impl IndexBase {
    /// Translate a model row into the runtime's index convention.
    #[inline]
    pub fn apply(self, row: usize) -> usize {
        match self {
            IndexBase::Zero => row,
            IndexBase::One => row + 1,
        }
    }
}

/// Tunables of a [`RoleListModel`](crate::model::RoleListModel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListModelConfig {
    /// Name of the implicit stringification role.
    pub default_role_name: String,
    /// Row convention setters are called with.
    pub setter_index_base: IndexBase,
    /// Assert on every entry point that the model is used from the thread
    /// that created it.
    pub check_thread_affinity: bool,
}

impl Default for ListModelConfig {
    fn default() -> Self {
        Self {
            default_role_name: DEFAULT_ROLE_NAME.to_string(),
            setter_index_base: IndexBase::Zero,
            check_thread_affinity: cfg!(debug_assertions),
        }
    }
}

impl ListModelConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the implicit role.
    pub fn with_default_role_name(mut self, name: impl Into<String>) -> Self {
        self.default_role_name = name.into();
        self
    }

    /// Sets the row convention passed to setters.
    pub fn with_setter_index_base(mut self, base: IndexBase) -> Self {
        self.setter_index_base = base;
        self
    }

    /// Enables or disables thread-affinity assertions.
    pub fn with_thread_checks(mut self, enabled: bool) -> Self {
        self.check_thread_affinity = enabled;
        self
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ListModelConfig::default();
        assert_eq!(config.default_role_name, "string");
        assert_eq!(config.setter_index_base, IndexBase::Zero);
        assert_eq!(config.check_thread_affinity, cfg!(debug_assertions));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ListModelConfig::from_toml_str("setter_index_base = \"one\"").unwrap();
        assert_eq!(config.setter_index_base, IndexBase::One);
        assert_eq!(config.default_role_name, DEFAULT_ROLE_NAME);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ListModelConfig::from_toml_str("setter_index_base = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ListModelConfig::new()
            .with_default_role_name("display")
            .with_setter_index_base(IndexBase::One)
            .with_thread_checks(false);
        let text = config.to_toml_string().unwrap();
        assert_eq!(ListModelConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_index_base_apply() {
        assert_eq!(IndexBase::Zero.apply(3), 3);
        assert_eq!(IndexBase::One.apply(3), 4);
    }
}
