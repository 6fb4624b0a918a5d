//! Configuration lookup.
//!
//! Configuration is a flat map of hierarchical keys such as
//! `IssueModel:runtime:TriggerLabel`. Keys compare case-insensitively. When
//! loaded from the environment, `__` separates sections, so the key above is
//! set with `IssueModel__runtime__TriggerLabel=...`.

use std::collections::HashMap;

/// Read-only key/value configuration with caller-supplied defaults.
pub trait ConfigLookup {
    /// Returns the value for `key`, or `default` if it is unset.
    fn get(&self, key: &str, default: &str) -> String;
}

/// Section separator used in configuration keys.
pub const KEY_SEPARATOR: &str = ":";
/// Section separator used in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// An in-memory [`ConfigLookup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value.
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values.insert(normalize_key(key.as_ref()), value.into());
    }

    /// Builds a config from environment-style variables.
    ///
    /// Only names containing `__` are taken, since a flat name like `PATH`
    /// cannot address a configuration section.
    ///
    /// ```
    /// use issue_labeler::config::{ConfigLookup, MapConfig};
    ///
    /// let config = MapConfig::from_vars([(
    ///     "IssueModel__runtime__TriggerLabel".to_string(),
    ///     "untriaged".to_string(),
    /// )]);
    /// assert_eq!(config.get("IssueModel:runtime:TriggerLabel", "x"), "untriaged");
    /// ```
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut config = MapConfig::new();
        for (name, value) in vars {
            if name.contains(ENV_SEPARATOR) {
                config.insert(name.replace(ENV_SEPARATOR, KEY_SEPARATOR), value);
            }
        }
        config
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigLookup for MapConfig {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(&normalize_key(key))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

impl<T: ConfigLookup + ?Sized> ConfigLookup for &T {
    fn get(&self, key: &str, default: &str) -> String {
        (**self).get(key, default)
    }
}

impl<T: ConfigLookup + ?Sized> ConfigLookup for std::sync::Arc<T> {
    fn get(&self, key: &str, default: &str) -> String {
        (**self).get(key, default)
    }
}

fn normalize_key(key: &str) -> String {
    key.to_ascii_lowercase()
}
