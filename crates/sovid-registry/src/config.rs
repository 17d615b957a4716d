//! Registry configuration.
//!
//! Covers only ambient behaviour. The bounds that form the compatibility
//! contract (field lengths, list capacities, expiry range) are constants in
//! `sovid_core::validation` and are not configurable.

/// Default number of retained journal events.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 10_000;

/// Configuration for a registry instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Whether committed mutations are recorded in the event journal.
    pub journal_enabled: bool,
    /// Maximum retained journal events; the oldest are dropped first.
    journal_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            journal_enabled: true,
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SOVID_JOURNAL_ENABLED` (default: `true`; accepts `true`/`false`/`1`/`0`/`yes`/`no`)
    /// - `SOVID_JOURNAL_CAPACITY` (default: `10000`; must be greater than zero)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let journal_enabled = match lookup("SOVID_JOURNAL_ENABLED") {
            None => defaults.journal_enabled,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    value = %raw,
                    "SOVID_JOURNAL_ENABLED is not a boolean, using default"
                );
                defaults.journal_enabled
            }),
        };

        let journal_capacity = match lookup("SOVID_JOURNAL_CAPACITY") {
            None => defaults.journal_capacity,
            Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    "SOVID_JOURNAL_CAPACITY is not an integer, using default"
                );
                defaults.journal_capacity
            }),
        };

        Self::default()
            .with_journal(journal_enabled)
            .with_journal_capacity(journal_capacity)
    }

    /// Enable or disable the event journal.
    pub fn with_journal(mut self, enabled: bool) -> Self {
        self.journal_enabled = enabled;
        self
    }

    /// Set the journal capacity.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroJournalCapacity` if `capacity` is zero;
    /// disable the journal instead.
    pub fn with_journal_capacity(mut self, capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroJournalCapacity);
        }
        self.journal_capacity = capacity;
        Ok(self)
    }

    /// Maximum retained journal events.
    pub fn journal_capacity(&self) -> usize {
        self.journal_capacity
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("journal capacity must be greater than zero")]
    ZeroJournalCapacity,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = RegistryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, RegistryConfig::default());
        assert!(cfg.journal_enabled);
        assert_eq!(cfg.journal_capacity(), DEFAULT_JOURNAL_CAPACITY);
    }

    #[test]
    fn test_reads_overrides() {
        let cfg = RegistryConfig::from_lookup(lookup_from(&[
            ("SOVID_JOURNAL_ENABLED", "no"),
            ("SOVID_JOURNAL_CAPACITY", " 25 "),
        ]))
        .unwrap();
        assert!(!cfg.journal_enabled);
        assert_eq!(cfg.journal_capacity(), 25);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let cfg = RegistryConfig::from_lookup(lookup_from(&[
            ("SOVID_JOURNAL_ENABLED", "maybe"),
            ("SOVID_JOURNAL_CAPACITY", "lots"),
        ]))
        .unwrap();
        assert_eq!(cfg, RegistryConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result =
            RegistryConfig::from_lookup(lookup_from(&[("SOVID_JOURNAL_CAPACITY", "0")]));
        assert_eq!(result, Err(ConfigError::ZeroJournalCapacity));
        assert!(RegistryConfig::default().with_journal_capacity(0).is_err());
    }
}
