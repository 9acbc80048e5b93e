#![forbid(unsafe_code)]

//! Carrier-id specific network-type icon overrides.
//!
//! Some operators ship their own badge art for particular icon groups. The
//! table is keyed first by carrier id, then by icon group name
//! ([`MobileIconGroup::name`](cellbar_core::MobileIconGroup)). It is injected
//! into the interactor, never looked up from ambient state.
//!
//! Asset ids that are zero or negative mean "no override" and are reported
//! as `None`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Lookup interface for carrier-id icon overrides.
pub trait CarrierIdOverrides: Send + Sync {
    /// True if the carrier has any override at all.
    fn entry_exists(&self, carrier_id: i32) -> bool;

    /// Override asset for `icon_key` on `carrier_id`, if one is configured
    /// and positive.
    fn lookup(&self, carrier_id: i32, icon_key: &str) -> Option<i32>;
}

/// In-memory override table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarrierIdIconOverrides {
    carriers: HashMap<i32, HashMap<String, i32>>,
}

impl CarrierIdIconOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one override.
    #[must_use]
    pub fn with_override(
        mut self,
        carrier_id: i32,
        icon_key: impl Into<String>,
        asset: i32,
    ) -> Self {
        self.carriers
            .entry(carrier_id)
            .or_default()
            .insert(icon_key.into(), asset);
        self
    }

    /// Parse a table of the form `{"<carrier id>": {"<icon key>": <asset>}}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    #[must_use]
    pub fn carrier_count(&self) -> usize {
        self.carriers.len()
    }
}

impl CarrierIdOverrides for CarrierIdIconOverrides {
    fn entry_exists(&self, carrier_id: i32) -> bool {
        self.carriers.contains_key(&carrier_id)
    }

    fn lookup(&self, carrier_id: i32, icon_key: &str) -> Option<i32> {
        self.carriers
            .get(&carrier_id)?
            .get(icon_key)
            .copied()
            .filter(|asset| *asset > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_respects_positive_assets_only() {
        let table = CarrierIdIconOverrides::new()
            .with_override(1, "5G_PLUS", 4242)
            .with_override(1, "LTE", 0)
            .with_override(2, "LTE", -3);
        assert!(table.entry_exists(1));
        assert!(table.entry_exists(2));
        assert!(!table.entry_exists(3));
        assert_eq!(table.lookup(1, "5G_PLUS"), Some(4242));
        assert_eq!(table.lookup(1, "LTE"), None);
        assert_eq!(table.lookup(2, "LTE"), None);
        assert_eq!(table.lookup(1, "3G"), None);
    }

    #[test]
    fn parses_nested_json() {
        let table =
            CarrierIdIconOverrides::from_json_str(r#"{"2032": {"5G_PLUS": 77, "LTE": 12}}"#)
                .expect("valid table");
        assert_eq!(table.carrier_count(), 1);
        assert_eq!(table.lookup(2032, "LTE"), Some(12));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CarrierIdIconOverrides::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
