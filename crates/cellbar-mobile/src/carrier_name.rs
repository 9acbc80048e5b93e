#![forbid(unsafe_code)]

//! Operator-specific carrier name customization.
//!
//! When enabled, carrier text is rewritten in one of two ways:
//!
//! - **Roaming combination**: if the SIM operator and the serving network
//!   operator map to different known carriers, the name becomes
//!   `sim_name + connector + network_name`.
//! - **Localization**: the name is split on the separator (at most two
//!   parts), each part is translated through the origin-to-locale table,
//!   optionally suffixed with the network class ("4G", "5G", ...), and a part
//!   equal to the one before it is dropped.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Malformed carrier map entry | Not `MCCMNC:Name` | Entry skipped with a warning |
//! | Unknown operator | MCCMNC not in the carrier map | Treated as not roaming |
//! | Empty input name | `""` | Localization yields `""` |
//! | Empty name part | `" \| Op"` | Part dropped with its separator |

use std::collections::HashMap;
use std::sync::Arc;

use cellbar_core::{NetworkClass, NetworkType, NrIconType};
use serde::{Deserialize, Serialize};

use crate::config::MobileIconConfig;

/// Network state used to append a network class to the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkTypeContext {
    pub nr_icon_type: NrIconType,
    pub data_network_type: NetworkType,
    pub voice_network_type: NetworkType,
    pub is_in_service: bool,
}

/// Rewrites carrier text for display.
pub trait CarrierNameCustomizer: Send + Sync {
    /// Customize `name` for subscription `sub_id`. With `network_type` set
    /// the network class is appended to each part.
    fn customize(
        &self,
        sub_id: i32,
        name: &str,
        network_type: Option<&NetworkTypeContext>,
    ) -> String;
}

/// Customizer that returns every name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomization;

impl CarrierNameCustomizer for NoCustomization {
    fn customize(
        &self,
        _sub_id: i32,
        name: &str,
        _network_type: Option<&NetworkTypeContext>,
    ) -> String {
        name.to_string()
    }
}

/// MCCMNC source for the roaming combination.
pub trait OperatorLookup: Send + Sync {
    /// MCCMNC of the SIM's home operator.
    fn sim_operator(&self, sub_id: i32) -> Option<String>;
    /// MCCMNC of the serving network.
    fn network_operator(&self, sub_id: i32) -> Option<String>;
}

/// Fixed operator table, keyed by subscription id.
#[derive(Debug, Clone, Default)]
pub struct StaticOperators {
    operators: HashMap<i32, (String, String)>,
}

impl StaticOperators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subscription(
        mut self,
        sub_id: i32,
        sim_operator: impl Into<String>,
        network_operator: impl Into<String>,
    ) -> Self {
        self.operators
            .insert(sub_id, (sim_operator.into(), network_operator.into()));
        self
    }
}

impl OperatorLookup for StaticOperators {
    fn sim_operator(&self, sub_id: i32) -> Option<String> {
        self.operators.get(&sub_id).map(|(sim, _)| sim.clone())
    }

    fn network_operator(&self, sub_id: i32) -> Option<String> {
        self.operators.get(&sub_id).map(|(_, network)| network.clone())
    }
}

/// Display strings for each network class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkClassLabels {
    pub unknown: String,
    pub two_g: String,
    pub three_g: String,
    pub four_g: String,
    pub five_g: String,
    pub five_g_advanced: String,
}

impl Default for NetworkClassLabels {
    fn default() -> Self {
        Self {
            unknown: String::new(),
            two_g: "2G".into(),
            three_g: "3G".into(),
            four_g: "4G".into(),
            five_g: "5G".into(),
            five_g_advanced: "5G-A".into(),
        }
    }
}

/// One origin-to-locale carrier name translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub origin: String,
    pub localized: String,
}

/// Carrier name customization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierNameConfig {
    /// Master switch; when off names pass through unchanged.
    pub show_customize_name: bool,
    pub roaming_customization_enabled: bool,
    /// Text between SIM and network operator names when roaming.
    pub connector: String,
    /// Separator between the parts of a carrier name.
    pub separator: String,
    /// `"MCCMNC:Name"` entries.
    pub carrier_map: Vec<String>,
    pub localized_names: Vec<LocalizedName>,
    /// Show "5G-A" instead of "5G" for ultra-wideband.
    pub display_5g_advanced: bool,
    pub labels: NetworkClassLabels,
}

impl Default for CarrierNameConfig {
    fn default() -> Self {
        Self {
            show_customize_name: false,
            roaming_customization_enabled: false,
            connector: "-".into(),
            separator: " | ".into(),
            carrier_map: Vec::new(),
            localized_names: Vec::new(),
            display_5g_advanced: false,
            labels: NetworkClassLabels::default(),
        }
    }
}

impl CarrierNameConfig {
    #[must_use]
    pub fn with_show_customize_name(mut self, enabled: bool) -> Self {
        self.show_customize_name = enabled;
        self
    }

    #[must_use]
    pub fn with_roaming_customization(mut self, enabled: bool) -> Self {
        self.roaming_customization_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_carrier(mut self, mccmnc: &str, name: &str) -> Self {
        self.carrier_map.push(format!("{mccmnc}:{name}"));
        self
    }

    #[must_use]
    pub fn with_localized_name(
        mut self,
        origin: impl Into<String>,
        localized: impl Into<String>,
    ) -> Self {
        self.localized_names.push(LocalizedName {
            origin: origin.into(),
            localized: localized.into(),
        });
        self
    }

    #[must_use]
    pub fn with_display_5g_advanced(mut self, enabled: bool) -> Self {
        self.display_5g_advanced = enabled;
        self
    }
}

/// Parse `"MCCMNC:Name"` entries, skipping malformed ones.
fn parse_carrier_map(entries: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        let parts: Vec<&str> = entry.trim().split(':').collect();
        match parts.as_slice() {
            [mccmnc, name] if !name.is_empty() => {
                map.insert((*mccmnc).to_string(), (*name).to_string());
            }
            _ => tracing::warn!(
                target: "cellbar::carrier_name",
                entry = %entry,
                "invalid carrier map entry"
            ),
        }
    }
    map
}

/// Configurable [`CarrierNameCustomizer`].
pub struct CarrierNameCustomization {
    config: CarrierNameConfig,
    carriers: HashMap<String, String>,
    operators: Arc<dyn OperatorLookup>,
}

impl std::fmt::Debug for CarrierNameCustomization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierNameCustomization")
            .field("config", &self.config)
            .field("carriers", &self.carriers.len())
            .finish()
    }
}

impl CarrierNameCustomization {
    #[must_use]
    pub fn new(config: CarrierNameConfig, operators: Arc<dyn OperatorLookup>) -> Self {
        let carriers = if config.roaming_customization_enabled {
            parse_carrier_map(&config.carrier_map)
        } else {
            HashMap::new()
        };
        Self {
            config,
            carriers,
            operators,
        }
    }

    /// Customization driven by the `carrier_name` section of a loaded
    /// interactor config.
    #[must_use]
    pub fn from_config(config: &MobileIconConfig, operators: Arc<dyn OperatorLookup>) -> Self {
        Self::new(config.carrier_name.clone(), operators)
    }

    fn carrier_for(&self, mccmnc: Option<String>) -> &str {
        mccmnc
            .and_then(|code| self.carriers.get(&code))
            .map_or("", String::as_str)
    }

    /// True when the SIM and serving network belong to different known
    /// carriers.
    #[must_use]
    pub fn is_roaming(&self, sub_id: i32) -> bool {
        let sim = self.carrier_for(self.operators.sim_operator(sub_id));
        let network = self.carrier_for(self.operators.network_operator(sub_id));
        !sim.is_empty() && !network.is_empty() && sim != network
    }

    #[must_use]
    pub fn roaming_carrier_name(&self, sub_id: i32) -> String {
        let sim = self.carrier_for(self.operators.sim_operator(sub_id));
        let network = self.carrier_for(self.operators.network_operator(sub_id));
        format!("{sim}{}{network}", self.config.connector)
    }

    fn localize<'a>(&'a self, part: &'a str) -> &'a str {
        self.config
            .localized_names
            .iter()
            .find(|entry| entry.origin.eq_ignore_ascii_case(part))
            .map_or(part, |entry| entry.localized.as_str())
    }

    /// Empty parts are dropped along with their separator.
    fn localized_name(&self, name: &str, network_class: Option<&str>) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(2);
        for part in name.splitn(2, self.config.separator.as_str()) {
            let localized = self.localize(part);
            if localized.is_empty() {
                continue;
            }
            let decorated = match network_class {
                Some(class) if !class.is_empty() => format!("{localized} {class}"),
                _ => localized.to_string(),
            };
            if parts.last() == Some(&decorated) {
                continue;
            }
            parts.push(decorated);
        }
        parts.join(&self.config.separator)
    }

    /// Network class text for the given network state.
    #[must_use]
    pub fn network_class_label(&self, context: &NetworkTypeContext) -> &str {
        let labels = &self.config.labels;
        let service_type = if !context.is_in_service {
            NetworkType::Unknown
        } else if context.data_network_type == NetworkType::Unknown {
            context.voice_network_type
        } else {
            context.data_network_type
        };

        let nr_valid = !matches!(context.nr_icon_type, NrIconType::Invalid | NrIconType::None);
        if service_type == NetworkType::Nr || (nr_valid && context.data_network_type.is_lte()) {
            if context.nr_icon_type == NrIconType::FiveGUwb && self.config.display_5g_advanced {
                return &labels.five_g_advanced;
            }
            return &labels.five_g;
        }

        match service_type.network_class() {
            NetworkClass::TwoG => &labels.two_g,
            NetworkClass::ThreeG => &labels.three_g,
            // 5G is reported through the branch above.
            NetworkClass::FourG | NetworkClass::FiveG => &labels.four_g,
            NetworkClass::Unknown => &labels.unknown,
        }
    }
}

impl CarrierNameCustomizer for CarrierNameCustomization {
    fn customize(
        &self,
        sub_id: i32,
        name: &str,
        network_type: Option<&NetworkTypeContext>,
    ) -> String {
        if !self.config.show_customize_name {
            return name.to_string();
        }
        if self.config.roaming_customization_enabled && self.is_roaming(sub_id) {
            return self.roaming_carrier_name(sub_id);
        }
        let class = network_type.map(|context| self.network_class_label(context));
        self.localized_name(name, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customizer(config: CarrierNameConfig) -> CarrierNameCustomization {
        let operators = StaticOperators::new()
            .with_subscription(1, "310260", "310260")
            .with_subscription(2, "310260", "46000");
        CarrierNameCustomization::new(config, Arc::new(operators))
    }

    fn lte_context() -> NetworkTypeContext {
        NetworkTypeContext {
            nr_icon_type: NrIconType::None,
            data_network_type: NetworkType::Lte,
            voice_network_type: NetworkType::Lte,
            is_in_service: true,
        }
    }

    #[test]
    fn disabled_passes_through() {
        let c = customizer(CarrierNameConfig::default());
        assert_eq!(c.customize(1, "Carrier", Some(&lte_context())), "Carrier");
    }

    #[test]
    fn roaming_combines_operator_names() {
        let c = customizer(
            CarrierNameConfig::default()
                .with_show_customize_name(true)
                .with_roaming_customization(true)
                .with_carrier("310260", "Home")
                .with_carrier("46000", "Visited"),
        );
        assert!(!c.is_roaming(1));
        assert!(c.is_roaming(2));
        assert_eq!(c.customize(2, "ignored", None), "Home-Visited");
        assert_eq!(c.customize(1, "Home", None), "Home");
    }

    #[test]
    fn malformed_map_entries_are_skipped() {
        let mut config = CarrierNameConfig::default()
            .with_show_customize_name(true)
            .with_roaming_customization(true)
            .with_carrier("310260", "Home");
        config.carrier_map.push("46000".into());
        config.carrier_map.push("46000:Visited:Extra".into());
        let c = customizer(config);
        assert!(!c.is_roaming(2));
    }

    #[test]
    fn localizes_and_appends_network_class() {
        let c = customizer(
            CarrierNameConfig::default()
                .with_show_customize_name(true)
                .with_localized_name("china mobile", "CMCC"),
        );
        assert_eq!(c.customize(1, "China Mobile", Some(&lte_context())), "CMCC 4G");
        assert_eq!(c.customize(1, "China Mobile", None), "CMCC");
    }

    #[test]
    fn duplicate_parts_collapse() {
        let c = customizer(CarrierNameConfig::default().with_show_customize_name(true));
        assert_eq!(c.customize(1, "Op | Op", Some(&lte_context())), "Op 4G");
        assert_eq!(c.customize(1, "Op | Other", None), "Op | Other");
        assert_eq!(c.customize(1, "", None), "");
    }

    #[test]
    fn empty_parts_leave_no_separator() {
        let c = customizer(CarrierNameConfig::default().with_show_customize_name(true));
        assert_eq!(c.customize(1, " | Op", None), "Op");
        assert_eq!(c.customize(1, "Op | ", None), "Op");
        assert_eq!(c.customize(1, " | Op", Some(&lte_context())), "Op 4G");
    }

    #[test]
    fn five_g_labels() {
        let c = customizer(
            CarrierNameConfig::default()
                .with_show_customize_name(true)
                .with_display_5g_advanced(true),
        );
        let nr = NetworkTypeContext {
            data_network_type: NetworkType::Nr,
            ..lte_context()
        };
        assert_eq!(c.network_class_label(&nr), "5G");

        let nsa = NetworkTypeContext {
            nr_icon_type: NrIconType::FiveGBasic,
            ..lte_context()
        };
        assert_eq!(c.network_class_label(&nsa), "5G");

        let uwb = NetworkTypeContext {
            nr_icon_type: NrIconType::FiveGUwb,
            ..lte_context()
        };
        assert_eq!(c.network_class_label(&uwb), "5G-A");
    }

    #[test]
    fn out_of_service_uses_unknown_label() {
        let c = customizer(CarrierNameConfig::default().with_show_customize_name(true));
        let offline = NetworkTypeContext {
            is_in_service: false,
            ..lte_context()
        };
        assert_eq!(c.network_class_label(&offline), "");
        assert_eq!(c.customize(1, "Op", Some(&offline)), "Op");

        let voice_only = NetworkTypeContext {
            data_network_type: NetworkType::Unknown,
            voice_network_type: NetworkType::Edge,
            ..lte_context()
        };
        assert_eq!(c.network_class_label(&voice_only), "2G");
    }
}
