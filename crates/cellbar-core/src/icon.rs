#![forbid(unsafe_code)]

//! Icon groups and the tagged icon models handed to the renderer.
//!
//! # Design
//!
//! The renderer consumes closed sum types. [`NetworkTypeIconModel`] is either
//! the group from the mapping lookup or that group with a carrier-specific
//! asset substituted; [`SignalIconModel`] is either the cellular triangle or
//! the satellite glyph. Every consumption site matches exhaustively.
//!
//! Assets are identified by name only. Resolving a name to pixels belongs to
//! the rendering layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::network_type::{NetworkType, OverrideNetworkType};

/// A family of network-type badges (e.g. "LTE", "5G").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobileIconGroup {
    /// Stable name, also the key for carrier-id overrides.
    pub name: String,
    /// Data-type badge asset; `None` shows no badge.
    pub data_type_icon: Option<String>,
    /// Accessibility description of the badge.
    pub data_content_description: String,
}

impl MobileIconGroup {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        data_type_icon: Option<&str>,
        data_content_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type_icon: data_type_icon.map(str::to_string),
            data_content_description: data_content_description.into(),
        }
    }
}

impl Default for MobileIconGroup {
    fn default() -> Self {
        icon_groups::unknown()
    }
}

/// Catalog of the standard icon groups.
pub mod icon_groups {
    use super::MobileIconGroup;

    #[must_use]
    pub fn unknown() -> MobileIconGroup {
        MobileIconGroup::new("Unknown", None, "")
    }

    #[must_use]
    pub fn carrier_network_change() -> MobileIconGroup {
        MobileIconGroup::new("CARRIER_NETWORK_CHANGE", None, "Carrier network changing")
    }

    #[must_use]
    pub fn carrier_merged_wifi() -> MobileIconGroup {
        MobileIconGroup::new("CWF", Some("ic_carrier_wifi"), "Carrier Wi-Fi")
    }

    #[must_use]
    pub fn g() -> MobileIconGroup {
        MobileIconGroup::new("G", Some("ic_g_mobiledata"), "GPRS")
    }

    #[must_use]
    pub fn e() -> MobileIconGroup {
        MobileIconGroup::new("E", Some("ic_e_mobiledata"), "EDGE")
    }

    #[must_use]
    pub fn one_x() -> MobileIconGroup {
        MobileIconGroup::new("1X", Some("ic_1x_mobiledata"), "1X")
    }

    #[must_use]
    pub fn three_g() -> MobileIconGroup {
        MobileIconGroup::new("3G", Some("ic_3g_mobiledata"), "3G")
    }

    #[must_use]
    pub fn h() -> MobileIconGroup {
        MobileIconGroup::new("H", Some("ic_h_mobiledata"), "HSPA")
    }

    #[must_use]
    pub fn h_plus() -> MobileIconGroup {
        MobileIconGroup::new("H+", Some("ic_h_plus_mobiledata"), "HSPA+")
    }

    #[must_use]
    pub fn four_g() -> MobileIconGroup {
        MobileIconGroup::new("4G", Some("ic_4g_mobiledata"), "4G")
    }

    #[must_use]
    pub fn lte() -> MobileIconGroup {
        MobileIconGroup::new("LTE", Some("ic_lte_mobiledata"), "LTE")
    }

    #[must_use]
    pub fn lte_plus() -> MobileIconGroup {
        MobileIconGroup::new("LTE+", Some("ic_lte_plus_mobiledata"), "LTE+")
    }

    #[must_use]
    pub fn wfc() -> MobileIconGroup {
        MobileIconGroup::new("WFC", None, "")
    }

    #[must_use]
    pub fn five_g() -> MobileIconGroup {
        MobileIconGroup::new("5G", Some("ic_5g_mobiledata"), "5G")
    }

    #[must_use]
    pub fn five_g_plus() -> MobileIconGroup {
        MobileIconGroup::new("5G_PLUS", Some("ic_5g_plus_mobiledata"), "5G+")
    }
}

/// Immutable network-type key to icon group table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconMapping {
    groups: Arc<BTreeMap<String, MobileIconGroup>>,
}

impl IconMapping {
    #[must_use]
    pub fn new(groups: BTreeMap<String, MobileIconGroup>) -> Self {
        Self {
            groups: Arc::new(groups),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MobileIconGroup> {
        self.groups.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<(String, MobileIconGroup)> for IconMapping {
    fn from_iter<I: IntoIterator<Item = (String, MobileIconGroup)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The mapping used when the operator configuration supplies none.
#[must_use]
pub fn default_icon_mapping() -> IconMapping {
    let mut groups = BTreeMap::new();
    for (network_type, group) in [
        (NetworkType::Unknown, icon_groups::unknown()),
        (NetworkType::Gprs, icon_groups::g()),
        (NetworkType::Gsm, icon_groups::g()),
        (NetworkType::Edge, icon_groups::e()),
        (NetworkType::Cdma, icon_groups::one_x()),
        (NetworkType::OneXRtt, icon_groups::one_x()),
        (NetworkType::Umts, icon_groups::three_g()),
        (NetworkType::TdScdma, icon_groups::three_g()),
        (NetworkType::Evdo0, icon_groups::three_g()),
        (NetworkType::EvdoA, icon_groups::three_g()),
        (NetworkType::EvdoB, icon_groups::three_g()),
        (NetworkType::Ehrpd, icon_groups::three_g()),
        (NetworkType::Hsdpa, icon_groups::h()),
        (NetworkType::Hsupa, icon_groups::h()),
        (NetworkType::Hspa, icon_groups::h()),
        (NetworkType::Hspap, icon_groups::h_plus()),
        (NetworkType::Lte, icon_groups::lte()),
        (NetworkType::LteCa, icon_groups::lte_plus()),
        (NetworkType::Iwlan, icon_groups::wfc()),
        (NetworkType::Nr, icon_groups::five_g()),
    ] {
        groups.insert(network_type.icon_key(), group);
    }
    groups.insert(
        OverrideNetworkType::LteCa.display_icon_key(),
        icon_groups::lte_plus(),
    );
    groups.insert(
        OverrideNetworkType::LteAdvancedPro.display_icon_key(),
        icon_groups::lte_plus(),
    );
    groups.insert(
        OverrideNetworkType::NrAdvanced.display_icon_key(),
        icon_groups::five_g_plus(),
    );
    IconMapping::new(groups)
}

/// Network-type badge selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkTypeIconModel {
    /// The group from the mapping lookup, unmodified.
    Default(MobileIconGroup),
    /// The group with a carrier-specific asset substituted.
    Overridden(MobileIconGroup, i32),
}

impl NetworkTypeIconModel {
    #[must_use]
    pub fn group(&self) -> &MobileIconGroup {
        match self {
            Self::Default(group) | Self::Overridden(group, _) => group,
        }
    }

    /// Carrier asset id when overridden.
    #[must_use]
    pub const fn override_asset(&self) -> Option<i32> {
        match self {
            Self::Default(_) => None,
            Self::Overridden(_, asset) => Some(*asset),
        }
    }
}

/// Satellite signal glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SatelliteIcon {
    Level0,
    Level1,
    Level2,
    Level3,
}

impl SatelliteIcon {
    /// Glyph for a shown level, `None` when the level has no glyph.
    #[must_use]
    pub const fn from_signal_strength(level: i32) -> Option<Self> {
        match level {
            0 => Some(Self::Level0),
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 | 4 => Some(Self::Level3),
            _ => None,
        }
    }

    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Level0 => "stat_sys_satellite_0",
            Self::Level1 => "stat_sys_satellite_1",
            Self::Level2 => "stat_sys_satellite_2",
            Self::Level3 => "stat_sys_satellite_3",
        }
    }
}

/// Canonical signal strength glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalIconModel {
    Cellular {
        level: i32,
        number_of_levels: i32,
        show_exclamation_mark: bool,
        carrier_network_change: bool,
    },
    Satellite {
        level: i32,
        icon: SatelliteIcon,
    },
}

impl SignalIconModel {
    #[must_use]
    pub const fn level(&self) -> i32 {
        match self {
            Self::Cellular { level, .. } | Self::Satellite { level, .. } => *level,
        }
    }

    #[must_use]
    pub const fn is_satellite(&self) -> bool {
        matches!(self, Self::Satellite { .. })
    }
}
