#![forbid(unsafe_code)]

//! Customization snapshots consumed by the precedence rules.
//!
//! A [`MobileIconCustomization`] is rebuilt from scratch whenever one of its
//! constituent inputs changes; it is never mutated in place. Fields that a
//! particular graph node does not fill keep their `Default` values.

use serde::{Deserialize, Serialize};

use crate::icon::{MobileIconGroup, icon_groups};
use crate::network_type::NetworkType;

/// 5G badge type reported by the modem vendor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NrIconType {
    #[default]
    Invalid,
    None,
    FiveGBasic,
    FiveGUwb,
}

impl NrIconType {
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::FiveGBasic,
            2 => Self::FiveGUwb,
            _ => Self::Invalid,
        }
    }
}

/// 5G service state for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FiveGServiceState {
    pub nr_icon_type: NrIconType,
}

impl FiveGServiceState {
    #[must_use]
    pub const fn new(nr_icon_type: NrIconType) -> Self {
        Self { nr_icon_type }
    }

    /// True when the vendor service reported a displayable 5G type.
    #[must_use]
    pub const fn is_nr_icon_type_valid(&self) -> bool {
        !matches!(self.nr_icon_type, NrIconType::Invalid | NrIconType::None)
    }

    /// Icon group for the reported type; `None` when not valid.
    #[must_use]
    pub fn icon_group(&self) -> Option<MobileIconGroup> {
        match self.nr_icon_type {
            NrIconType::FiveGBasic => Some(icon_groups::five_g()),
            NrIconType::FiveGUwb => Some(icon_groups::five_g_plus()),
            NrIconType::Invalid | NrIconType::None => None,
        }
    }
}

/// Aggregate snapshot of customization inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MobileIconCustomization {
    // Signal strength
    pub always_use_rsrp_level_for_lte: bool,
    pub lte_rsrp_level: i32,

    // Network types
    pub voice_network_type: NetworkType,
    pub data_network_type: NetworkType,
    pub origin_network_type: NetworkType,
    pub five_g_service_state: FiveGServiceState,

    // RAT icon policy
    pub is_rat_customization: bool,
    pub always_show_network_type_icon: bool,
    pub dds_rat_icon_enhancement_enabled: bool,
    pub non_dds_rat_icon_enhancement_enabled: bool,

    // Data and roaming
    pub mobile_data_enabled: bool,
    pub data_roaming_enabled: bool,
    pub is_default_data_sub: bool,
    pub is_roaming: bool,

    // IMS
    pub voice_capable: bool,
    pub video_capable: bool,
    pub ims_registered: bool,
}

impl MobileIconCustomization {
    /// True when voice or data is registered on LTE or LTE-CA.
    #[must_use]
    pub const fn is_lte_camped(&self) -> bool {
        self.data_network_type.is_lte() || self.voice_network_type.is_lte()
    }
}
