#![forbid(unsafe_code)]

//! Radio technologies, display overrides, and resolved network types.
//!
//! Raw telephony reports identify the radio technology with a small integer.
//! [`NetworkType`] gives those ids names, and [`NetworkType::icon_key`]
//! produces the key used by icon mappings (the decimal id, so that mappings
//! supplied by an operator configuration line up with the platform's).
//!
//! # Invariants
//!
//! 1. `NetworkType::from_raw(t.raw()) == t` for every variant.
//! 2. Unrecognized raw ids map to [`NetworkType::Unknown`], never an error.
//! 3. Every [`ResolvedNetworkType`] has a lookup key, even `Unknown`.

use serde::{Deserialize, Serialize};

/// Radio access technology reported for voice or data registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetworkType {
    #[default]
    Unknown,
    Gprs,
    Edge,
    Umts,
    Cdma,
    Evdo0,
    EvdoA,
    OneXRtt,
    Hsdpa,
    Hsupa,
    Hspa,
    Iden,
    EvdoB,
    Lte,
    Ehrpd,
    Hspap,
    Gsm,
    TdScdma,
    Iwlan,
    LteCa,
    Nr,
}

/// Generation bucket used for human-readable network descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkClass {
    Unknown,
    TwoG,
    ThreeG,
    FourG,
    FiveG,
}

impl NetworkType {
    /// Map a raw telephony id to a network type.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Gprs,
            2 => Self::Edge,
            3 => Self::Umts,
            4 => Self::Cdma,
            5 => Self::Evdo0,
            6 => Self::EvdoA,
            7 => Self::OneXRtt,
            8 => Self::Hsdpa,
            9 => Self::Hsupa,
            10 => Self::Hspa,
            11 => Self::Iden,
            12 => Self::EvdoB,
            13 => Self::Lte,
            14 => Self::Ehrpd,
            15 => Self::Hspap,
            16 => Self::Gsm,
            17 => Self::TdScdma,
            18 => Self::Iwlan,
            19 => Self::LteCa,
            20 => Self::Nr,
            _ => Self::Unknown,
        }
    }

    /// The raw telephony id.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Gprs => 1,
            Self::Edge => 2,
            Self::Umts => 3,
            Self::Cdma => 4,
            Self::Evdo0 => 5,
            Self::EvdoA => 6,
            Self::OneXRtt => 7,
            Self::Hsdpa => 8,
            Self::Hsupa => 9,
            Self::Hspa => 10,
            Self::Iden => 11,
            Self::EvdoB => 12,
            Self::Lte => 13,
            Self::Ehrpd => 14,
            Self::Hspap => 15,
            Self::Gsm => 16,
            Self::TdScdma => 17,
            Self::Iwlan => 18,
            Self::LteCa => 19,
            Self::Nr => 20,
        }
    }

    /// Key under which icon mappings store the group for this type.
    #[must_use]
    pub fn icon_key(self) -> String {
        self.raw().to_string()
    }

    /// True for LTE and LTE carrier aggregation.
    #[must_use]
    pub const fn is_lte(self) -> bool {
        matches!(self, Self::Lte | Self::LteCa)
    }

    /// Generation bucket of this technology.
    #[must_use]
    pub const fn network_class(self) -> NetworkClass {
        match self {
            Self::Gsm | Self::Gprs | Self::Edge | Self::Cdma | Self::OneXRtt => NetworkClass::TwoG,
            Self::Evdo0
            | Self::EvdoA
            | Self::EvdoB
            | Self::Ehrpd
            | Self::Hsupa
            | Self::Hsdpa
            | Self::Hspa
            | Self::Hspap
            | Self::Umts
            | Self::TdScdma => NetworkClass::ThreeG,
            Self::Lte | Self::LteCa | Self::Iwlan => NetworkClass::FourG,
            Self::Nr => NetworkClass::FiveG,
            Self::Unknown | Self::Iden => NetworkClass::Unknown,
        }
    }
}

/// Display override reported alongside the registration technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverrideNetworkType {
    #[default]
    None,
    LteCa,
    LteAdvancedPro,
    NrNsa,
    NrNsaMmwave,
    NrAdvanced,
}

impl OverrideNetworkType {
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::LteCa,
            2 => Self::LteAdvancedPro,
            3 => Self::NrNsa,
            4 => Self::NrNsaMmwave,
            5 => Self::NrAdvanced,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::LteCa => 1,
            Self::LteAdvancedPro => 2,
            Self::NrNsa => 3,
            Self::NrNsaMmwave => 4,
            Self::NrAdvanced => 5,
        }
    }

    /// 5G anchored on an LTE control plane.
    #[must_use]
    pub const fn is_nsa(self) -> bool {
        matches!(self, Self::NrNsa | Self::NrNsaMmwave)
    }

    /// Key under which icon mappings store the group for this override.
    #[must_use]
    pub fn display_icon_key(self) -> String {
        match self {
            Self::LteCa => format!("{}_CA", NetworkType::Lte.icon_key()),
            Self::LteAdvancedPro => format!("{}_CA_Plus", NetworkType::Lte.icon_key()),
            Self::NrNsa => NetworkType::Nr.icon_key(),
            Self::NrNsaMmwave | Self::NrAdvanced => format!("{}_Plus", NetworkType::Nr.icon_key()),
            Self::None => "unsupported".to_string(),
        }
    }
}

/// The network type the connection should display, after display overrides
/// and carrier-merged Wi-Fi have been taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolvedNetworkType {
    #[default]
    Unknown,
    /// Plain registration technology.
    Default(NetworkType),
    /// Display override (carrier aggregation, NSA 5G, ...).
    Override(OverrideNetworkType),
    /// Carrier Wi-Fi merged into the mobile connection.
    CarrierMerged,
}

impl ResolvedNetworkType {
    /// This type's own mapping key.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        match self {
            Self::Unknown => "unknown".to_string(),
            Self::Default(network_type) => network_type.icon_key(),
            Self::Override(override_type) => override_type.display_icon_key(),
            Self::CarrierMerged => "cwf".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn icon_keys_are_decimal_ids() {
        assert_eq!(NetworkType::Lte.icon_key(), "13");
        assert_eq!(NetworkType::Nr.icon_key(), "20");
        assert_eq!(NetworkType::Unknown.icon_key(), "0");
    }

    #[test]
    fn override_display_keys() {
        assert_eq!(OverrideNetworkType::LteCa.display_icon_key(), "13_CA");
        assert_eq!(OverrideNetworkType::LteAdvancedPro.display_icon_key(), "13_CA_Plus");
        assert_eq!(OverrideNetworkType::NrNsa.display_icon_key(), "20");
        assert_eq!(OverrideNetworkType::NrAdvanced.display_icon_key(), "20_Plus");
        assert_eq!(OverrideNetworkType::None.display_icon_key(), "unsupported");
    }

    #[test]
    fn nsa_detection() {
        assert!(OverrideNetworkType::NrNsa.is_nsa());
        assert!(OverrideNetworkType::NrNsaMmwave.is_nsa());
        assert!(!OverrideNetworkType::NrAdvanced.is_nsa());
        assert!(!OverrideNetworkType::LteCa.is_nsa());
    }

    #[test]
    fn network_classes() {
        assert_eq!(NetworkType::Edge.network_class(), NetworkClass::TwoG);
        assert_eq!(NetworkType::Hspap.network_class(), NetworkClass::ThreeG);
        assert_eq!(NetworkType::LteCa.network_class(), NetworkClass::FourG);
        assert_eq!(NetworkType::Nr.network_class(), NetworkClass::FiveG);
        assert_eq!(NetworkType::Iden.network_class(), NetworkClass::Unknown);
    }

    #[test]
    fn resolved_lookup_keys() {
        assert_eq!(ResolvedNetworkType::Unknown.lookup_key(), "unknown");
        assert_eq!(ResolvedNetworkType::Default(NetworkType::Umts).lookup_key(), "3");
        assert_eq!(
            ResolvedNetworkType::Override(OverrideNetworkType::LteCa).lookup_key(),
            "13_CA"
        );
        assert_eq!(ResolvedNetworkType::CarrierMerged.lookup_key(), "cwf");
    }

    proptest! {
        #[test]
        fn from_raw_never_panics_and_round_trips_known_ids(raw in -5i32..40) {
            let network_type = NetworkType::from_raw(raw);
            if (0..=20).contains(&raw) {
                prop_assert_eq!(network_type.raw(), raw);
            } else {
                prop_assert_eq!(network_type, NetworkType::Unknown);
            }
        }
    }
}
