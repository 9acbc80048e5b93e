#![forbid(unsafe_code)]

//! Precedence rules for every derived category of the mobile icon.
//!
//! Each function here is pure and total: every branch has an explicit
//! fallback, so a graph node that calls it always has a defined value. The
//! interactor wires these functions into combinators; tests call them
//! directly.
//!
//! # Rule summary
//!
//! | Category | Winner, in order |
//! |----------|------------------|
//! | Network / carrier name | operator short name over a placeholder name; repository name |
//! | Roaming | `false` in carrier network change; GSM flag if GSM; CDMA flag |
//! | Level | RSRP if policy on and LTE camped; primary if GSM; CDMA if "always CDMA"; primary |
//! | Shown level | 0 out of service; level clamped to `[0, levels]`, plus 1 when inflating |
//! | Exclamation | hidden if "hide no-internet"; data off, failed connection, out of service |
//! | Icon group | carrier-merged group; 5G service group; mapping lookup; default group |
//! | Cross-SIM icon | companion if non-DDS, policy on, C-IWLAN up, IMS over IWLAN/cross-SIM |
//! | Final icon | satellite if non-terrestrial; companion cellular icon; own cellular icon |

use cellbar_core::{
    DataConnectionState, ImsRegistrationTech, IconMapping, MobileIconCustomization,
    MobileIconGroup, NetworkNameModel, NetworkType, NetworkTypeIconModel, ResolvedNetworkType,
    SatelliteIcon, SignalIconModel, icon_groups,
};

use crate::carrier_overrides::CarrierIdOverrides;

/// Network name: the operator short name replaces a placeholder name.
#[must_use]
pub fn resolve_network_name(
    operator_alpha_short: Option<&str>,
    network_name: &NetworkNameModel,
) -> NetworkNameModel {
    match operator_alpha_short {
        Some(short) if network_name.is_default() => {
            NetworkNameModel::IntentDerived(short.to_string())
        }
        _ => network_name.clone(),
    }
}

/// Carrier name text, with the same placeholder rule as the network name.
#[must_use]
pub fn resolve_carrier_name(
    operator_alpha_short: Option<&str>,
    carrier_name: &NetworkNameModel,
) -> String {
    match operator_alpha_short {
        Some(short) if carrier_name.is_default() => short.to_string(),
        _ => carrier_name.name().to_string(),
    }
}

#[must_use]
pub const fn resolve_roaming(
    carrier_network_change_active: bool,
    is_gsm: bool,
    gsm_roaming: bool,
    cdma_roaming: bool,
) -> bool {
    if carrier_network_change_active {
        false
    } else if is_gsm {
        gsm_roaming
    } else {
        cdma_roaming
    }
}

/// Raw level inputs competing for the displayed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelInputs {
    pub is_gsm: bool,
    pub primary_level: i32,
    pub cdma_level: i32,
    pub always_use_cdma_level: bool,
}

/// Pick the level source.
///
/// `signal_strength` supplies the RSRP policy, the RSRP level, and the voice
/// and data network types used for the LTE-camped test.
#[must_use]
pub const fn resolve_level(inputs: &LevelInputs, signal_strength: &MobileIconCustomization) -> i32 {
    if signal_strength.always_use_rsrp_level_for_lte && signal_strength.is_lte_camped() {
        signal_strength.lte_rsrp_level
    } else if inputs.is_gsm {
        // GSM never uses the CDMA level.
        inputs.primary_level
    } else if inputs.always_use_cdma_level {
        inputs.cdma_level
    } else {
        inputs.primary_level
    }
}

/// Level actually drawn.
///
/// Out of service always shows 0. In service the level is clamped into
/// `[0, number_of_levels]` and bumped by one when `inflate` is set.
#[must_use]
pub fn resolve_shown_level(
    level: i32,
    number_of_levels: i32,
    is_in_service: bool,
    inflate: bool,
) -> i32 {
    if !is_in_service {
        return 0;
    }
    let clamped = level.min(number_of_levels).max(0);
    if inflate { clamped + 1 } else { clamped }
}

/// Inputs of the exclamation (no-internet) badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExclamationInputs {
    pub data_enabled: bool,
    pub data_connected: bool,
    pub connection_failed: bool,
    pub in_service: bool,
    pub hide_no_internet: bool,
}

#[must_use]
pub const fn resolve_show_exclamation(inputs: &ExclamationInputs) -> bool {
    !inputs.hide_no_internet
        && (!inputs.data_enabled
            || (inputs.data_connected && inputs.connection_failed)
            || !inputs.in_service)
}

#[must_use]
pub fn is_data_connected(state: &DataConnectionState) -> bool {
    *state == DataConnectionState::Connected
}

/// Icon mapping key for a resolved network type.
///
/// NSA overrides key on the anchor technology: the origin network type when
/// known, else the voice network type. An unknown resolved type also keys on
/// the voice network type.
#[must_use]
pub fn lookup_key(
    resolved: &ResolvedNetworkType,
    customization: &MobileIconCustomization,
) -> String {
    match resolved {
        ResolvedNetworkType::Override(override_type) if override_type.is_nsa() => {
            if customization.origin_network_type == NetworkType::Unknown {
                customization.voice_network_type.icon_key()
            } else {
                customization.origin_network_type.icon_key()
            }
        }
        ResolvedNetworkType::Unknown => customization.voice_network_type.icon_key(),
        ResolvedNetworkType::Default(_)
        | ResolvedNetworkType::Override(_)
        | ResolvedNetworkType::CarrierMerged => resolved.lookup_key(),
    }
}

/// Icon group before carrier-id overrides.
#[must_use]
pub fn resolve_icon_group(
    resolved: &ResolvedNetworkType,
    customization: &MobileIconCustomization,
    mapping: &IconMapping,
    default_group: &MobileIconGroup,
) -> MobileIconGroup {
    if *resolved == ResolvedNetworkType::CarrierMerged {
        return icon_groups::carrier_merged_wifi();
    }
    if let Some(group) = customization.five_g_service_state.icon_group() {
        return group;
    }
    mapping
        .get(&lookup_key(resolved, customization))
        .cloned()
        .unwrap_or_else(|| default_group.clone())
}

/// Apply a carrier-id override to the resolved group.
///
/// Only a positive asset id counts as an override, whatever the lookup
/// returns.
#[must_use]
pub fn resolve_network_type_icon(
    group: &MobileIconGroup,
    override_exists: bool,
    carrier_id: i32,
    overrides: &dyn CarrierIdOverrides,
) -> NetworkTypeIconModel {
    if !override_exists {
        return NetworkTypeIconModel::Default(group.clone());
    }
    match overrides.lookup(carrier_id, &group.name) {
        Some(asset) if asset > 0 => NetworkTypeIconModel::Overridden(group.clone(), asset),
        Some(_) | None => NetworkTypeIconModel::Default(group.clone()),
    }
}

/// Inputs of the cross-SIM icon substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossSimInputs {
    pub is_default_data_sub: bool,
    pub ims_registration_tech: ImsRegistrationTech,
    pub cross_sim_display_enabled: bool,
    pub ciwlan_available: bool,
}

/// Companion icon to show instead of this connection's own, if any.
#[must_use]
pub fn resolve_customized_icon(
    inputs: &CrossSimInputs,
    dds_icon: Option<SignalIconModel>,
) -> Option<SignalIconModel> {
    let substitute = !inputs.is_default_data_sub
        && inputs.cross_sim_display_enabled
        && inputs.ciwlan_available
        && inputs.ims_registration_tech.is_cross_sim_or_iwlan();
    if substitute { dds_icon } else { None }
}

#[must_use]
pub fn resolve_vowifi_available(
    voice_capable: bool,
    ims_registration_tech: ImsRegistrationTech,
    show_vowifi_icon: bool,
) -> bool {
    voice_capable && ims_registration_tech == ImsRegistrationTech::Iwlan && show_vowifi_icon
}

/// Cellular icon after cross-SIM substitution. Only a cellular companion
/// icon can replace the connection's own.
#[must_use]
pub fn select_cellular_icon(
    own: SignalIconModel,
    customized: Option<SignalIconModel>,
) -> SignalIconModel {
    match customized {
        Some(icon @ SignalIconModel::Cellular { .. }) => icon,
        Some(SignalIconModel::Satellite { .. }) | None => own,
    }
}

/// Satellite glyph for a shown level, falling back to the level-0 glyph.
#[must_use]
pub fn satellite_icon(shown_level: i32) -> SignalIconModel {
    SignalIconModel::Satellite {
        level: shown_level,
        icon: SatelliteIcon::from_signal_strength(shown_level).unwrap_or(SatelliteIcon::Level0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier_overrides::CarrierIdIconOverrides;
    use cellbar_core::{FiveGServiceState, NrIconType, OverrideNetworkType, default_icon_mapping};
    use proptest::prelude::*;

    fn cellular(level: i32) -> SignalIconModel {
        SignalIconModel::Cellular {
            level,
            number_of_levels: 4,
            show_exclamation_mark: false,
            carrier_network_change: false,
        }
    }

    #[test]
    fn network_name_placeholder_is_overridden() {
        let placeholder = NetworkNameModel::Default("Default".into());
        let derived = NetworkNameModel::SubscriptionDerived("Sub".into());
        assert_eq!(
            resolve_network_name(Some("Op"), &placeholder),
            NetworkNameModel::IntentDerived("Op".into())
        );
        assert_eq!(resolve_network_name(None, &placeholder), placeholder);
        assert_eq!(resolve_network_name(Some("Op"), &derived), derived);
        assert_eq!(resolve_carrier_name(Some("Op"), &placeholder), "Op");
        assert_eq!(resolve_carrier_name(Some("Op"), &derived), "Sub");
    }

    #[test]
    fn roaming_precedence() {
        assert!(!resolve_roaming(true, true, true, true));
        assert!(resolve_roaming(false, true, true, false));
        assert!(!resolve_roaming(false, true, false, true));
        assert!(resolve_roaming(false, false, false, true));
    }

    #[test]
    fn gsm_uses_primary_even_with_always_cdma() {
        let inputs = LevelInputs {
            is_gsm: true,
            primary_level: 3,
            cdma_level: 1,
            always_use_cdma_level: true,
        };
        assert_eq!(resolve_level(&inputs, &MobileIconCustomization::default()), 3);
    }

    #[test]
    fn non_gsm_always_cdma_uses_cdma() {
        let inputs = LevelInputs {
            is_gsm: false,
            primary_level: 4,
            cdma_level: 2,
            always_use_cdma_level: true,
        };
        assert_eq!(resolve_level(&inputs, &MobileIconCustomization::default()), 2);
    }

    #[test]
    fn rsrp_applies_only_when_lte_camped() {
        let inputs = LevelInputs {
            is_gsm: true,
            primary_level: 1,
            cdma_level: 0,
            always_use_cdma_level: false,
        };
        let mut strength = MobileIconCustomization {
            always_use_rsrp_level_for_lte: true,
            lte_rsrp_level: 4,
            data_network_type: NetworkType::LteCa,
            ..Default::default()
        };
        assert_eq!(resolve_level(&inputs, &strength), 4);

        strength.data_network_type = NetworkType::Umts;
        assert_eq!(resolve_level(&inputs, &strength), 1);
    }

    #[test]
    fn shown_level_scenarios() {
        assert_eq!(resolve_shown_level(3, 4, false, true), 0);
        assert_eq!(resolve_shown_level(2, 4, true, true), 3);
        assert_eq!(resolve_shown_level(2, 4, true, false), 2);
        assert_eq!(resolve_shown_level(9, 4, true, false), 4);
        assert_eq!(resolve_shown_level(-2, 4, true, false), 0);
    }

    #[test]
    fn exclamation_rules() {
        let healthy = ExclamationInputs {
            data_enabled: true,
            data_connected: true,
            connection_failed: false,
            in_service: true,
            hide_no_internet: false,
        };
        assert!(!resolve_show_exclamation(&healthy));
        assert!(resolve_show_exclamation(&ExclamationInputs {
            data_enabled: false,
            ..healthy
        }));
        assert!(resolve_show_exclamation(&ExclamationInputs {
            connection_failed: true,
            ..healthy
        }));
        assert!(!resolve_show_exclamation(&ExclamationInputs {
            connection_failed: true,
            data_connected: false,
            ..healthy
        }));
        assert!(resolve_show_exclamation(&ExclamationInputs {
            in_service: false,
            ..healthy
        }));
        assert!(!resolve_show_exclamation(&ExclamationInputs {
            in_service: false,
            hide_no_internet: true,
            ..healthy
        }));
    }

    #[test]
    fn nsa_key_prefers_origin_then_voice() {
        let nsa = ResolvedNetworkType::Override(OverrideNetworkType::NrNsa);
        let mut customization = MobileIconCustomization {
            voice_network_type: NetworkType::Lte,
            ..Default::default()
        };
        assert_eq!(lookup_key(&nsa, &customization), "13");
        customization.origin_network_type = NetworkType::Nr;
        assert_eq!(lookup_key(&nsa, &customization), "20");

        let ca = ResolvedNetworkType::Override(OverrideNetworkType::LteCa);
        assert_eq!(lookup_key(&ca, &customization), "13_CA");
        assert_eq!(lookup_key(&ResolvedNetworkType::Unknown, &customization), "13");
    }

    #[test]
    fn icon_group_precedence() {
        let mapping = default_icon_mapping();
        let fallback = icon_groups::g();
        let mut customization = MobileIconCustomization::default();

        let lte = ResolvedNetworkType::Default(NetworkType::Lte);
        assert_eq!(
            resolve_icon_group(&lte, &customization, &mapping, &fallback),
            icon_groups::lte()
        );

        let unmapped = ResolvedNetworkType::Override(OverrideNetworkType::None);
        assert_eq!(resolve_icon_group(&unmapped, &customization, &mapping, &fallback), fallback);

        customization.five_g_service_state = FiveGServiceState::new(NrIconType::FiveGUwb);
        assert_eq!(
            resolve_icon_group(&lte, &customization, &mapping, &fallback),
            icon_groups::five_g_plus()
        );
        assert_eq!(
            resolve_icon_group(
                &ResolvedNetworkType::CarrierMerged,
                &customization,
                &mapping,
                &fallback
            ),
            icon_groups::carrier_merged_wifi()
        );
    }

    #[test]
    fn carrier_override_needs_entry_and_positive_asset() {
        let table = CarrierIdIconOverrides::new()
            .with_override(7, "LTE", 55)
            .with_override(7, "3G", 0);
        let lte = icon_groups::lte();
        assert_eq!(
            resolve_network_type_icon(&lte, true, 7, &table),
            NetworkTypeIconModel::Overridden(lte.clone(), 55)
        );
        assert_eq!(
            resolve_network_type_icon(&lte, false, 7, &table),
            NetworkTypeIconModel::Default(lte.clone())
        );
        let three_g = icon_groups::three_g();
        assert_eq!(
            resolve_network_type_icon(&three_g, true, 7, &table),
            NetworkTypeIconModel::Default(three_g)
        );
    }

    /// Lookup returning a fixed asset for every key, unfiltered.
    struct FixedAsset(i32);

    impl CarrierIdOverrides for FixedAsset {
        fn entry_exists(&self, _carrier_id: i32) -> bool {
            true
        }

        fn lookup(&self, _carrier_id: i32, _icon_key: &str) -> Option<i32> {
            Some(self.0)
        }
    }

    #[test]
    fn non_positive_asset_from_any_lookup_is_no_override() {
        let lte = icon_groups::lte();
        for asset in [0, -1, i32::MIN] {
            assert_eq!(
                resolve_network_type_icon(&lte, true, 1, &FixedAsset(asset)),
                NetworkTypeIconModel::Default(lte.clone()),
                "asset {asset}"
            );
        }
        assert_eq!(
            resolve_network_type_icon(&lte, true, 1, &FixedAsset(3)),
            NetworkTypeIconModel::Overridden(lte.clone(), 3)
        );
    }

    #[test]
    fn cross_sim_substitution_needs_every_condition() {
        let all = CrossSimInputs {
            is_default_data_sub: false,
            ims_registration_tech: ImsRegistrationTech::CrossSim,
            cross_sim_display_enabled: true,
            ciwlan_available: true,
        };
        let dds = Some(cellular(4));
        assert_eq!(resolve_customized_icon(&all, dds), dds);
        assert_eq!(
            resolve_customized_icon(
                &CrossSimInputs {
                    ims_registration_tech: ImsRegistrationTech::Iwlan,
                    ..all
                },
                dds
            ),
            dds
        );
        for broken in [
            CrossSimInputs { is_default_data_sub: true, ..all },
            CrossSimInputs { cross_sim_display_enabled: false, ..all },
            CrossSimInputs { ciwlan_available: false, ..all },
            CrossSimInputs { ims_registration_tech: ImsRegistrationTech::Lte, ..all },
        ] {
            assert_eq!(resolve_customized_icon(&broken, dds), None);
        }
    }

    #[test]
    fn vowifi_requires_all_three() {
        assert!(resolve_vowifi_available(true, ImsRegistrationTech::Iwlan, true));
        assert!(!resolve_vowifi_available(false, ImsRegistrationTech::Iwlan, true));
        assert!(!resolve_vowifi_available(true, ImsRegistrationTech::CrossSim, true));
        assert!(!resolve_vowifi_available(true, ImsRegistrationTech::Iwlan, false));
    }

    #[test]
    fn only_cellular_companion_replaces_own_icon() {
        let own = cellular(1);
        assert_eq!(select_cellular_icon(own, Some(cellular(3))), cellular(3));
        assert_eq!(select_cellular_icon(own, Some(satellite_icon(2))), own);
        assert_eq!(select_cellular_icon(own, None), own);
    }

    #[test]
    fn satellite_glyph_falls_back_to_level_zero() {
        assert_eq!(
            satellite_icon(7),
            SignalIconModel::Satellite {
                level: 7,
                icon: SatelliteIcon::Level0
            }
        );
    }

    proptest! {
        #[test]
        fn shown_level_stays_in_range(
            level in -10i32..20,
            levels in 0i32..8,
            in_service in any::<bool>(),
            inflate in any::<bool>(),
        ) {
            let shown = resolve_shown_level(level, levels, in_service, inflate);
            prop_assert!(shown >= 0);
            prop_assert!(shown <= levels + i32::from(inflate));
        }

        #[test]
        fn gsm_never_selects_cdma(
            primary in 0i32..5,
            cdma in 5i32..10,
            always_cdma in any::<bool>(),
        ) {
            let inputs = LevelInputs {
                is_gsm: true,
                primary_level: primary,
                cdma_level: cdma,
                always_use_cdma_level: always_cdma,
            };
            prop_assert_eq!(resolve_level(&inputs, &MobileIconCustomization::default()), primary);
        }
    }
}
