#![forbid(unsafe_code)]

//! Writable stand-ins for the telephony collaborator.
//!
//! [`ConnectionInputs`] and [`PolicyInputs`] hold one [`MutableSignal`] per
//! input, all on the dispatcher passed at construction. Tests drive the
//! graph by calling `set` on the fields and hand the read-only views to the
//! interactor through [`ConnectionInputs::repository`] and
//! [`PolicyInputs::policies`].
//!
//! Defaults describe a healthy in-service GSM connection on LTE with data
//! connected, four bars out of five, and satellite off.

use cellbar_core::{
    DataActivityModel, DataConnectionState, IconMapping, ImsRegistrationTech,
    MobileIconCustomization, MobileIconGroup, NetworkNameModel, NetworkType, NrIconType,
    ResolvedNetworkType, SignalIconModel, default_icon_mapping, icon_groups,
};
use cellbar_mobile::{MobileConnectionRepository, MobileIconPolicies};
use cellbar_runtime::{Dispatcher, MutableSignal};

/// Per-connection inputs.
#[derive(Debug, Clone)]
pub struct ConnectionInputs {
    pub sub_id: i32,

    pub data_activity_direction: MutableSignal<DataActivityModel>,
    pub data_enabled: MutableSignal<bool>,
    pub data_connection_state: MutableSignal<DataConnectionState>,
    pub data_roaming_enabled: MutableSignal<bool>,
    pub is_connection_failed: MutableSignal<bool>,
    pub has_prioritized_network_capabilities: MutableSignal<bool>,

    pub is_in_service: MutableSignal<bool>,
    pub is_emergency_only: MutableSignal<bool>,
    pub is_gsm: MutableSignal<bool>,
    pub is_roaming: MutableSignal<bool>,
    pub cdma_roaming: MutableSignal<bool>,
    pub carrier_network_change_active: MutableSignal<bool>,
    pub is_allowed_during_airplane_mode: MutableSignal<bool>,
    pub is_non_terrestrial: MutableSignal<bool>,

    pub carrier_id: MutableSignal<i32>,
    pub operator_alpha_short: MutableSignal<Option<String>>,
    pub network_name: MutableSignal<NetworkNameModel>,
    pub carrier_name: MutableSignal<NetworkNameModel>,

    pub resolved_network_type: MutableSignal<ResolvedNetworkType>,
    pub voice_network_type: MutableSignal<NetworkType>,
    pub data_network_type: MutableSignal<NetworkType>,
    pub origin_network_type: MutableSignal<NetworkType>,
    pub nr_icon_type: MutableSignal<NrIconType>,

    pub primary_level: MutableSignal<i32>,
    pub cdma_level: MutableSignal<i32>,
    pub lte_rsrp_level: MutableSignal<i32>,
    pub number_of_levels: MutableSignal<i32>,
    pub inflate_signal_strength: MutableSignal<bool>,

    pub voice_capable: MutableSignal<bool>,
    pub video_capable: MutableSignal<bool>,
    pub ims_registered: MutableSignal<bool>,
    pub ims_registration_tech: MutableSignal<ImsRegistrationTech>,
    pub ciwlan_available: MutableSignal<bool>,
}

impl ConnectionInputs {
    #[must_use]
    pub fn new(dispatcher: &Dispatcher, sub_id: i32) -> Self {
        let d = dispatcher;
        Self {
            sub_id,
            data_activity_direction: MutableSignal::new_in(d, DataActivityModel::default()),
            data_enabled: MutableSignal::new_in(d, true),
            data_connection_state: MutableSignal::new_in(d, DataConnectionState::Connected),
            data_roaming_enabled: MutableSignal::new_in(d, false),
            is_connection_failed: MutableSignal::new_in(d, false),
            has_prioritized_network_capabilities: MutableSignal::new_in(d, false),
            is_in_service: MutableSignal::new_in(d, true),
            is_emergency_only: MutableSignal::new_in(d, false),
            is_gsm: MutableSignal::new_in(d, true),
            is_roaming: MutableSignal::new_in(d, false),
            cdma_roaming: MutableSignal::new_in(d, false),
            carrier_network_change_active: MutableSignal::new_in(d, false),
            is_allowed_during_airplane_mode: MutableSignal::new_in(d, false),
            is_non_terrestrial: MutableSignal::new_in(d, false),
            carrier_id: MutableSignal::new_in(d, 1),
            operator_alpha_short: MutableSignal::new_in(d, None),
            network_name: MutableSignal::new_in(
                d,
                NetworkNameModel::SubscriptionDerived("Network".into()),
            ),
            carrier_name: MutableSignal::new_in(
                d,
                NetworkNameModel::SubscriptionDerived("Carrier".into()),
            ),
            resolved_network_type: MutableSignal::new_in(
                d,
                ResolvedNetworkType::Default(NetworkType::Lte),
            ),
            voice_network_type: MutableSignal::new_in(d, NetworkType::Lte),
            data_network_type: MutableSignal::new_in(d, NetworkType::Lte),
            origin_network_type: MutableSignal::new_in(d, NetworkType::Unknown),
            nr_icon_type: MutableSignal::new_in(d, NrIconType::None),
            primary_level: MutableSignal::new_in(d, 4),
            cdma_level: MutableSignal::new_in(d, 2),
            lte_rsrp_level: MutableSignal::new_in(d, 3),
            number_of_levels: MutableSignal::new_in(d, 5),
            inflate_signal_strength: MutableSignal::new_in(d, false),
            voice_capable: MutableSignal::new_in(d, false),
            video_capable: MutableSignal::new_in(d, false),
            ims_registered: MutableSignal::new_in(d, false),
            ims_registration_tech: MutableSignal::new_in(d, ImsRegistrationTech::None),
            ciwlan_available: MutableSignal::new_in(d, false),
        }
    }

    /// Read-only view for the interactor.
    #[must_use]
    pub fn repository(&self) -> MobileConnectionRepository {
        MobileConnectionRepository {
            sub_id: self.sub_id,
            data_activity_direction: self.data_activity_direction.signal(),
            data_enabled: self.data_enabled.signal(),
            data_connection_state: self.data_connection_state.signal(),
            data_roaming_enabled: self.data_roaming_enabled.signal(),
            is_connection_failed: self.is_connection_failed.signal(),
            has_prioritized_network_capabilities: self
                .has_prioritized_network_capabilities
                .signal(),
            is_in_service: self.is_in_service.signal(),
            is_emergency_only: self.is_emergency_only.signal(),
            is_gsm: self.is_gsm.signal(),
            is_roaming: self.is_roaming.signal(),
            cdma_roaming: self.cdma_roaming.signal(),
            carrier_network_change_active: self.carrier_network_change_active.signal(),
            is_allowed_during_airplane_mode: self.is_allowed_during_airplane_mode.signal(),
            is_non_terrestrial: self.is_non_terrestrial.signal(),
            carrier_id: self.carrier_id.signal(),
            operator_alpha_short: self.operator_alpha_short.signal(),
            network_name: self.network_name.signal(),
            carrier_name: self.carrier_name.signal(),
            resolved_network_type: self.resolved_network_type.signal(),
            voice_network_type: self.voice_network_type.signal(),
            data_network_type: self.data_network_type.signal(),
            origin_network_type: self.origin_network_type.signal(),
            nr_icon_type: self.nr_icon_type.signal(),
            primary_level: self.primary_level.signal(),
            cdma_level: self.cdma_level.signal(),
            lte_rsrp_level: self.lte_rsrp_level.signal(),
            number_of_levels: self.number_of_levels.signal(),
            inflate_signal_strength: self.inflate_signal_strength.signal(),
            voice_capable: self.voice_capable.signal(),
            video_capable: self.video_capable.signal(),
            ims_registered: self.ims_registered.signal(),
            ims_registration_tech: self.ims_registration_tech.signal(),
            ciwlan_available: self.ciwlan_available.signal(),
        }
    }

    /// Subscribers currently attached to each root, by field name.
    #[must_use]
    pub fn subscriber_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("data_enabled", self.data_enabled.subscriber_count()),
            ("data_connection_state", self.data_connection_state.subscriber_count()),
            ("is_in_service", self.is_in_service.subscriber_count()),
            ("is_gsm", self.is_gsm.subscriber_count()),
            ("is_roaming", self.is_roaming.subscriber_count()),
            ("cdma_roaming", self.cdma_roaming.subscriber_count()),
            (
                "carrier_network_change_active",
                self.carrier_network_change_active.subscriber_count(),
            ),
            ("is_non_terrestrial", self.is_non_terrestrial.subscriber_count()),
            ("carrier_id", self.carrier_id.subscriber_count()),
            ("carrier_name", self.carrier_name.subscriber_count()),
            ("resolved_network_type", self.resolved_network_type.subscriber_count()),
            ("voice_network_type", self.voice_network_type.subscriber_count()),
            ("data_network_type", self.data_network_type.subscriber_count()),
            ("primary_level", self.primary_level.subscriber_count()),
            ("cdma_level", self.cdma_level.subscriber_count()),
            ("lte_rsrp_level", self.lte_rsrp_level.subscriber_count()),
            ("number_of_levels", self.number_of_levels.subscriber_count()),
            ("inflate_signal_strength", self.inflate_signal_strength.subscriber_count()),
            ("ims_registration_tech", self.ims_registration_tech.subscriber_count()),
        ]
    }

    /// True when no root has a subscriber.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.subscriber_counts().iter().all(|(_, count)| *count == 0)
    }
}

/// Device-wide policy inputs.
#[derive(Debug, Clone)]
pub struct PolicyInputs {
    pub default_subscription_has_data_enabled: MutableSignal<bool>,
    pub always_show_data_rat_icon: MutableSignal<bool>,
    pub always_use_cdma_level: MutableSignal<bool>,
    pub is_single_carrier: MutableSignal<bool>,
    pub mobile_is_default: MutableSignal<bool>,
    pub default_mobile_icon_mapping: MutableSignal<IconMapping>,
    pub default_mobile_icon_group: MutableSignal<MobileIconGroup>,
    pub is_default_connection_failed: MutableSignal<bool>,
    pub is_force_hidden: MutableSignal<bool>,
    pub always_use_rsrp_level_for_lte: MutableSignal<bool>,
    pub hide_no_internet_state: MutableSignal<bool>,
    pub network_type_icon_customization: MutableSignal<MobileIconCustomization>,
    pub show_volte_icon: MutableSignal<bool>,
    pub show_vowifi_icon: MutableSignal<bool>,
    pub default_data_sub_id: MutableSignal<i32>,
    pub dds_icon: MutableSignal<Option<SignalIconModel>>,
    pub cross_sim_display_signal_level: MutableSignal<bool>,
}

impl PolicyInputs {
    /// Policies with the default icon mapping and `default_data_sub_id`.
    #[must_use]
    pub fn new(dispatcher: &Dispatcher, default_data_sub_id: i32) -> Self {
        let d = dispatcher;
        Self {
            default_subscription_has_data_enabled: MutableSignal::new_in(d, true),
            always_show_data_rat_icon: MutableSignal::new_in(d, false),
            always_use_cdma_level: MutableSignal::new_in(d, false),
            is_single_carrier: MutableSignal::new_in(d, true),
            mobile_is_default: MutableSignal::new_in(d, true),
            default_mobile_icon_mapping: MutableSignal::new_in(d, default_icon_mapping()),
            default_mobile_icon_group: MutableSignal::new_in(d, icon_groups::three_g()),
            is_default_connection_failed: MutableSignal::new_in(d, false),
            is_force_hidden: MutableSignal::new_in(d, false),
            always_use_rsrp_level_for_lte: MutableSignal::new_in(d, false),
            hide_no_internet_state: MutableSignal::new_in(d, false),
            network_type_icon_customization: MutableSignal::new_in(
                d,
                MobileIconCustomization::default(),
            ),
            show_volte_icon: MutableSignal::new_in(d, false),
            show_vowifi_icon: MutableSignal::new_in(d, false),
            default_data_sub_id: MutableSignal::new_in(d, default_data_sub_id),
            dds_icon: MutableSignal::new_in(d, None),
            cross_sim_display_signal_level: MutableSignal::new_in(d, false),
        }
    }

    /// Read-only view for the interactor.
    #[must_use]
    pub fn policies(&self) -> MobileIconPolicies {
        MobileIconPolicies {
            default_subscription_has_data_enabled: self
                .default_subscription_has_data_enabled
                .signal(),
            always_show_data_rat_icon: self.always_show_data_rat_icon.signal(),
            always_use_cdma_level: self.always_use_cdma_level.signal(),
            is_single_carrier: self.is_single_carrier.signal(),
            mobile_is_default: self.mobile_is_default.signal(),
            default_mobile_icon_mapping: self.default_mobile_icon_mapping.signal(),
            default_mobile_icon_group: self.default_mobile_icon_group.signal(),
            is_default_connection_failed: self.is_default_connection_failed.signal(),
            is_force_hidden: self.is_force_hidden.signal(),
            always_use_rsrp_level_for_lte: self.always_use_rsrp_level_for_lte.signal(),
            hide_no_internet_state: self.hide_no_internet_state.signal(),
            network_type_icon_customization: self.network_type_icon_customization.signal(),
            show_volte_icon: self.show_volte_icon.signal(),
            show_vowifi_icon: self.show_vowifi_icon.signal(),
            default_data_sub_id: self.default_data_sub_id.signal(),
            dds_icon: self.dds_icon.signal(),
            cross_sim_display_signal_level: self.cross_sim_display_signal_level.signal(),
        }
    }
}
