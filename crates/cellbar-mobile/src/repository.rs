#![forbid(unsafe_code)]

//! Input bundles consumed by the interactor.
//!
//! The telephony collaborator owns these signals; the interactor only
//! subscribes to them. All signals of one connection must share a single
//! [`Dispatcher`](cellbar_runtime::Dispatcher) so updates to the connection
//! are delivered in one total order.

use cellbar_core::{
    DataActivityModel, DataConnectionState, IconMapping, ImsRegistrationTech,
    MobileIconCustomization, MobileIconGroup, NetworkNameModel, NetworkType, NrIconType,
    ResolvedNetworkType, SignalIconModel,
};
use cellbar_runtime::Signal;

/// Read-only per-connection inputs.
#[derive(Clone)]
pub struct MobileConnectionRepository {
    pub sub_id: i32,

    // Data
    pub data_activity_direction: Signal<DataActivityModel>,
    pub data_enabled: Signal<bool>,
    pub data_connection_state: Signal<DataConnectionState>,
    pub data_roaming_enabled: Signal<bool>,
    pub is_connection_failed: Signal<bool>,
    pub has_prioritized_network_capabilities: Signal<bool>,

    // Service
    pub is_in_service: Signal<bool>,
    pub is_emergency_only: Signal<bool>,
    pub is_gsm: Signal<bool>,
    pub is_roaming: Signal<bool>,
    pub cdma_roaming: Signal<bool>,
    pub carrier_network_change_active: Signal<bool>,
    pub is_allowed_during_airplane_mode: Signal<bool>,
    pub is_non_terrestrial: Signal<bool>,

    // Identity and names
    pub carrier_id: Signal<i32>,
    pub operator_alpha_short: Signal<Option<String>>,
    pub network_name: Signal<NetworkNameModel>,
    pub carrier_name: Signal<NetworkNameModel>,

    // Radio
    pub resolved_network_type: Signal<ResolvedNetworkType>,
    pub voice_network_type: Signal<NetworkType>,
    pub data_network_type: Signal<NetworkType>,
    pub origin_network_type: Signal<NetworkType>,
    pub nr_icon_type: Signal<NrIconType>,

    // Levels
    pub primary_level: Signal<i32>,
    pub cdma_level: Signal<i32>,
    pub lte_rsrp_level: Signal<i32>,
    pub number_of_levels: Signal<i32>,
    pub inflate_signal_strength: Signal<bool>,

    // IMS
    pub voice_capable: Signal<bool>,
    pub video_capable: Signal<bool>,
    pub ims_registered: Signal<bool>,
    pub ims_registration_tech: Signal<ImsRegistrationTech>,
    pub ciwlan_available: Signal<bool>,
}

/// Inputs shared by every connection on the device.
#[derive(Clone)]
pub struct MobileIconPolicies {
    pub default_subscription_has_data_enabled: Signal<bool>,
    pub always_show_data_rat_icon: Signal<bool>,
    pub always_use_cdma_level: Signal<bool>,
    pub is_single_carrier: Signal<bool>,
    pub mobile_is_default: Signal<bool>,
    pub default_mobile_icon_mapping: Signal<IconMapping>,
    pub default_mobile_icon_group: Signal<MobileIconGroup>,
    pub is_default_connection_failed: Signal<bool>,
    pub is_force_hidden: Signal<bool>,
    pub always_use_rsrp_level_for_lte: Signal<bool>,
    pub hide_no_internet_state: Signal<bool>,
    /// RAT icon policy; only the RAT customization fields are read.
    pub network_type_icon_customization: Signal<MobileIconCustomization>,
    pub show_volte_icon: Signal<bool>,
    pub show_vowifi_icon: Signal<bool>,
    pub default_data_sub_id: Signal<i32>,
    /// Signal icon of the default data subscription.
    pub dds_icon: Signal<Option<SignalIconModel>>,
    pub cross_sim_display_signal_level: Signal<bool>,
}
