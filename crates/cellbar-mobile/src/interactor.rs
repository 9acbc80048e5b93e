#![forbid(unsafe_code)]

//! Derivation graph for a single mobile connection.
//!
//! # Design
//!
//! [`MobileIconInteractor::new`] wires repository and policy signals through
//! the combinators into the outputs the UI consumes. Construction only builds
//! the graph; nothing is subscribed upstream until an output is subscribed.
//! Every intermediate that several outputs depend on is wrapped in
//! [`Signal::share`] so it is computed once while anything observes it and
//! released as soon as nothing does.
//!
//! ```text
//!   is_gsm, primary, cdma, always_cdma, strength ──▶ level ─┐
//!                       is_in_service, inflate, levels ─────┴▶ shown_level
//!   shown_level, levels, exclamation, cnc ──▶ cellular ─┐
//!                                      customized_icon ─┴▶ customized cellular ─┐
//!   shown_level ──▶ satellite ──────────────────────────────────────────────────┤
//!   is_non_terrestrial ──switch_latest ─────────────────────────────────────────┴▶ icon
//! ```
//!
//! Satellite selection is evaluated before cross-SIM substitution: while the
//! connection is non-terrestrial the cellular pipeline is not subscribed.
//!
//! # Diff log columns
//!
//! | Column | Output |
//! |--------|--------|
//! | `isDefaultDataSub` | this subscription is the default data subscription |
//! | `networkTypeIcon` | [`MobileIconInteractor::network_type_icon_group`] |
//! | `icon` | [`MobileIconInteractor::signal_level_icon`] |

use std::sync::Arc;

use cellbar_core::{
    DataActivityModel, FiveGServiceState, MobileIconCustomization, NetworkNameModel,
    NetworkTypeIconModel, SignalIconModel,
};
use cellbar_runtime::{Signal, TableLogBuffer, combine, combine3, combine4, combine5};

use crate::carrier_name::{CarrierNameCustomizer, NetworkTypeContext};
use crate::carrier_overrides::CarrierIdOverrides;
use crate::config::MobileIconConfig;
use crate::precedence::{
    self, CrossSimInputs, ExclamationInputs, LevelInputs, resolve_customized_icon,
    resolve_icon_group, resolve_level, resolve_network_type_icon, resolve_roaming,
    resolve_shown_level, resolve_show_exclamation, resolve_vowifi_available, select_cellular_icon,
};
use crate::repository::{MobileConnectionRepository, MobileIconPolicies};

/// Outputs of one connection's derivation graph.
///
/// Every accessor returns a read-only [`Signal`] that replays its current
/// value on subscribe.
pub struct MobileIconInteractor {
    sub_id: i32,
    table_log: TableLogBuffer,

    // Pass-through
    activity: Signal<DataActivityModel>,
    mobile_is_default: Signal<bool>,
    is_data_enabled: Signal<bool>,
    is_connection_failed: Signal<bool>,
    is_in_service: Signal<bool>,
    is_emergency_only: Signal<bool>,
    always_show_data_rat_icon: Signal<bool>,
    show_slice_attribution: Signal<bool>,
    is_single_carrier: Signal<bool>,
    is_force_hidden: Signal<bool>,
    always_use_rsrp_level_for_lte: Signal<bool>,
    is_allowed_during_airplane_mode: Signal<bool>,
    carrier_network_change_active: Signal<bool>,
    hide_no_internet_state: Signal<bool>,
    show_volte_icon: Signal<bool>,
    show_vowifi_icon: Signal<bool>,
    default_subscription_has_data_enabled: Signal<bool>,
    is_default_connection_failed: Signal<bool>,

    // Derived
    is_data_connected: Signal<bool>,
    is_non_terrestrial: Signal<bool>,
    network_name: Signal<NetworkNameModel>,
    carrier_name: Signal<String>,
    customized_carrier_name: Signal<String>,
    customized_network_name: Signal<NetworkNameModel>,
    is_roaming: Signal<bool>,
    is_default_data_sub: Signal<bool>,
    network_type_icon_customization: Signal<MobileIconCustomization>,
    ims_info: Signal<MobileIconCustomization>,
    customized_icon: Signal<Option<SignalIconModel>>,
    vowifi_available: Signal<bool>,
    network_type_icon_group: Signal<NetworkTypeIconModel>,
    level: Signal<i32>,
    shown_level: Signal<i32>,
    show_exclamation_mark: Signal<bool>,
    signal_level_icon: Signal<SignalIconModel>,
}

impl std::fmt::Debug for MobileIconInteractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileIconInteractor")
            .field("sub_id", &self.sub_id)
            .field("table_log", &self.table_log)
            .finish_non_exhaustive()
    }
}

impl MobileIconInteractor {
    /// Build the graph for `repository`.
    #[must_use]
    pub fn new(
        repository: &MobileConnectionRepository,
        policies: &MobileIconPolicies,
        carrier_name_customizer: Arc<dyn CarrierNameCustomizer>,
        carrier_id_overrides: Arc<dyn CarrierIdOverrides>,
        config: &MobileIconConfig,
    ) -> Self {
        let repo = repository;
        let sub_id = repo.sub_id;
        let table_log =
            TableLogBuffer::new(format!("MobileIconInteractor[{sub_id}]"), &config.table_log);
        let dispatcher = repo.data_enabled.dispatcher().clone();

        tracing::debug!(
            target: "cellbar::interactor",
            sub_id,
            satellite = config.carrier_enabled_satellite,
            "building mobile icon graph"
        );

        // True if there is any override for this carrier. Whether a given
        // icon group is overridden is checked per group below.
        let carrier_id_override_exists = {
            let overrides = Arc::clone(&carrier_id_overrides);
            repo.carrier_id
                .map(move |carrier_id| overrides.entry_exists(*carrier_id))
                .distinct_until_changed()
                .share(false)
        };

        let network_name = combine(
            &repo.operator_alpha_short,
            &repo.network_name,
            |short, name| precedence::resolve_network_name(short.as_deref(), name),
        )
        .share(repo.network_name.value().unwrap_or_default());

        let carrier_name = combine(
            &repo.operator_alpha_short,
            &repo.carrier_name,
            |short, name| precedence::resolve_carrier_name(short.as_deref(), name),
        )
        .share(initial_name(&repo.carrier_name));

        let signal_strength_customization = combine4(
            &policies.always_use_rsrp_level_for_lte,
            &repo.lte_rsrp_level,
            &repo.voice_network_type,
            &repo.data_network_type,
            |always_rsrp, rsrp_level, voice, data| MobileIconCustomization {
                always_use_rsrp_level_for_lte: *always_rsrp,
                lte_rsrp_level: *rsrp_level,
                voice_network_type: *voice,
                data_network_type: *data,
                ..MobileIconCustomization::default()
            },
        )
        .share(MobileIconCustomization::default());

        let customized_carrier_name = {
            let customizer = Arc::clone(&carrier_name_customizer);
            combine5(
                &carrier_name,
                &repo.nr_icon_type,
                &repo.data_network_type,
                &repo.voice_network_type,
                &repo.is_in_service,
                move |name, nr_icon_type, data, voice, in_service| {
                    let context = NetworkTypeContext {
                        nr_icon_type: *nr_icon_type,
                        data_network_type: *data,
                        voice_network_type: *voice,
                        is_in_service: *in_service,
                    };
                    customizer.customize(sub_id, name, Some(&context))
                },
            )
            .share(initial_name(&repo.carrier_name))
        };

        let customized_network_name = {
            let customizer = Arc::clone(&carrier_name_customizer);
            network_name
                .map(move |name| {
                    NetworkNameModel::IntentDerived(customizer.customize(sub_id, name.name(), None))
                })
                .share(repo.network_name.value().unwrap_or_default())
        };

        let is_roaming = combine4(
            &repo.carrier_network_change_active,
            &repo.is_gsm,
            &repo.is_roaming,
            &repo.cdma_roaming,
            |change_active, is_gsm, gsm_roaming, cdma_roaming| {
                resolve_roaming(*change_active, *is_gsm, *gsm_roaming, *cdma_roaming)
            },
        )
        .share(false);

        let is_default_data_sub = {
            let initial = policies.default_data_sub_id.value() == Some(sub_id);
            policies
                .default_data_sub_id
                .map(move |default_id| *default_id == sub_id)
                .distinct_until_changed()
                .log_diffs(&table_log, "isDefaultDataSub", initial)
                .share(initial)
        };

        let network_type_icon_customization = combine5(
            &policies.network_type_icon_customization,
            &repo.data_enabled,
            &repo.data_roaming_enabled,
            &is_roaming,
            &is_default_data_sub,
            |mode, data_enabled, data_roaming_enabled, is_roaming, is_dds| MobileIconCustomization {
                is_rat_customization: mode.is_rat_customization,
                always_show_network_type_icon: mode.always_show_network_type_icon,
                dds_rat_icon_enhancement_enabled: mode.dds_rat_icon_enhancement_enabled,
                non_dds_rat_icon_enhancement_enabled: mode.non_dds_rat_icon_enhancement_enabled,
                mobile_data_enabled: *data_enabled,
                data_roaming_enabled: *data_roaming_enabled,
                is_default_data_sub: *is_dds,
                is_roaming: *is_roaming,
                ..MobileIconCustomization::default()
            },
        )
        .share(MobileIconCustomization::default());

        let mobile_icon_customization = combine4(
            &signal_strength_customization,
            &repo.nr_icon_type,
            &network_type_icon_customization,
            &repo.origin_network_type,
            |strength, nr_icon_type, rat, origin| MobileIconCustomization {
                data_network_type: strength.data_network_type,
                voice_network_type: strength.voice_network_type,
                five_g_service_state: FiveGServiceState::new(*nr_icon_type),
                origin_network_type: *origin,
                ..rat.clone()
            },
        )
        .share(MobileIconCustomization::default());

        let ims_info = combine5(
            &repo.voice_network_type,
            &repo.origin_network_type,
            &repo.voice_capable,
            &repo.video_capable,
            &repo.ims_registered,
            |voice, origin, voice_capable, video_capable, ims_registered| MobileIconCustomization {
                voice_network_type: *voice,
                origin_network_type: *origin,
                voice_capable: *voice_capable,
                video_capable: *video_capable,
                ims_registered: *ims_registered,
                ..MobileIconCustomization::default()
            },
        )
        .share(MobileIconCustomization::default());

        let customized_icon = {
            let cross_sim = combine4(
                &is_default_data_sub,
                &repo.ims_registration_tech,
                &policies.cross_sim_display_signal_level,
                &repo.ciwlan_available,
                |is_dds, tech, display, ciwlan| CrossSimInputs {
                    is_default_data_sub: *is_dds,
                    ims_registration_tech: *tech,
                    cross_sim_display_enabled: *display,
                    ciwlan_available: *ciwlan,
                },
            );
            combine(&cross_sim, &policies.dds_icon, |inputs, dds_icon| {
                resolve_customized_icon(inputs, *dds_icon)
            })
            .distinct_until_changed()
            .share(None)
        };

        let vowifi_available = combine3(
            &repo.ims_registration_tech,
            &repo.voice_capable,
            &policies.show_vowifi_icon,
            |tech, voice_capable, show_vowifi| {
                resolve_vowifi_available(*voice_capable, *tech, *show_vowifi)
            },
        )
        .share(false);

        // Icon group before carrier-id overrides.
        let default_network_type = combine4(
            &repo.resolved_network_type,
            &policies.default_mobile_icon_mapping,
            &policies.default_mobile_icon_group,
            &mobile_icon_customization,
            |resolved, mapping, default_group, customization| {
                resolve_icon_group(resolved, customization, mapping, default_group)
            },
        )
        .share(policies.default_mobile_icon_group.value().unwrap_or_default());

        let network_type_icon_group = {
            let initial = NetworkTypeIconModel::Default(
                policies
                    .default_mobile_icon_group
                    .value()
                    .unwrap_or_default(),
            );
            let overrides = Arc::clone(&carrier_id_overrides);
            combine3(
                &default_network_type,
                &carrier_id_override_exists,
                &repo.carrier_id,
                move |group, exists, carrier_id| {
                    resolve_network_type_icon(group, *exists, *carrier_id, overrides.as_ref())
                },
            )
            .distinct_until_changed()
            .log_diffs(&table_log, "networkTypeIcon", initial.clone())
            .share(initial)
        };

        let is_non_terrestrial = if config.carrier_enabled_satellite {
            repo.is_non_terrestrial.clone()
        } else {
            Signal::constant_in(&dispatcher, false)
        };

        let level = {
            let sources = combine4(
                &repo.is_gsm,
                &repo.primary_level,
                &repo.cdma_level,
                &policies.always_use_cdma_level,
                |is_gsm, primary_level, cdma_level, always_use_cdma_level| LevelInputs {
                    is_gsm: *is_gsm,
                    primary_level: *primary_level,
                    cdma_level: *cdma_level,
                    always_use_cdma_level: *always_use_cdma_level,
                },
            );
            combine(&sources, &signal_strength_customization, resolve_level).share(0)
        };

        let is_data_connected = repo
            .data_connection_state
            .map(precedence::is_data_connected)
            .share(false);

        let show_exclamation_mark = combine5(
            &repo.data_enabled,
            &is_data_connected,
            &repo.is_connection_failed,
            &repo.is_in_service,
            &policies.hide_no_internet_state,
            |data_enabled, data_connected, connection_failed, in_service, hide_no_internet| {
                resolve_show_exclamation(&ExclamationInputs {
                    data_enabled: *data_enabled,
                    data_connected: *data_connected,
                    connection_failed: *connection_failed,
                    in_service: *in_service,
                    hide_no_internet: *hide_no_internet,
                })
            },
        )
        .share(true);

        let shown_level = combine4(
            &level,
            &repo.number_of_levels,
            &repo.is_in_service,
            &repo.inflate_signal_strength,
            |level, number_of_levels, in_service, inflate| {
                resolve_shown_level(*level, *number_of_levels, *in_service, *inflate)
            },
        )
        .share(0);

        let signal_level_icon = {
            let cellular_icon = combine4(
                &shown_level,
                &repo.number_of_levels,
                &show_exclamation_mark,
                &repo.carrier_network_change_active,
                |level, number_of_levels, show_exclamation_mark, carrier_network_change| {
                    SignalIconModel::Cellular {
                        level: *level,
                        number_of_levels: *number_of_levels,
                        show_exclamation_mark: *show_exclamation_mark,
                        carrier_network_change: *carrier_network_change,
                    }
                },
            );
            let customized_cellular_icon =
                combine(&cellular_icon, &customized_icon, |own, customized| {
                    select_cellular_icon(*own, *customized)
                });
            let satellite_icon = shown_level.map(|level| precedence::satellite_icon(*level));

            let initial = SignalIconModel::Cellular {
                level: shown_level.value().unwrap_or(0),
                number_of_levels: repo.number_of_levels.value().unwrap_or(0),
                show_exclamation_mark: show_exclamation_mark.value().unwrap_or(true),
                carrier_network_change: repo.carrier_network_change_active.value().unwrap_or(false),
            };
            is_non_terrestrial
                .switch_latest(move |non_terrestrial: &bool| {
                    if *non_terrestrial {
                        satellite_icon.clone()
                    } else {
                        customized_cellular_icon.clone()
                    }
                })
                .distinct_until_changed()
                .log_diffs(&table_log, "icon", initial)
                .share(initial)
        };

        Self {
            sub_id,
            activity: repo.data_activity_direction.clone(),
            mobile_is_default: policies.mobile_is_default.clone(),
            is_data_enabled: repo.data_enabled.clone(),
            is_connection_failed: repo.is_connection_failed.clone(),
            is_in_service: repo.is_in_service.clone(),
            is_emergency_only: repo.is_emergency_only.clone(),
            always_show_data_rat_icon: policies.always_show_data_rat_icon.clone(),
            show_slice_attribution: repo.has_prioritized_network_capabilities.clone(),
            is_single_carrier: policies.is_single_carrier.clone(),
            is_force_hidden: policies.is_force_hidden.clone(),
            always_use_rsrp_level_for_lte: policies.always_use_rsrp_level_for_lte.clone(),
            is_allowed_during_airplane_mode: repo.is_allowed_during_airplane_mode.clone(),
            carrier_network_change_active: repo.carrier_network_change_active.clone(),
            hide_no_internet_state: policies.hide_no_internet_state.clone(),
            show_volte_icon: policies.show_volte_icon.clone(),
            show_vowifi_icon: policies.show_vowifi_icon.clone(),
            default_subscription_has_data_enabled: policies
                .default_subscription_has_data_enabled
                .clone(),
            is_default_connection_failed: policies.is_default_connection_failed.clone(),
            is_data_connected,
            is_non_terrestrial,
            network_name,
            carrier_name,
            customized_carrier_name,
            customized_network_name,
            is_roaming,
            is_default_data_sub,
            network_type_icon_customization,
            ims_info,
            customized_icon,
            vowifi_available,
            network_type_icon_group,
            level,
            shown_level,
            show_exclamation_mark,
            signal_level_icon,
            table_log,
        }
    }

    #[must_use]
    pub fn sub_id(&self) -> i32 {
        self.sub_id
    }

    /// Diff log for this connection.
    #[must_use]
    pub fn table_log_buffer(&self) -> &TableLogBuffer {
        &self.table_log
    }

    /// Canonical signal strength glyph.
    #[must_use]
    pub fn signal_level_icon(&self) -> &Signal<SignalIconModel> {
        &self.signal_level_icon
    }

    /// Network type badge, after carrier-id overrides.
    #[must_use]
    pub fn network_type_icon_group(&self) -> &Signal<NetworkTypeIconModel> {
        &self.network_type_icon_group
    }

    #[must_use]
    pub fn network_name(&self) -> &Signal<NetworkNameModel> {
        &self.network_name
    }

    #[must_use]
    pub fn carrier_name(&self) -> &Signal<String> {
        &self.carrier_name
    }

    /// Carrier name after operator customization, with the network class.
    #[must_use]
    pub fn customized_carrier_name(&self) -> &Signal<String> {
        &self.customized_carrier_name
    }

    /// Network name after name-only operator customization.
    #[must_use]
    pub fn customized_network_name(&self) -> &Signal<NetworkNameModel> {
        &self.customized_network_name
    }

    /// Roaming, suppressed during carrier network change.
    #[must_use]
    pub fn is_roaming(&self) -> &Signal<bool> {
        &self.is_roaming
    }

    #[must_use]
    pub fn is_default_data_sub(&self) -> &Signal<bool> {
        &self.is_default_data_sub
    }

    #[must_use]
    pub fn is_non_terrestrial(&self) -> &Signal<bool> {
        &self.is_non_terrestrial
    }

    #[must_use]
    pub fn is_data_connected(&self) -> &Signal<bool> {
        &self.is_data_connected
    }

    #[must_use]
    pub fn network_type_icon_customization(&self) -> &Signal<MobileIconCustomization> {
        &self.network_type_icon_customization
    }

    #[must_use]
    pub fn ims_info(&self) -> &Signal<MobileIconCustomization> {
        &self.ims_info
    }

    /// Companion icon replacing this connection's own, if any.
    #[must_use]
    pub fn customized_icon(&self) -> &Signal<Option<SignalIconModel>> {
        &self.customized_icon
    }

    #[must_use]
    pub fn vowifi_available(&self) -> &Signal<bool> {
        &self.vowifi_available
    }

    /// Level before service and inflation adjustments.
    #[must_use]
    pub fn level(&self) -> &Signal<i32> {
        &self.level
    }

    #[must_use]
    pub fn shown_level(&self) -> &Signal<i32> {
        &self.shown_level
    }

    #[must_use]
    pub fn show_exclamation_mark(&self) -> &Signal<bool> {
        &self.show_exclamation_mark
    }

    #[must_use]
    pub fn activity(&self) -> &Signal<DataActivityModel> {
        &self.activity
    }

    #[must_use]
    pub fn mobile_is_default(&self) -> &Signal<bool> {
        &self.mobile_is_default
    }

    #[must_use]
    pub fn is_data_enabled(&self) -> &Signal<bool> {
        &self.is_data_enabled
    }

    #[must_use]
    pub fn is_connection_failed(&self) -> &Signal<bool> {
        &self.is_connection_failed
    }

    #[must_use]
    pub fn is_in_service(&self) -> &Signal<bool> {
        &self.is_in_service
    }

    #[must_use]
    pub fn is_emergency_only(&self) -> &Signal<bool> {
        &self.is_emergency_only
    }

    #[must_use]
    pub fn always_show_data_rat_icon(&self) -> &Signal<bool> {
        &self.always_show_data_rat_icon
    }

    #[must_use]
    pub fn show_slice_attribution(&self) -> &Signal<bool> {
        &self.show_slice_attribution
    }

    #[must_use]
    pub fn is_single_carrier(&self) -> &Signal<bool> {
        &self.is_single_carrier
    }

    #[must_use]
    pub fn is_force_hidden(&self) -> &Signal<bool> {
        &self.is_force_hidden
    }

    #[must_use]
    pub fn always_use_rsrp_level_for_lte(&self) -> &Signal<bool> {
        &self.always_use_rsrp_level_for_lte
    }

    #[must_use]
    pub fn is_allowed_during_airplane_mode(&self) -> &Signal<bool> {
        &self.is_allowed_during_airplane_mode
    }

    #[must_use]
    pub fn carrier_network_change_active(&self) -> &Signal<bool> {
        &self.carrier_network_change_active
    }

    #[must_use]
    pub fn hide_no_internet_state(&self) -> &Signal<bool> {
        &self.hide_no_internet_state
    }

    #[must_use]
    pub fn show_volte_icon(&self) -> &Signal<bool> {
        &self.show_volte_icon
    }

    #[must_use]
    pub fn show_vowifi_icon(&self) -> &Signal<bool> {
        &self.show_vowifi_icon
    }

    #[must_use]
    pub fn default_subscription_has_data_enabled(&self) -> &Signal<bool> {
        &self.default_subscription_has_data_enabled
    }

    #[must_use]
    pub fn is_default_connection_failed(&self) -> &Signal<bool> {
        &self.is_default_connection_failed
    }
}

fn initial_name(name: &Signal<NetworkNameModel>) -> String {
    name.value()
        .map(|name| name.name().to_string())
        .unwrap_or_default()
}
