#![forbid(unsafe_code)]

//! Mobile: the derivation graph behind one connection's status-bar icon.
//!
//! # Role in cellbar
//! `cellbar-mobile` turns the raw telephony signals of a subscription
//! ([`MobileConnectionRepository`]) and the device-wide policies
//! ([`MobileIconPolicies`]) into the values the status bar draws: the signal
//! glyph, the network type badge, roaming, carrier name and friends.
//!
//! # Primary responsibilities
//! - **interactor**: [`MobileIconInteractor`], the graph itself.
//! - **precedence**: pure rules deciding which input wins for each output.
//! - **carrier_name**: operator-specific carrier name customization.
//! - **carrier_overrides**: carrier-id network type icon overrides.
//! - **config**: [`MobileIconConfig`] with JSON and environment loading.
//!
//! # Example
//!
//! ```ignore
//! let config = MobileIconConfig::from_json_str(&json)?.with_env_overrides()?;
//! let interactor = MobileIconInteractor::new(
//!     &repository,
//!     &policies,
//!     Arc::new(CarrierNameCustomization::from_config(&config, operators)),
//!     Arc::new(CarrierIdIconOverrides::new()),
//!     &config,
//! );
//! let _icon = interactor.signal_level_icon().subscribe(|icon| draw(icon));
//! ```

pub mod carrier_name;
pub mod carrier_overrides;
pub mod config;
pub mod interactor;
pub mod precedence;
pub mod repository;

pub use carrier_name::{
    CarrierNameConfig, CarrierNameCustomization, CarrierNameCustomizer, LocalizedName,
    NetworkClassLabels, NetworkTypeContext, NoCustomization, OperatorLookup, StaticOperators,
};
pub use carrier_overrides::{CarrierIdIconOverrides, CarrierIdOverrides};
pub use config::{ConfigError, MobileIconConfig};
pub use interactor::MobileIconInteractor;
pub use repository::{MobileConnectionRepository, MobileIconPolicies};
