#![forbid(unsafe_code)]

//! Core: telephony vocabulary and icon models for a mobile status indicator.
//!
//! # Role in cellbar
//! `cellbar-core` is the vocabulary layer. It owns the value types that flow
//! through the derivation graph: radio technologies, resolved network types,
//! icon groups, and the tagged icon models handed to the UI.
//!
//! # Primary responsibilities
//! - **NetworkType / OverrideNetworkType**: raw radio technologies and their
//!   icon lookup keys.
//! - **ResolvedNetworkType**: the connection's display-level network type.
//! - **MobileIconGroup**: the icon group catalog and the default mapping.
//! - **SignalIconModel / NetworkTypeIconModel**: closed sum types consumed by
//!   the renderer.
//! - **MobileIconCustomization**: immutable snapshot aggregates used by the
//!   precedence rules.
//!
//! # How it fits in the system
//! The runtime (`cellbar-runtime`) is generic over value types and knows
//! nothing about telephony. The mobile crate (`cellbar-mobile`) wires raw
//! inputs of these types into output signals.

pub mod connection;
pub mod customization;
pub mod icon;
pub mod logging;
pub mod network_type;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

pub use connection::{DataActivityModel, DataConnectionState, ImsRegistrationTech, NetworkNameModel};
pub use customization::{FiveGServiceState, MobileIconCustomization, NrIconType};
pub use icon::{
    IconMapping, MobileIconGroup, NetworkTypeIconModel, SatelliteIcon, SignalIconModel,
    default_icon_mapping, icon_groups,
};
pub use network_type::{NetworkClass, NetworkType, OverrideNetworkType, ResolvedNetworkType};
