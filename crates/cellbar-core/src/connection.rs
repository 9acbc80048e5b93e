#![forbid(unsafe_code)]

//! Connection-level value types reported by the telephony collaborator.

use serde::{Deserialize, Serialize};

/// Data connection state of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataConnectionState {
    Connected,
    Connecting,
    #[default]
    Disconnected,
    Disconnecting,
    Suspended,
    HandoverInProgress,
    Unknown,
    Invalid,
}

/// Direction of recent data traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DataActivityModel {
    pub has_activity_in: bool,
    pub has_activity_out: bool,
}

/// Technology the IMS stack is registered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImsRegistrationTech {
    #[default]
    None,
    Lte,
    /// Calls routed over Wi-Fi.
    Iwlan,
    /// Calls routed over another SIM's data link.
    CrossSim,
    Nr,
}

impl ImsRegistrationTech {
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Lte,
            1 => Self::Iwlan,
            2 => Self::CrossSim,
            3 => Self::Nr,
            _ => Self::None,
        }
    }

    /// True when the call path does not go over this SIM's own radio.
    #[must_use]
    pub const fn is_cross_sim_or_iwlan(self) -> bool {
        matches!(self, Self::Iwlan | Self::CrossSim)
    }
}

/// Provider name for a connection, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkNameModel {
    /// The configured placeholder name.
    Default(String),
    /// Name taken from the subscription record.
    SubscriptionDerived(String),
    /// Name derived from a service-provider broadcast or operator override.
    IntentDerived(String),
}

impl NetworkNameModel {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Default(name) | Self::SubscriptionDerived(name) | Self::IntentDerived(name) => {
                name
            }
        }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

impl Default for NetworkNameModel {
    fn default() -> Self {
        Self::Default(String::new())
    }
}
