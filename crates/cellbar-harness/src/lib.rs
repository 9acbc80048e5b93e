#![forbid(unsafe_code)]

//! Harness: fixtures for exercising the mobile icon graph end to end.
//!
//! - [`fixture`]: writable [`ConnectionInputs`] and [`PolicyInputs`].
//! - [`recorder`]: [`SignalRecorder`], which keeps every emitted value.
//! - [`Scenario`]: one connection wired to an interactor, ready to drive.

pub mod fixture;
pub mod recorder;

use std::sync::Arc;

use cellbar_mobile::{
    CarrierIdIconOverrides, CarrierIdOverrides, CarrierNameCustomization, CarrierNameCustomizer,
    MobileIconConfig, MobileIconInteractor, StaticOperators,
};
use cellbar_runtime::Dispatcher;

pub use fixture::{ConnectionInputs, PolicyInputs};
pub use recorder::SignalRecorder;

/// Subscription id used by [`Scenario::new`].
pub const DEFAULT_SUB_ID: i32 = 1;

/// One connection, its policies, and the interactor built over them.
#[derive(Debug)]
pub struct Scenario {
    pub dispatcher: Dispatcher,
    pub connection: ConnectionInputs,
    pub policies: PolicyInputs,
    pub interactor: MobileIconInteractor,
}

impl Scenario {
    /// Default inputs, default config, no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&MobileIconConfig::default())
    }

    /// Carrier names customized from `config.carrier_name`, with no known
    /// operators, and no overrides.
    #[must_use]
    pub fn with_config(config: &MobileIconConfig) -> Self {
        Self::build(
            config,
            Arc::new(CarrierNameCustomization::from_config(
                config,
                Arc::new(StaticOperators::new()),
            )),
            Arc::new(CarrierIdIconOverrides::new()),
        )
    }

    /// Full control over the collaborators.
    #[must_use]
    pub fn build(
        config: &MobileIconConfig,
        customizer: Arc<dyn CarrierNameCustomizer>,
        overrides: Arc<dyn CarrierIdOverrides>,
    ) -> Self {
        let dispatcher = Dispatcher::new();
        let connection = ConnectionInputs::new(&dispatcher, DEFAULT_SUB_ID);
        let policies = PolicyInputs::new(&dispatcher, DEFAULT_SUB_ID);
        let interactor = MobileIconInteractor::new(
            &connection.repository(),
            &policies.policies(),
            customizer,
            overrides,
            config,
        );
        Self {
            dispatcher,
            connection,
            policies,
            interactor,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Route `tracing` output through the test writer. Safe to call from every
/// test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = cellbar_core::logging::init_test_writer("cellbar=debug");
}
