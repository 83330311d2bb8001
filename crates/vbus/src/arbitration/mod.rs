// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Provider arbitration.
//!
//! Arbitration turns a discovery lookup into exactly one chosen provider
//! entry, according to the strategy configured on the [`DiscoveryQos`].
//! The proxy builder consumes arbitrators through the [`Arbitration`] trait
//! and constructs them via [`create_arbitrator`].

mod arbitrator;
pub(crate) mod strategy;

pub use arbitrator::Arbitrator;

use crate::discovery::DiscoverySync;
use crate::error::DiscoveryError;
use crate::qos::DiscoveryQos;
use crate::types::{DiscoveryEntryWithMetaInfo, Version};
use std::sync::{Arc, Weak};

/// Callback delivering the arbitrated provider entry.
pub type ArbitrationSuccess = Box<dyn FnOnce(DiscoveryEntryWithMetaInfo) + Send>;

/// Callback delivering the terminal arbitration failure.
pub type ArbitrationError = Box<dyn FnOnce(DiscoveryError) + Send>;

/// One arbitration attempt.
///
/// Implementations guarantee an exactly-once terminal callback per started
/// attempt: either `on_success` with a single chosen entry or `on_error`
/// with a [`DiscoveryError`]. `stop_arbitration` may be called concurrently
/// with the attempt's own callbacks; stopping after the terminal callback is
/// a no-op.
pub trait Arbitration: Send + Sync {
    /// Start the attempt. Callbacks are delivered on the arbitrator's worker
    /// thread.
    fn start_arbitration(&self, on_success: ArbitrationSuccess, on_error: ArbitrationError);

    /// Cancel the attempt. Idempotent; safe after the terminal callback.
    fn stop_arbitration(&self);
}

/// Construct an arbitrator for one proxy build attempt.
///
/// `discovery` is held weakly: arbitration aborts with an error when the
/// discovery aggregator is dropped while the attempt is in flight.
pub fn create_arbitrator(
    domain: impl Into<String>,
    interface_name: impl Into<String>,
    interface_version: Version,
    discovery: Weak<dyn DiscoverySync>,
    qos: DiscoveryQos,
) -> Arc<Arbitrator> {
    Arc::new(Arbitrator::new(
        domain.into(),
        interface_name.into(),
        interface_version,
        discovery,
        qos,
    ))
}
