// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Routing contracts consumed by the proxy binding pipeline.
//!
//! The message router itself lives in the surrounding runtime; this module
//! defines the trait the proxy builder calls to register routes, the
//! dispatcher address type, and the multicast receiver directory the router
//! uses to fan publications out to subscribers.

mod multicast;

pub use multicast::MulticastReceiverDirectory;

use crate::error::ProviderRuntimeError;
use serde::{Deserialize, Serialize};

/// Address of a message dispatcher on the routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    /// Dispatcher in the same address space.
    InProcess { id: String },
    /// Endpoint on the node-local message bus.
    LocalBus { id: String },
    /// Endpoint on the global message bus.
    GlobalBus { broker_uri: String, topic: String },
}

/// Success callback of [`MessageRouter::add_next_hop`].
pub type AddNextHopSuccess = Box<dyn FnOnce() + Send>;

/// Error callback of [`MessageRouter::add_next_hop`].
pub type AddNextHopError = Box<dyn FnOnce(ProviderRuntimeError) + Send>;

/// Route registration surface of the message router.
///
/// Implementations may complete `add_next_hop` synchronously on the calling
/// thread or asynchronously on their own worker; exactly one of the two
/// callbacks fires per call.
pub trait MessageRouter: Send + Sync {
    /// Mark a participant as known so queued messages for it are released.
    fn set_to_known(&self, participant_id: &str);

    /// Register the next hop for `participant_id` at `address`.
    #[allow(clippy::too_many_arguments)]
    fn add_next_hop(
        &self,
        participant_id: &str,
        address: &Address,
        is_globally_visible: bool,
        expiry_date_ms: i64,
        is_sticky: bool,
        on_success: AddNextHopSuccess,
        on_error: AddNextHopError,
    );
}
