// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! VBUS Global Configuration - Single Source of Truth
//!
//! This module centralizes the runtime-wide defaults consumed by the proxy
//! builder, the arbitrator and the local discovery aggregator.
//! **NEVER hardcode these values elsewhere!**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: Compile-time defaults (TTL ceiling, discovery
//!   timing, system-services addressing)
//! - **Level 2 (Dynamic)**: [`MessagingSettings`] / [`SystemServicesSettings`]
//!   carrying per-runtime overrides, loaded by the surrounding runtime from
//!   its persisted settings

use serde::{Deserialize, Serialize};

// =======================================================================
// Messaging Defaults
// =======================================================================

/// Upper bound for any message TTL (milliseconds).
///
/// Matches the 30-day ceiling used for all long-lived intervals in this
/// crate. `MessagingQos` TTLs above this value are silently clamped by the
/// proxy builder.
pub const DEFAULT_MESSAGING_MAXIMUM_TTL_MS: u64 = 2_592_000_000;

/// Default message TTL (milliseconds) when the caller supplies none.
pub const DEFAULT_MESSAGING_TTL_MS: u64 = 60_000;

// =======================================================================
// Discovery Defaults
// =======================================================================

/// Default discovery timeout (milliseconds).
///
/// Substituted for `DiscoveryQos::NO_VALUE` by the proxy builder. The
/// arbitrator gives up and reports a discovery error once this deadline
/// passes without a suitable provider.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: i64 = 600_000;

/// Default interval between arbitration retries (milliseconds).
///
/// Substituted for `DiscoveryQos::NO_VALUE` by the proxy builder.
pub const DEFAULT_DISCOVERY_RETRY_INTERVAL_MS: i64 = 10_000;

// =======================================================================
// System Services Addressing
// =======================================================================

/// Domain under which the well-known system services are provisioned.
pub const SYSTEM_SERVICES_DOMAIN: &str = "vbus.system";

/// Interface name of the discovery provider.
pub const DISCOVERY_INTERFACE_NAME: &str = "system/Discovery";

/// Interface name of the routing provider.
pub const ROUTING_INTERFACE_NAME: &str = "system/Routing";

/// Provisioned participant id of the cluster-controller discovery provider.
pub const CC_DISCOVERY_PROVIDER_PARTICIPANT_ID: &str = "vbus.system.discoveryprovider";

/// Provisioned participant id of the cluster-controller routing provider.
pub const CC_ROUTING_PROVIDER_PARTICIPANT_ID: &str = "vbus.system.routingprovider";

// =======================================================================
// Settings Structs (Dynamic)
// =======================================================================

/// Runtime messaging settings.
///
/// The surrounding runtime loads these from its persisted settings store;
/// this crate only consumes the resolved values. Every field defaults to the
/// compile-time constant above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingSettings {
    /// Ceiling applied to every `MessagingQos` TTL.
    pub maximum_ttl_ms: u64,
    /// Default discovery timeout substituted for `NO_VALUE`.
    pub discovery_default_timeout_ms: i64,
    /// Default arbitration retry interval substituted for `NO_VALUE`.
    pub discovery_default_retry_interval_ms: i64,
}

impl Default for MessagingSettings {
    fn default() -> Self {
        Self {
            maximum_ttl_ms: DEFAULT_MESSAGING_MAXIMUM_TTL_MS,
            discovery_default_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            discovery_default_retry_interval_ms: DEFAULT_DISCOVERY_RETRY_INTERVAL_MS,
        }
    }
}

/// Addressing of the well-known system services (discovery, routing).
///
/// The local discovery aggregator seeds its provisioned entries from these
/// values so the system services are resolvable without contacting the
/// remote discovery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemServicesSettings {
    /// Domain of the provisioned system services.
    pub domain: String,
    /// Participant id of the cluster-controller discovery provider.
    pub cc_discovery_provider_participant_id: String,
    /// Participant id of the cluster-controller routing provider.
    pub cc_routing_provider_participant_id: String,
}

impl Default for SystemServicesSettings {
    fn default() -> Self {
        Self {
            domain: SYSTEM_SERVICES_DOMAIN.to_string(),
            cc_discovery_provider_participant_id: CC_DISCOVERY_PROVIDER_PARTICIPANT_ID.to_string(),
            cc_routing_provider_participant_id: CC_ROUTING_PROVIDER_PARTICIPANT_ID.to_string(),
        }
    }
}
