// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery data model.
//!
//! Providers are addressed by logical identifiers (domain + interface name)
//! and identified on the routing graph by an opaque, globally unique
//! participant id. The types in this module describe what the discovery
//! service knows about a provider; they are exchanged verbatim between the
//! local aggregator, the arbitrator and the remote discovery service.

use serde::{Deserialize, Serialize};

/// Interface version of a provider or a proxy.
///
/// Arbitration treats a provider as compatible when the major versions are
/// equal and the provider's minor version is at least the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major_version: u32,
    pub minor_version: u32,
}

impl Version {
    #[must_use]
    pub fn new(major_version: u32, minor_version: u32) -> Self {
        Self {
            major_version,
            minor_version,
        }
    }

    /// Whether a provider of this version can serve a consumer requesting
    /// `requested`.
    #[must_use]
    pub fn satisfies(&self, requested: &Version) -> bool {
        self.major_version == requested.major_version
            && self.minor_version >= requested.minor_version
    }
}

/// Free-form provider parameter used by keyword arbitration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomParameter {
    pub name: String,
    pub value: String,
}

impl CustomParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Visibility of a provider registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderScope {
    /// Registered with the local directory only.
    Local,
    /// Registered locally and with the global directory.
    Global,
}

/// Quality-of-service attributes a provider registers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderQos {
    /// Parameters matched by keyword arbitration.
    pub custom_parameters: Vec<CustomParameter>,
    /// Relative priority used by highest-priority arbitration.
    pub priority: i64,
    /// Registration visibility.
    pub scope: ProviderScope,
    /// Whether the provider can serve on-change subscriptions.
    pub supports_on_change_subscriptions: bool,
}

impl Default for ProviderQos {
    fn default() -> Self {
        Self {
            custom_parameters: Vec::new(),
            priority: -1,
            scope: ProviderScope::Global,
            supports_on_change_subscriptions: false,
        }
    }
}

impl ProviderQos {
    /// Look up a custom parameter by name.
    #[must_use]
    pub fn custom_parameter(&self, name: &str) -> Option<&str> {
        self.custom_parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// Transport tag describing how a provider can be reached.
///
/// The order of tags inside [`DiscoveryEntry::connections`] expresses
/// preference; `InProcess` always sorts first when the provider lives in the
/// local address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connection {
    /// Sender and receiver share one address space; serialization may be
    /// bypassed.
    InProcess,
    /// Node-local message bus.
    LocalBus,
    /// Global message bus spanning the cluster.
    GlobalBus,
}

/// A provider registration as known to the discovery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryEntry {
    /// Interface version offered by the provider.
    pub provider_version: Version,
    /// Domain the provider is registered under.
    pub domain: String,
    /// Fully qualified interface name.
    pub interface_name: String,
    /// Opaque, globally unique routing key. Immutable once assigned.
    pub participant_id: String,
    /// Registration QoS.
    pub qos: ProviderQos,
    /// Timestamp of the provider's last liveness signal (ms since epoch,
    /// -1 when unknown).
    pub last_seen_date_ms: i64,
    /// Registration expiry (ms since epoch, -1 when unknown).
    pub expiry_date_ms: i64,
    /// Identifier of the key the provider signs with; empty when unsigned.
    pub public_key_id: String,
    /// Ordered transport preference.
    pub connections: Vec<Connection>,
}

impl DiscoveryEntry {
    /// Prepend `connection` to the preference list, dropping any previous
    /// occurrence so the tag appears exactly once and first.
    pub fn prefer_connection(&mut self, connection: Connection) {
        self.connections.retain(|c| *c != connection);
        self.connections.insert(0, connection);
    }
}

/// A [`DiscoveryEntry`] plus locality metadata observed by the aggregator or
/// the arbitrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryEntryWithMetaInfo {
    pub entry: DiscoveryEntry,
    /// Whether the entry was served by the local directory.
    pub is_local: bool,
}

impl DiscoveryEntryWithMetaInfo {
    #[must_use]
    pub fn new(entry: DiscoveryEntry, is_local: bool) -> Self {
        Self { entry, is_local }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(participant_id: &str) -> DiscoveryEntry {
        DiscoveryEntry {
            provider_version: Version::new(1, 0),
            domain: "test.domain".to_string(),
            interface_name: "test/Interface".to_string(),
            participant_id: participant_id.to_string(),
            qos: ProviderQos::default(),
            last_seen_date_ms: -1,
            expiry_date_ms: -1,
            public_key_id: String::new(),
            connections: vec![Connection::LocalBus, Connection::GlobalBus],
        }
    }

    #[test]
    fn test_version_satisfies() {
        let provider = Version::new(47, 11);
        assert!(provider.satisfies(&Version::new(47, 11)));
        assert!(provider.satisfies(&Version::new(47, 3)));
        assert!(!provider.satisfies(&Version::new(47, 12)));
        assert!(!provider.satisfies(&Version::new(46, 0)));
        assert!(!provider.satisfies(&Version::new(48, 0)));
    }

    #[test]
    fn test_prefer_connection_prepends() {
        let mut e = entry("p1");
        e.prefer_connection(Connection::InProcess);
        assert_eq!(
            e.connections,
            vec![
                Connection::InProcess,
                Connection::LocalBus,
                Connection::GlobalBus
            ]
        );
    }

    #[test]
    fn test_prefer_connection_deduplicates() {
        let mut e = entry("p1");
        e.prefer_connection(Connection::InProcess);
        e.prefer_connection(Connection::InProcess);
        assert_eq!(
            e.connections
                .iter()
                .filter(|c| **c == Connection::InProcess)
                .count(),
            1
        );
        assert_eq!(e.connections[0], Connection::InProcess);
    }

    #[test]
    fn test_custom_parameter_lookup() {
        let mut qos = ProviderQos::default();
        qos.custom_parameters
            .push(CustomParameter::new("keyword", "sensors"));
        assert_eq!(qos.custom_parameter("keyword"), Some("sensors"));
        assert_eq!(qos.custom_parameter("missing"), None);
    }
}
