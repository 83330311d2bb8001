// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::module_name_repetitions)] // Test modules
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::wildcard_imports)] // Test utility imports

//! Discovery integration tests.
//!
//! Exercises the provisioned system-services fast path and the discovery
//! surface of the local aggregator inside a full runtime: building a proxy
//! for the provisioned discovery provider, then add/lookup/remove against
//! the aggregator backed by a stub remote directory.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vbus::routing::{AddNextHopError, AddNextHopSuccess};
use vbus::{
    Address, ArbitrationStrategy, Connection, CustomParameter, DiscoveryEntry,
    DiscoveryEntryWithMetaInfo, DiscoveryQos, DiscoveryResult, DiscoveryScope, DiscoverySync,
    MessageRouter, MessagingQos, ProviderQos, ProviderScope, ProxyBase, ProxyTarget,
    RequestStatus, Runtime, SystemServicesSettings, Version,
};

// ============================================================================
// Test proxy for the provisioned discovery provider
// ============================================================================

struct DiscoveryServiceProxy {
    base: ProxyBase,
}

impl ProxyTarget for DiscoveryServiceProxy {
    const INTERFACE_NAME: &'static str = "system/Discovery";
    const MAJOR_VERSION: u32 = 1;
    const MINOR_VERSION: u32 = 0;

    fn from_base(base: ProxyBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &ProxyBase {
        &self.base
    }
}

// ============================================================================
// Stub collaborators
// ============================================================================

struct AcceptingRouter;

impl MessageRouter for AcceptingRouter {
    fn set_to_known(&self, _participant_id: &str) {}

    fn add_next_hop(
        &self,
        _participant_id: &str,
        _address: &Address,
        _is_globally_visible: bool,
        _expiry_date_ms: i64,
        _is_sticky: bool,
        on_success: AddNextHopSuccess,
        _on_error: AddNextHopError,
    ) {
        on_success();
    }
}

/// Remote discovery stub with an in-memory entry store.
#[derive(Default)]
struct StubRemoteDiscovery {
    entries: Mutex<Vec<DiscoveryEntry>>,
    lookup_calls: AtomicUsize,
}

impl DiscoverySync for StubRemoteDiscovery {
    fn add(&self, entry: DiscoveryEntry) -> DiscoveryResult<()> {
        self.entries.lock().push(entry);
        Ok(())
    }

    fn lookup_by_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        _qos: &DiscoveryQos,
    ) -> DiscoveryResult<Vec<DiscoveryEntryWithMetaInfo>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|e| domains.contains(&e.domain) && e.interface_name == interface_name)
            .map(|e| DiscoveryEntryWithMetaInfo::new(e.clone(), true))
            .collect())
    }

    fn lookup_by_participant(
        &self,
        participant_id: &str,
    ) -> DiscoveryResult<DiscoveryEntryWithMetaInfo> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .iter()
            .find(|e| e.participant_id == participant_id)
            .map(|e| DiscoveryEntryWithMetaInfo::new(e.clone(), true))
            .ok_or_else(|| RequestStatus::error("no entry found"))
    }

    fn remove(&self, participant_id: &str) -> DiscoveryResult<()> {
        self.entries
            .lock()
            .retain(|e| e.participant_id != participant_id);
        Ok(())
    }
}

fn test_runtime() -> (Arc<Runtime>, Arc<StubRemoteDiscovery>) {
    let runtime = Runtime::builder(
        Arc::new(AcceptingRouter),
        Address::InProcess {
            id: "dispatcher".to_string(),
        },
    )
    .build();
    let remote = Arc::new(StubRemoteDiscovery::default());
    runtime
        .discovery_aggregator()
        .set_discovery_proxy(remote.clone());
    (runtime, remote)
}

fn lookup_qos() -> DiscoveryQos {
    DiscoveryQos {
        cache_max_age_ms: 5_000,
        discovery_timeout_ms: 5_000,
        discovery_scope: DiscoveryScope::LocalOnly,
        provider_must_support_on_change: false,
        ..DiscoveryQos::default()
    }
}

fn sample_entry() -> DiscoveryEntry {
    DiscoveryEntry {
        provider_version: Version::new(47, 11),
        domain: "DiscoveryIntegrationTest.Domain.A".to_string(),
        interface_name: "DiscoveryIntegrationTest.InterfaceName.A".to_string(),
        participant_id: "DiscoveryIntegrationTest.ParticipantID.A".to_string(),
        qos: ProviderQos {
            custom_parameters: Vec::new(),
            priority: 1,
            scope: ProviderScope::Local,
            supports_on_change_subscriptions: false,
        },
        last_seen_date_ms: -1,
        expiry_date_ms: -1,
        public_key_id: String::new(),
        connections: vec![Connection::LocalBus],
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_discovery_provider_is_available() {
    let (runtime, remote) = test_runtime();
    let settings = SystemServicesSettings::default();

    let builder = runtime.create_proxy_builder::<DiscoveryServiceProxy>(&settings.domain);
    builder
        .set_messaging_qos(MessagingQos::new(5_000))
        .set_discovery_qos(DiscoveryQos {
            discovery_timeout_ms: 50,
            arbitration_strategy: ArbitrationStrategy::FixedParticipant,
            ..DiscoveryQos::default()
        }.with_custom_parameter(
            DiscoveryQos::FIXED_PARTICIPANT_PARAMETER,
            settings.cc_discovery_provider_participant_id.clone(),
        ));

    let proxy = builder
        .build()
        .expect("provisioned discovery provider must be arbitrated");
    assert_eq!(
        proxy.base().provider_participant_id().as_deref(),
        Some(settings.cc_discovery_provider_participant_id.as_str())
    );
    // Served from the provisioned map, not the remote directory.
    assert_eq!(remote.lookup_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lookup_unknown_interface_returns_empty_result() {
    let (runtime, _remote) = test_runtime();

    let result = runtime
        .discovery_aggregator()
        .lookup_by_interface(
            &["DiscoveryIntegrationTest.Domain.A".to_string()],
            "DiscoveryIntegrationTest.InterfaceName.A",
            &lookup_qos(),
        )
        .expect("lookup must succeed");
    assert!(result.is_empty());
}

#[test]
fn test_add_then_lookup_returns_entry() {
    let (runtime, _remote) = test_runtime();
    let aggregator = runtime.discovery_aggregator();
    let entry = sample_entry();
    let domains = vec![entry.domain.clone()];

    assert!(aggregator
        .lookup_by_interface(&domains, &entry.interface_name, &lookup_qos())
        .expect("lookup")
        .is_empty());

    aggregator.add(entry.clone()).expect("add");

    let result = aggregator
        .lookup_by_interface(&domains, &entry.interface_name, &lookup_qos())
        .expect("lookup");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].entry, entry);
}

#[test]
fn test_add_then_remove_clears_entry() {
    let (runtime, _remote) = test_runtime();
    let aggregator = runtime.discovery_aggregator();
    let entry = sample_entry();
    let domains = vec![entry.domain.clone()];

    aggregator.add(entry.clone()).expect("add");
    aggregator.remove(&entry.participant_id).expect("remove");

    assert!(aggregator
        .lookup_by_interface(&domains, &entry.interface_name, &lookup_qos())
        .expect("lookup")
        .is_empty());
}

#[test]
fn test_in_process_providers_get_in_process_connection_first() {
    let (runtime, _remote) = test_runtime();
    let aggregator = runtime.discovery_aggregator();
    let entry = sample_entry();
    let domains = vec![entry.domain.clone()];

    aggregator.add(entry.clone()).expect("add");
    runtime
        .caller_registry()
        .register_request_caller(&entry.participant_id);

    let result = aggregator
        .lookup_by_interface(&domains, &entry.interface_name, &lookup_qos())
        .expect("lookup");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].entry.connections[0], Connection::InProcess);

    // The annotation also applies to participant lookups.
    let by_id = aggregator
        .lookup_by_participant(&entry.participant_id)
        .expect("lookup by participant");
    assert_eq!(by_id.entry.connections[0], Connection::InProcess);
}

#[test]
fn test_provider_with_keyword_is_arbitrated_by_keyword() {
    let (runtime, _remote) = test_runtime();
    let aggregator = runtime.discovery_aggregator();

    let mut plain = sample_entry();
    plain.participant_id = "plain".to_string();
    let mut tagged = sample_entry();
    tagged.participant_id = "tagged".to_string();
    tagged
        .qos
        .custom_parameters
        .push(CustomParameter::new(DiscoveryQos::KEYWORD_PARAMETER, "sensors"));

    aggregator.add(plain).expect("add");
    aggregator.add(tagged).expect("add");

    struct TestInterfaceProxy {
        base: ProxyBase,
    }
    impl ProxyTarget for TestInterfaceProxy {
        const INTERFACE_NAME: &'static str = "DiscoveryIntegrationTest.InterfaceName.A";
        const MAJOR_VERSION: u32 = 47;
        const MINOR_VERSION: u32 = 11;
        fn from_base(base: ProxyBase) -> Self {
            Self { base }
        }
        fn base(&self) -> &ProxyBase {
            &self.base
        }
    }

    let builder =
        runtime.create_proxy_builder::<TestInterfaceProxy>("DiscoveryIntegrationTest.Domain.A");
    builder.set_discovery_qos(
        DiscoveryQos {
            discovery_timeout_ms: 500,
            retry_interval_ms: 20,
            arbitration_strategy: ArbitrationStrategy::Keyword,
            ..DiscoveryQos::default()
        }
        .with_custom_parameter(DiscoveryQos::KEYWORD_PARAMETER, "sensors"),
    );

    let proxy = builder.build().expect("keyword arbitration");
    assert_eq!(
        proxy.base().provider_participant_id().as_deref(),
        Some("tagged")
    );
}
