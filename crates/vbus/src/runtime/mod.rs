// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime facade tying the pipeline together.
//!
//! The [`Runtime`] owns the proxy factory, the local discovery aggregator,
//! the message router handle, the dispatcher address and the in-process
//! request-caller registry. Proxy builders hold it weakly: dropping the last
//! `Arc<Runtime>` makes every in-flight build abort with a discovery error
//! instead of touching destroyed state.

use crate::config::{MessagingSettings, SystemServicesSettings};
use crate::discovery::{DiscoverySync, LocalDiscoveryAggregator};
use crate::proxy::{ProxyBuilder, ProxyFactory, ProxyTarget};
use crate::routing::{Address, MessageRouter, MulticastReceiverDirectory};
use dashmap::DashMap;
use std::sync::{Arc, Weak};

/// Directory of request callers living in this address space.
///
/// The local discovery aggregator consults it to decide whether a discovered
/// provider can be reached in-process.
pub trait RequestCallerDirectory: Send + Sync {
    /// Whether a request caller is registered for `participant_id`.
    fn contains_request_caller(&self, participant_id: &str) -> bool;
}

/// Concurrent registry of in-process request callers.
///
/// Providers registered with the local runtime appear here; lookups are
/// lock-free reads on the sharded map.
#[derive(Default)]
pub struct InProcessCallerRegistry {
    callers: DashMap<String, ()>,
}

impl InProcessCallerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request caller for `participant_id`. Idempotent.
    pub fn register_request_caller(&self, participant_id: &str) {
        log::debug!("[runtime] request caller registered: {}", participant_id);
        self.callers.insert(participant_id.to_string(), ());
    }

    /// Remove the request caller for `participant_id`; returns whether one
    /// was registered.
    pub fn remove_request_caller(&self, participant_id: &str) -> bool {
        self.callers.remove(participant_id).is_some()
    }
}

impl RequestCallerDirectory for InProcessCallerRegistry {
    fn contains_request_caller(&self, participant_id: &str) -> bool {
        self.callers.contains_key(participant_id)
    }
}

/// Enclosing runtime of the proxy binding pipeline.
///
/// Constructed via [`Runtime::builder`]. The runtime is always handled as
/// `Arc<Runtime>`; asynchronous pipeline callbacks upgrade a `Weak` handle
/// and abort when the upgrade fails.
pub struct Runtime {
    messaging_settings: MessagingSettings,
    caller_registry: Arc<InProcessCallerRegistry>,
    discovery_aggregator: Arc<LocalDiscoveryAggregator>,
    message_router: Arc<dyn MessageRouter>,
    dispatcher_address: Address,
    proxy_factory: Arc<ProxyFactory>,
    multicast_receivers: Arc<MulticastReceiverDirectory>,
}

impl Runtime {
    /// Start configuring a runtime around the given message router and
    /// dispatcher address.
    #[must_use]
    pub fn builder(message_router: Arc<dyn MessageRouter>, dispatcher_address: Address) -> RuntimeBuilder {
        RuntimeBuilder {
            message_router,
            dispatcher_address,
            messaging_settings: MessagingSettings::default(),
            system_services_settings: SystemServicesSettings::default(),
        }
    }

    /// Create a builder for a proxy of type `T` on `domain`.
    #[must_use]
    pub fn create_proxy_builder<T: ProxyTarget>(
        self: &Arc<Self>,
        domain: &str,
    ) -> Arc<ProxyBuilder<T>> {
        ProxyBuilder::new(self, domain)
    }

    /// Resolved messaging settings.
    #[must_use]
    pub fn messaging_settings(&self) -> &MessagingSettings {
        &self.messaging_settings
    }

    /// The in-process request-caller registry.
    #[must_use]
    pub fn caller_registry(&self) -> &Arc<InProcessCallerRegistry> {
        &self.caller_registry
    }

    /// The local discovery aggregator fronting the remote discovery service.
    #[must_use]
    pub fn discovery_aggregator(&self) -> &Arc<LocalDiscoveryAggregator> {
        &self.discovery_aggregator
    }

    /// The multicast receiver directory used for publication fanout.
    #[must_use]
    pub fn multicast_receivers(&self) -> &Arc<MulticastReceiverDirectory> {
        &self.multicast_receivers
    }

    pub(crate) fn proxy_factory(&self) -> Arc<ProxyFactory> {
        Arc::clone(&self.proxy_factory)
    }

    pub(crate) fn message_router(&self) -> Arc<dyn MessageRouter> {
        Arc::clone(&self.message_router)
    }

    pub(crate) fn dispatcher_address(&self) -> &Address {
        &self.dispatcher_address
    }

    pub(crate) fn discovery_weak(&self) -> Weak<dyn DiscoverySync> {
        let dyn_arc: Arc<dyn DiscoverySync> = self.discovery_aggregator.clone();
        Arc::downgrade(&dyn_arc)
    }
}

/// Configuration collected before a [`Runtime`] is assembled.
pub struct RuntimeBuilder {
    message_router: Arc<dyn MessageRouter>,
    dispatcher_address: Address,
    messaging_settings: MessagingSettings,
    system_services_settings: SystemServicesSettings,
}

impl RuntimeBuilder {
    /// Override the messaging settings (default: compile-time defaults).
    #[must_use]
    pub fn messaging_settings(mut self, settings: MessagingSettings) -> Self {
        self.messaging_settings = settings;
        self
    }

    /// Override the system-services addressing (default: compile-time
    /// defaults).
    #[must_use]
    pub fn system_services_settings(mut self, settings: SystemServicesSettings) -> Self {
        self.system_services_settings = settings;
        self
    }

    /// Assemble the runtime: wires the caller registry into the local
    /// discovery aggregator and seeds the provisioned system-service
    /// entries.
    #[must_use]
    pub fn build(self) -> Arc<Runtime> {
        let caller_registry = Arc::new(InProcessCallerRegistry::new());
        let discovery_aggregator = Arc::new(LocalDiscoveryAggregator::new(
            caller_registry.clone(),
            &self.system_services_settings,
        ));

        Arc::new(Runtime {
            messaging_settings: self.messaging_settings,
            caller_registry,
            discovery_aggregator,
            message_router: self.message_router,
            dispatcher_address: self.dispatcher_address,
            proxy_factory: Arc::new(ProxyFactory::new()),
            multicast_receivers: Arc::new(MulticastReceiverDirectory::new()),
        })
    }
}
