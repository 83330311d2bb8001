// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Consumer-side proxies.
//!
//! A proxy is the local stand-in for a remote provider. Generated proxy
//! types implement [`ProxyTarget`] and embed a [`ProxyBase`] that carries
//! the binding state: the proxy's own participant id, the domain, the
//! messaging QoS and, once arbitration finished, the provider entry all
//! invocations are routed to.

mod builder;

pub use builder::ProxyBuilder;

use crate::qos::MessagingQos;
use crate::runtime::Runtime;
use crate::types::DiscoveryEntryWithMetaInfo;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Binding state embedded in every proxy.
#[derive(Debug)]
pub struct ProxyBase {
    runtime: Weak<Runtime>,
    domain: String,
    messaging_qos: MessagingQos,
    proxy_participant_id: String,
    /// Provider entry installed by `handle_arbitration_finished`.
    provider: RwLock<Option<DiscoveryEntryWithMetaInfo>>,
}

impl ProxyBase {
    /// The proxy's own participant id on the routing graph.
    #[must_use]
    pub fn proxy_participant_id(&self) -> &str {
        &self.proxy_participant_id
    }

    /// Domain this proxy was built for.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Messaging QoS applied to invocations through this proxy.
    #[must_use]
    pub fn messaging_qos(&self) -> MessagingQos {
        self.messaging_qos
    }

    /// Handle to the enclosing runtime; upgrade fails once the runtime is
    /// destroyed.
    #[must_use]
    pub fn runtime(&self) -> Weak<Runtime> {
        self.runtime.clone()
    }

    /// Install the arbitrated provider entry. Subsequent invocations route
    /// to this provider's participant id.
    pub fn handle_arbitration_finished(&self, entry: DiscoveryEntryWithMetaInfo) {
        log::debug!(
            "[proxy] {} bound to provider {}",
            self.proxy_participant_id,
            entry.entry.participant_id
        );
        *self.provider.write() = Some(entry);
    }

    /// Participant id of the bound provider, `None` before arbitration.
    #[must_use]
    pub fn provider_participant_id(&self) -> Option<String> {
        self.provider
            .read()
            .as_ref()
            .map(|entry| entry.entry.participant_id.clone())
    }

    /// Whether arbitration has installed a provider.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.provider.read().is_some()
    }
}

/// Contract implemented by generated proxy types.
///
/// The associated constants describe the interface the proxy speaks; the
/// builder matches them against provider versions during arbitration.
pub trait ProxyTarget: Send + Sync + Sized + 'static {
    /// Fully qualified interface name.
    const INTERFACE_NAME: &'static str;
    /// Major interface version requested from providers.
    const MAJOR_VERSION: u32;
    /// Minor interface version requested from providers.
    const MINOR_VERSION: u32;

    /// Wrap the binding state produced by the proxy factory.
    fn from_base(base: ProxyBase) -> Self;

    /// Access the embedded binding state.
    fn base(&self) -> &ProxyBase;
}

/// Factory creating proxies bound to a runtime.
///
/// Performs no I/O; it only assembles the binding state and assigns the
/// proxy participant id.
pub struct ProxyFactory {
    sequence: AtomicU64,
}

impl ProxyFactory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sequence: AtomicU64::new(1),
        }
    }

    /// Create a proxy of type `T` for `domain`, bound to `runtime`.
    #[must_use]
    pub fn create_proxy<T: ProxyTarget>(
        &self,
        runtime: &Arc<Runtime>,
        domain: &str,
        messaging_qos: MessagingQos,
    ) -> Arc<T> {
        let base = ProxyBase {
            runtime: Arc::downgrade(runtime),
            domain: domain.to_string(),
            messaging_qos,
            proxy_participant_id: self.next_participant_id(),
            provider: RwLock::new(None),
        };
        Arc::new(T::from_base(base))
    }

    /// Generate a participant id unique within this process lifetime.
    ///
    /// Combines the creation timestamp with a process-wide sequence number;
    /// uniqueness across processes comes from the timestamp entropy, the
    /// same scheme the transport session ids use.
    fn next_participant_id(&self) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("proxy-{:016x}-{:06x}", nanos, sequence)
    }
}

impl Default for ProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_ids_are_unique() {
        let factory = ProxyFactory::new();
        let first = factory.next_participant_id();
        let second = factory.next_participant_id();
        assert_ne!(first, second);
        assert!(first.starts_with("proxy-"));
    }
}
