// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Local fast path in front of the remote discovery service.
//!
//! The aggregator serves the same [`DiscoverySync`] interface the remote
//! discovery proxy implements. It answers lookups for provisioned system
//! services from a read-only map installed at construction, forwards
//! everything else, and annotates results with in-process availability so
//! the router can bypass serialization for providers living in the same
//! address space.

use super::{DiscoveryResult, DiscoverySync, RequestStatus};
use crate::config::{DISCOVERY_INTERFACE_NAME, ROUTING_INTERFACE_NAME, SystemServicesSettings};
use crate::qos::DiscoveryQos;
use crate::runtime::RequestCallerDirectory;
use crate::types::{
    Connection, DiscoveryEntry, DiscoveryEntryWithMetaInfo, ProviderQos, Version,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Error description reported when the aggregator is used before a remote
/// discovery proxy has been installed.
const DISCOVERY_PROXY_NOT_SET: &str =
    "discoveryProxy not set. Couldn't reach local capabilities directory.";

/// Interface version announced for the provisioned system services.
const SYSTEM_SERVICES_VERSION: Version = Version {
    major_version: 1,
    minor_version: 0,
};

/// Caching/fan-in front-end over the remote discovery service.
///
/// # Provisioned entries
///
/// The discovery and routing providers must be resolvable before any remote
/// communication works, so their entries are seeded at construction from
/// [`SystemServicesSettings`] and served without contacting the remote
/// proxy. The provisioned map is read-only after construction; user `add`s
/// are never merged into it, which prevents silent shadowing of the
/// discovery service itself.
///
/// # Remote proxy installation
///
/// The remote proxy pointer is single-writer: it is installed once via
/// [`set_discovery_proxy`](Self::set_discovery_proxy) before first use.
/// Operations invoked earlier fail with an ERROR status.
pub struct LocalDiscoveryAggregator {
    /// Remote discovery proxy; `None` until installed.
    discovery_proxy: RwLock<Option<Arc<dyn DiscoverySync>>>,
    /// Directory of request callers living in this address space.
    request_caller_directory: Arc<dyn RequestCallerDirectory>,
    /// participant id -> provisioned entry. Frozen at construction.
    provisioned_entries: HashMap<String, DiscoveryEntry>,
}

impl LocalDiscoveryAggregator {
    /// Create an aggregator with provisioned entries for the system services
    /// named by `settings`.
    #[must_use]
    pub fn new(
        request_caller_directory: Arc<dyn RequestCallerDirectory>,
        settings: &SystemServicesSettings,
    ) -> Self {
        let mut provisioned_entries = HashMap::new();

        let routing_entry = provisioned_entry(
            &settings.domain,
            ROUTING_INTERFACE_NAME,
            &settings.cc_routing_provider_participant_id,
        );
        provisioned_entries.insert(routing_entry.participant_id.clone(), routing_entry);

        let discovery_entry = provisioned_entry(
            &settings.domain,
            DISCOVERY_INTERFACE_NAME,
            &settings.cc_discovery_provider_participant_id,
        );
        provisioned_entries.insert(discovery_entry.participant_id.clone(), discovery_entry);

        Self {
            discovery_proxy: RwLock::new(None),
            request_caller_directory,
            provisioned_entries,
        }
    }

    /// Install the remote discovery proxy. Expected to happen exactly once,
    /// before the first discovery operation.
    pub fn set_discovery_proxy(&self, proxy: Arc<dyn DiscoverySync>) {
        let mut slot = self.discovery_proxy.write();
        if slot.is_some() {
            log::warn!("[aggregator] replacing an already installed discovery proxy");
        }
        *slot = Some(proxy);
    }

    /// Whether `participant_id` names a provisioned system service.
    #[must_use]
    pub fn is_provisioned(&self, participant_id: &str) -> bool {
        self.provisioned_entries.contains_key(participant_id)
    }

    fn remote(&self) -> DiscoveryResult<Arc<dyn DiscoverySync>> {
        self.discovery_proxy
            .read()
            .clone()
            .ok_or_else(|| RequestStatus::error(DISCOVERY_PROXY_NOT_SET))
    }

    /// Prepend the in-process tag when the participant is served by a
    /// request caller in this address space.
    fn annotate_in_process(&self, entry: &mut DiscoveryEntry) {
        if self
            .request_caller_directory
            .contains_request_caller(&entry.participant_id)
        {
            entry.prefer_connection(Connection::InProcess);
        }
    }
}

impl DiscoverySync for LocalDiscoveryAggregator {
    fn add(&self, entry: DiscoveryEntry) -> DiscoveryResult<()> {
        self.remote()?.add(entry)
    }

    fn lookup_by_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        qos: &DiscoveryQos,
    ) -> DiscoveryResult<Vec<DiscoveryEntryWithMetaInfo>> {
        let mut result = self
            .remote()?
            .lookup_by_interface(domains, interface_name, qos)?;
        for entry in &mut result {
            self.annotate_in_process(&mut entry.entry);
        }
        Ok(result)
    }

    fn lookup_by_participant(
        &self,
        participant_id: &str,
    ) -> DiscoveryResult<DiscoveryEntryWithMetaInfo> {
        let mut result = match self.provisioned_entries.get(participant_id) {
            Some(entry) => {
                log::debug!(
                    "[aggregator] serving provisioned entry for participant {}",
                    participant_id
                );
                DiscoveryEntryWithMetaInfo::new(entry.clone(), true)
            }
            None => self.remote()?.lookup_by_participant(participant_id)?,
        };
        self.annotate_in_process(&mut result.entry);
        Ok(result)
    }

    fn remove(&self, participant_id: &str) -> DiscoveryResult<()> {
        // Provisioned entries are never removable; the forward below cannot
        // touch them because they only live in the local map.
        self.remote()?.remove(participant_id)
    }
}

fn provisioned_entry(domain: &str, interface_name: &str, participant_id: &str) -> DiscoveryEntry {
    DiscoveryEntry {
        provider_version: SYSTEM_SERVICES_VERSION,
        domain: domain.to_string(),
        interface_name: interface_name.to_string(),
        participant_id: participant_id.to_string(),
        qos: ProviderQos::default(),
        last_seen_date_ms: -1,
        expiry_date_ms: i64::MAX,
        public_key_id: String::new(),
        connections: vec![Connection::LocalBus],
    }
}
