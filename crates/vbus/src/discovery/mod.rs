// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery interface and the local aggregator serving it.
//!
//! The [`DiscoverySync`] trait is the synchronous discovery surface: it is
//! implemented both by the remote discovery proxy (out of scope, consumed
//! through the trait) and by the [`LocalDiscoveryAggregator`] that fronts it
//! inside every runtime.

mod aggregator;

pub use aggregator::LocalDiscoveryAggregator;

use crate::qos::DiscoveryQos;
use crate::types::{DiscoveryEntry, DiscoveryEntryWithMetaInfo};
use std::fmt;

/// Outcome code of a discovery operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatusCode {
    Ok,
    Error,
}

/// Status of a discovery operation: a code plus human-readable descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStatus {
    code: RequestStatusCode,
    descriptions: Vec<String>,
}

impl RequestStatus {
    /// A successful status without descriptions.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: RequestStatusCode::Ok,
            descriptions: Vec::new(),
        }
    }

    /// An error status carrying one description.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            code: RequestStatusCode::Error,
            descriptions: vec![description.into()],
        }
    }

    #[must_use]
    pub fn code(&self) -> RequestStatusCode {
        self.code
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == RequestStatusCode::Ok
    }

    /// Append a description to the status.
    pub fn add_description(&mut self, description: impl Into<String>) {
        self.descriptions.push(description.into());
    }

    #[must_use]
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            RequestStatusCode::Ok => write!(f, "OK"),
            RequestStatusCode::Error => {
                write!(f, "ERROR")?;
                for description in &self.descriptions {
                    write!(f, ": {}", description)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RequestStatus {}

/// Result alias for discovery operations. `Ok` implies status code OK; the
/// `Err` side is the ERROR status with its descriptions.
pub type DiscoveryResult<T> = Result<T, RequestStatus>;

/// Synchronous discovery interface.
///
/// Served by the local aggregator and consumed from the remote discovery
/// proxy. Implementations must be safe to call from arbitration worker
/// threads.
pub trait DiscoverySync: Send + Sync {
    /// Register a provider entry with the discovery service.
    fn add(&self, entry: DiscoveryEntry) -> DiscoveryResult<()>;

    /// Look up all providers registered for the given domains and interface.
    fn lookup_by_interface(
        &self,
        domains: &[String],
        interface_name: &str,
        qos: &DiscoveryQos,
    ) -> DiscoveryResult<Vec<DiscoveryEntryWithMetaInfo>>;

    /// Look up a single provider by its participant id.
    fn lookup_by_participant(
        &self,
        participant_id: &str,
    ) -> DiscoveryResult<DiscoveryEntryWithMetaInfo>;

    /// Remove a provider registration.
    fn remove(&self, participant_id: &str) -> DiscoveryResult<()>;
}
