// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types surfaced by the proxy binding pipeline.

use std::fmt;

/// Error reported when provider discovery or proxy binding fails.
///
/// This is the single error type delivered through the proxy builder's
/// `on_error` path. The message is human-readable and names the failing
/// stage (arbitration, lifetime, routing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryError {
    message: String,
}

impl DiscoveryError {
    /// Create a discovery error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "discovery error: {}", self.message)
    }
}

impl std::error::Error for DiscoveryError {}

/// Error reported by a provider-side runtime, e.g. when the message router
/// rejects a route registration.
///
/// The proxy builder wraps this into a [`DiscoveryError`] before handing it
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRuntimeError {
    message: String,
}

impl ProviderRuntimeError {
    /// Create a provider runtime error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderRuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider runtime error: {}", self.message)
    }
}

impl std::error::Error for ProviderRuntimeError {}
