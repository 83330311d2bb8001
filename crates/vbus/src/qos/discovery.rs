// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy the arbitrator applies to pick one provider among candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbitrationStrategy {
    /// No strategy configured; arbitration falls back to [`Self::LastSeen`].
    NotSet,
    /// Select the provider with the given `"fixedParticipantId"` custom
    /// parameter, bypassing interface lookup.
    FixedParticipant,
    /// Restrict candidates to locally registered providers.
    LocalOnly,
    /// Select a provider whose `"keyword"` custom parameter matches the one
    /// configured on the discovery QoS.
    Keyword,
    /// Select the provider with the highest registered priority.
    HighestPriority,
    /// Select the provider with the most recent liveness signal.
    LastSeen,
}

/// Where discovery looks for candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryScope {
    /// Local directory only.
    LocalOnly,
    /// Local directory first, global only when the local lookup is empty.
    LocalThenGlobal,
    /// Union of local and global results.
    LocalAndGlobal,
    /// Global directory only.
    GlobalOnly,
}

/// Discovery QoS parameterizing provider lookup and arbitration.
///
/// Timeout and retry interval default to [`DiscoveryQos::NO_VALUE`]; the
/// proxy builder substitutes the runtime defaults before arbitration starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryQos {
    /// Deadline for arbitration in milliseconds, or `NO_VALUE`.
    pub discovery_timeout_ms: i64,
    /// Interval between arbitration retries in milliseconds, or `NO_VALUE`.
    pub retry_interval_ms: i64,
    /// Maximum age of cached discovery entries the consumer accepts.
    pub cache_max_age_ms: i64,
    /// Provider selection strategy.
    pub arbitration_strategy: ArbitrationStrategy,
    /// Directory scope of the lookup.
    pub discovery_scope: DiscoveryScope,
    /// Strategy-specific parameters (`"fixedParticipantId"`, `"keyword"`).
    pub custom_parameters: HashMap<String, String>,
    /// Discard providers that cannot serve on-change subscriptions.
    pub provider_must_support_on_change: bool,
}

impl DiscoveryQos {
    /// Sentinel meaning "use the runtime default".
    pub const NO_VALUE: i64 = -1;

    /// Key of the custom parameter consumed by
    /// [`ArbitrationStrategy::FixedParticipant`].
    pub const FIXED_PARTICIPANT_PARAMETER: &'static str = "fixedParticipantId";

    /// Key of the custom parameter consumed by
    /// [`ArbitrationStrategy::Keyword`].
    pub const KEYWORD_PARAMETER: &'static str = "keyword";

    /// Add a strategy-specific parameter; returns `self` for chaining.
    #[must_use]
    pub fn with_custom_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_parameters.insert(name.into(), value.into());
        self
    }

    /// Look up a strategy-specific parameter.
    #[must_use]
    pub fn custom_parameter(&self, name: &str) -> Option<&str> {
        self.custom_parameters.get(name).map(String::as_str)
    }
}

impl Default for DiscoveryQos {
    fn default() -> Self {
        Self {
            discovery_timeout_ms: Self::NO_VALUE,
            retry_interval_ms: Self::NO_VALUE,
            cache_max_age_ms: 0,
            arbitration_strategy: ArbitrationStrategy::LastSeen,
            discovery_scope: DiscoveryScope::LocalThenGlobal,
            custom_parameters: HashMap::new(),
            provider_must_support_on_change: false,
        }
    }
}
