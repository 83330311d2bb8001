// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pure provider selection functions.
//!
//! Each strategy reduces a candidate list to at most one winner. Candidates
//! have already been filtered for interface version compatibility and
//! on-change support by the arbitrator.

use crate::qos::{ArbitrationStrategy, DiscoveryQos};
use crate::types::DiscoveryEntryWithMetaInfo;

/// Apply `strategy` to `candidates`, returning the winning entry.
pub(crate) fn select(
    strategy: ArbitrationStrategy,
    qos: &DiscoveryQos,
    candidates: Vec<DiscoveryEntryWithMetaInfo>,
) -> Option<DiscoveryEntryWithMetaInfo> {
    match strategy {
        ArbitrationStrategy::LastSeen | ArbitrationStrategy::NotSet => last_seen(candidates),
        ArbitrationStrategy::HighestPriority => highest_priority(candidates),
        ArbitrationStrategy::Keyword => {
            keyword(qos.custom_parameter(DiscoveryQos::KEYWORD_PARAMETER), candidates)
        }
        ArbitrationStrategy::LocalOnly => local_only(candidates),
        // FixedParticipant is resolved by participant lookup before strategy
        // selection; a candidate reaching this point already matches.
        ArbitrationStrategy::FixedParticipant => candidates.into_iter().next(),
    }
}

/// The provider with the most recent liveness signal wins.
fn last_seen(candidates: Vec<DiscoveryEntryWithMetaInfo>) -> Option<DiscoveryEntryWithMetaInfo> {
    candidates
        .into_iter()
        .max_by_key(|candidate| candidate.entry.last_seen_date_ms)
}

/// The provider with the highest registered priority wins. Entries with a
/// negative priority never win against a non-negative one.
fn highest_priority(
    candidates: Vec<DiscoveryEntryWithMetaInfo>,
) -> Option<DiscoveryEntryWithMetaInfo> {
    candidates
        .into_iter()
        .max_by_key(|candidate| candidate.entry.qos.priority)
}

/// The first provider whose `"keyword"` custom parameter equals the
/// requested keyword wins. No keyword configured means no winner.
fn keyword(
    requested: Option<&str>,
    candidates: Vec<DiscoveryEntryWithMetaInfo>,
) -> Option<DiscoveryEntryWithMetaInfo> {
    let requested = requested?;
    candidates.into_iter().find(|candidate| {
        candidate.entry.qos.custom_parameter(DiscoveryQos::KEYWORD_PARAMETER) == Some(requested)
    })
}

/// The most recently seen locally registered provider wins.
fn local_only(candidates: Vec<DiscoveryEntryWithMetaInfo>) -> Option<DiscoveryEntryWithMetaInfo> {
    last_seen(
        candidates
            .into_iter()
            .filter(|candidate| candidate.is_local)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Connection, CustomParameter, DiscoveryEntry, ProviderQos, ProviderScope, Version,
    };

    fn candidate(
        participant_id: &str,
        last_seen_date_ms: i64,
        priority: i64,
        is_local: bool,
    ) -> DiscoveryEntryWithMetaInfo {
        DiscoveryEntryWithMetaInfo::new(
            DiscoveryEntry {
                provider_version: Version::new(1, 0),
                domain: "d".to_string(),
                interface_name: "i".to_string(),
                participant_id: participant_id.to_string(),
                qos: ProviderQos {
                    custom_parameters: Vec::new(),
                    priority,
                    scope: ProviderScope::Global,
                    supports_on_change_subscriptions: false,
                },
                last_seen_date_ms,
                expiry_date_ms: -1,
                public_key_id: String::new(),
                connections: vec![Connection::LocalBus],
            },
            is_local,
        )
    }

    #[test]
    fn test_last_seen_picks_most_recent() {
        let winner = select(
            ArbitrationStrategy::LastSeen,
            &DiscoveryQos::default(),
            vec![
                candidate("old", 100, 0, false),
                candidate("new", 300, 0, false),
                candidate("mid", 200, 0, false),
            ],
        )
        .expect("winner");
        assert_eq!(winner.entry.participant_id, "new");
    }

    #[test]
    fn test_last_seen_empty_candidates() {
        assert!(select(
            ArbitrationStrategy::LastSeen,
            &DiscoveryQos::default(),
            Vec::new()
        )
        .is_none());
    }

    #[test]
    fn test_not_set_falls_back_to_last_seen() {
        let winner = select(
            ArbitrationStrategy::NotSet,
            &DiscoveryQos::default(),
            vec![candidate("a", 1, 0, false), candidate("b", 2, 0, false)],
        )
        .expect("winner");
        assert_eq!(winner.entry.participant_id, "b");
    }

    #[test]
    fn test_highest_priority_picks_maximum() {
        let winner = select(
            ArbitrationStrategy::HighestPriority,
            &DiscoveryQos::default(),
            vec![
                candidate("low", 0, 1, false),
                candidate("high", 0, 9, false),
                candidate("default", 0, -1, false),
            ],
        )
        .expect("winner");
        assert_eq!(winner.entry.participant_id, "high");
    }

    #[test]
    fn test_keyword_matches_provider_parameter() {
        let mut tagged = candidate("tagged", 0, 0, false);
        tagged
            .entry
            .qos
            .custom_parameters
            .push(CustomParameter::new(DiscoveryQos::KEYWORD_PARAMETER, "sensors"));

        let qos = DiscoveryQos::default()
            .with_custom_parameter(DiscoveryQos::KEYWORD_PARAMETER, "sensors");
        let winner = select(
            ArbitrationStrategy::Keyword,
            &qos,
            vec![candidate("plain", 0, 0, false), tagged],
        )
        .expect("winner");
        assert_eq!(winner.entry.participant_id, "tagged");
    }

    #[test]
    fn test_keyword_without_configured_keyword() {
        assert!(select(
            ArbitrationStrategy::Keyword,
            &DiscoveryQos::default(),
            vec![candidate("plain", 0, 0, false)],
        )
        .is_none());
    }

    #[test]
    fn test_local_only_ignores_remote_candidates() {
        let winner = select(
            ArbitrationStrategy::LocalOnly,
            &DiscoveryQos::default(),
            vec![
                candidate("remote", 500, 0, false),
                candidate("local", 100, 0, true),
            ],
        )
        .expect("winner");
        assert_eq!(winner.entry.participant_id, "local");

        assert!(select(
            ArbitrationStrategy::LocalOnly,
            &DiscoveryQos::default(),
            vec![candidate("remote", 500, 0, false)],
        )
        .is_none());
    }
}
