// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arbitration worker.
//!
//! Each started arbitrator runs one background thread that repeatedly asks
//! the discovery service for candidates, filters them for compatibility,
//! applies the configured strategy and delivers exactly one terminal
//! callback: the winning entry or a [`DiscoveryError`]. Retries are paced by
//! `retry_interval_ms` and bounded by `discovery_timeout_ms`; a stop signal
//! wakes the worker immediately.

use super::{strategy, Arbitration, ArbitrationError, ArbitrationSuccess};
use crate::config::{DEFAULT_DISCOVERY_RETRY_INTERVAL_MS, DEFAULT_DISCOVERY_TIMEOUT_MS};
use crate::discovery::DiscoverySync;
use crate::error::DiscoveryError;
use crate::qos::{ArbitrationStrategy, DiscoveryQos};
use crate::types::{DiscoveryEntryWithMetaInfo, Version};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::Weak;
use std::thread;
use std::time::{Duration, Instant};

/// Single-attempt arbitrator created by
/// [`create_arbitrator`](super::create_arbitrator).
pub struct Arbitrator {
    domain: String,
    interface_name: String,
    interface_version: Version,
    discovery: Weak<dyn DiscoverySync>,
    qos: DiscoveryQos,
    state: Mutex<WorkerState>,
}

#[derive(Default)]
struct WorkerState {
    started: bool,
    /// Stop requested before the attempt was started.
    stopped_early: bool,
    stop_tx: Option<Sender<()>>,
}

impl Arbitrator {
    pub(super) fn new(
        domain: String,
        interface_name: String,
        interface_version: Version,
        discovery: Weak<dyn DiscoverySync>,
        qos: DiscoveryQos,
    ) -> Self {
        Self {
            domain,
            interface_name,
            interface_version,
            discovery,
            qos,
            state: Mutex::new(WorkerState::default()),
        }
    }
}

impl Arbitration for Arbitrator {
    fn start_arbitration(&self, on_success: ArbitrationSuccess, on_error: ArbitrationError) {
        let (stop_tx, stop_rx) = bounded(1);
        {
            let mut state = self.state.lock();
            if state.started {
                log::warn!(
                    "[arbitrator] ignoring second start for interface {} on domain {}",
                    self.interface_name,
                    self.domain
                );
                return;
            }
            state.started = true;
            if state.stopped_early {
                drop(state);
                on_error(DiscoveryError::new(format!(
                    "arbitration stopped for interface {} on domain {}",
                    self.interface_name, self.domain
                )));
                return;
            }
            state.stop_tx = Some(stop_tx);
        }

        let worker = Worker {
            domain: self.domain.clone(),
            interface_name: self.interface_name.clone(),
            interface_version: self.interface_version,
            discovery: self.discovery.clone(),
            qos: self.qos.clone(),
            stop_rx,
        };
        // Detached on purpose: joining here or in stop_arbitration could
        // deadlock when stop is invoked from inside an arbitration callback.
        thread::spawn(move || worker.run(on_success, on_error));
    }

    fn stop_arbitration(&self) {
        let stop_tx = {
            let mut state = self.state.lock();
            if !state.started {
                state.stopped_early = true;
            }
            state.stop_tx.take()
        };
        if let Some(stop_tx) = stop_tx {
            // A full channel or a finished worker both mean there is nothing
            // left to stop.
            let _ = stop_tx.try_send(());
            log::debug!(
                "[arbitrator] stop requested for interface {} on domain {}",
                self.interface_name,
                self.domain
            );
        }
    }
}

struct Worker {
    domain: String,
    interface_name: String,
    interface_version: Version,
    discovery: Weak<dyn DiscoverySync>,
    qos: DiscoveryQos,
    stop_rx: Receiver<()>,
}

impl Worker {
    fn run(self, on_success: ArbitrationSuccess, on_error: ArbitrationError) {
        let timeout_ms = resolve_interval(self.qos.discovery_timeout_ms, DEFAULT_DISCOVERY_TIMEOUT_MS);
        let retry_ms = resolve_interval(
            self.qos.retry_interval_ms,
            DEFAULT_DISCOVERY_RETRY_INTERVAL_MS,
        );
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let Some(discovery) = self.discovery.upgrade() else {
                on_error(DiscoveryError::new("discovery service no longer available"));
                return;
            };

            match self.attempt(discovery.as_ref()) {
                Attempt::Won(entry) => {
                    log::debug!(
                        "[arbitrator] provider {} arbitrated for interface {} on domain {}",
                        entry.entry.participant_id,
                        self.interface_name,
                        self.domain
                    );
                    on_success(entry);
                    return;
                }
                Attempt::Fatal(error) => {
                    on_error(error);
                    return;
                }
                Attempt::Retry => {}
            }
            drop(discovery);

            let now = Instant::now();
            if now >= deadline {
                on_error(DiscoveryError::new(format!(
                    "no provider found for domain [{}], interface {} (version {}.{}) within discovery timeout of {} ms",
                    self.domain,
                    self.interface_name,
                    self.interface_version.major_version,
                    self.interface_version.minor_version,
                    timeout_ms
                )));
                return;
            }

            let wait = Duration::from_millis(retry_ms).min(deadline - now);
            match self.stop_rx.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    on_error(DiscoveryError::new(format!(
                        "arbitration stopped for interface {} on domain {}",
                        self.interface_name, self.domain
                    )));
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// One lookup round. Lookup failures are retried until the deadline.
    fn attempt(&self, discovery: &dyn DiscoverySync) -> Attempt {
        if self.qos.arbitration_strategy == ArbitrationStrategy::FixedParticipant {
            return self.attempt_fixed_participant(discovery);
        }

        let candidates = match discovery.lookup_by_interface(
            std::slice::from_ref(&self.domain),
            &self.interface_name,
            &self.qos,
        ) {
            Ok(candidates) => candidates,
            Err(status) => {
                log::debug!(
                    "[arbitrator] lookup failed for interface {} on domain {}: {}",
                    self.interface_name,
                    self.domain,
                    status
                );
                return Attempt::Retry;
            }
        };

        let compatible = self.filter_candidates(candidates);
        match strategy::select(self.qos.arbitration_strategy, &self.qos, compatible) {
            Some(winner) => Attempt::Won(winner),
            None => Attempt::Retry,
        }
    }

    fn attempt_fixed_participant(&self, discovery: &dyn DiscoverySync) -> Attempt {
        let Some(participant_id) = self
            .qos
            .custom_parameter(DiscoveryQos::FIXED_PARTICIPANT_PARAMETER)
        else {
            return Attempt::Fatal(DiscoveryError::new(format!(
                "arbitration strategy FixedParticipant requires a {} custom parameter",
                DiscoveryQos::FIXED_PARTICIPANT_PARAMETER
            )));
        };

        match discovery.lookup_by_participant(participant_id) {
            Ok(entry) => {
                let compatible = self.filter_candidates(vec![entry]);
                match compatible.into_iter().next() {
                    Some(winner) => Attempt::Won(winner),
                    None => Attempt::Retry,
                }
            }
            Err(status) => {
                log::debug!(
                    "[arbitrator] participant lookup for {} failed: {}",
                    participant_id,
                    status
                );
                Attempt::Retry
            }
        }
    }

    fn filter_candidates(
        &self,
        candidates: Vec<DiscoveryEntryWithMetaInfo>,
    ) -> Vec<DiscoveryEntryWithMetaInfo> {
        candidates
            .into_iter()
            .filter(|candidate| {
                candidate
                    .entry
                    .provider_version
                    .satisfies(&self.interface_version)
            })
            .filter(|candidate| {
                !self.qos.provider_must_support_on_change
                    || candidate.entry.qos.supports_on_change_subscriptions
            })
            .collect()
    }
}

enum Attempt {
    Won(DiscoveryEntryWithMetaInfo),
    Retry,
    Fatal(DiscoveryError),
}

fn resolve_interval(value: i64, default: i64) -> u64 {
    if value < 0 {
        default.max(0) as u64
    } else {
        value as u64
    }
}
