// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Proxy construction and binding.
//!
//! The builder orchestrates one pipeline per build attempt:
//! arbitration -> proxy creation -> route registration -> caller callback.
//! Arbitration runs on its own worker thread; the builder re-checks runtime
//! liveness at every callback entry and aborts with a discovery error when
//! the enclosing runtime has been destroyed.

use super::{ProxyFactory, ProxyTarget};
use crate::arbitration::{self, Arbitration, ArbitrationError, ArbitrationSuccess};
use crate::discovery::DiscoverySync;
use crate::error::DiscoveryError;
use crate::qos::{DiscoveryQos, MessagingQos};
use crate::routing::{Address, MessageRouter};
use crate::runtime::Runtime;
use crate::types::{DiscoveryEntryWithMetaInfo, Version};
use crossbeam::channel::bounded;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// Error message used whenever a callback finds the enclosing runtime gone.
const RUNTIME_ALREADY_DESTROYED: &str = "runtime already destroyed";

/// Builder for a typed proxy bound to an arbitrated provider.
///
/// Obtained from [`Runtime::create_proxy_builder`]. QoS setters may be
/// chained before `build`/`build_async`; each build call starts an
/// independent arbitration attempt. [`stop`](Self::stop) cancels every
/// attempt still in flight and makes the builder terminal.
pub struct ProxyBuilder<T: ProxyTarget> {
    /// Handle to this builder, taken by arbitration callbacks so a stopped
    /// and dropped builder does not keep itself alive.
    weak_self: Weak<ProxyBuilder<T>>,
    runtime: Weak<Runtime>,
    domain: String,
    proxy_factory: Arc<ProxyFactory>,
    discovery: Weak<dyn DiscoverySync>,
    message_router: Arc<dyn MessageRouter>,
    dispatcher_address: Address,
    messaging_maximum_ttl_ms: u64,
    discovery_default_timeout_ms: i64,
    discovery_default_retry_interval_ms: i64,
    config: Mutex<BuilderConfig>,
    state: Mutex<BuilderState>,
    _proxy_type: PhantomData<fn() -> T>,
}

struct BuilderConfig {
    messaging_qos: MessagingQos,
    discovery_qos: DiscoveryQos,
}

#[derive(Default)]
struct BuilderState {
    arbitrators: Vec<Arc<dyn Arbitration>>,
    shutting_down: bool,
}

impl<T: ProxyTarget> ProxyBuilder<T> {
    pub(crate) fn new(runtime: &Arc<Runtime>, domain: &str) -> Arc<Self> {
        let settings = runtime.messaging_settings();
        let discovery_qos = DiscoveryQos {
            discovery_timeout_ms: settings.discovery_default_timeout_ms,
            retry_interval_ms: settings.discovery_default_retry_interval_ms,
            ..DiscoveryQos::default()
        };

        Arc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            runtime: Arc::downgrade(runtime),
            domain: domain.to_string(),
            proxy_factory: runtime.proxy_factory(),
            discovery: runtime.discovery_weak(),
            message_router: runtime.message_router(),
            dispatcher_address: runtime.dispatcher_address().clone(),
            messaging_maximum_ttl_ms: settings.maximum_ttl_ms,
            discovery_default_timeout_ms: settings.discovery_default_timeout_ms,
            discovery_default_retry_interval_ms: settings.discovery_default_retry_interval_ms,
            config: Mutex::new(BuilderConfig {
                messaging_qos: MessagingQos::default(),
                discovery_qos,
            }),
            state: Mutex::new(BuilderState::default()),
            _proxy_type: PhantomData,
        })
    }

    /// Set the messaging QoS for proxies built by this builder.
    ///
    /// A TTL above the runtime-wide maximum is silently clamped.
    pub fn set_messaging_qos(&self, messaging_qos: MessagingQos) -> &Self {
        let mut messaging_qos = messaging_qos;
        if messaging_qos.clamp_ttl(self.messaging_maximum_ttl_ms) {
            log::debug!(
                "[builder] messaging ttl clamped to maximum of {} ms",
                self.messaging_maximum_ttl_ms
            );
        }
        self.config.lock().messaging_qos = messaging_qos;
        self
    }

    /// Set the discovery QoS for subsequent build attempts.
    ///
    /// `NO_VALUE` timeout and retry interval are replaced by the runtime
    /// defaults.
    pub fn set_discovery_qos(&self, discovery_qos: DiscoveryQos) -> &Self {
        let mut discovery_qos = discovery_qos;
        if discovery_qos.discovery_timeout_ms == DiscoveryQos::NO_VALUE {
            discovery_qos.discovery_timeout_ms = self.discovery_default_timeout_ms;
        }
        if discovery_qos.retry_interval_ms == DiscoveryQos::NO_VALUE {
            discovery_qos.retry_interval_ms = self.discovery_default_retry_interval_ms;
        }
        self.config.lock().discovery_qos = discovery_qos;
        self
    }

    /// Build the proxy, suspending the calling thread until the asynchronous
    /// pipeline delivers its result.
    pub fn build(&self) -> Result<Arc<T>, DiscoveryError> {
        let (result_tx, result_rx) = bounded(1);
        let error_tx = result_tx.clone();
        self.build_async(
            move |proxy| {
                let _ = result_tx.send(Ok(proxy));
            },
            move |error| {
                let _ = error_tx.send(Err(error));
            },
        );
        match result_rx.recv() {
            Ok(result) => result,
            // Both senders dropped without a send: the arbitration worker
            // died. Surface it instead of hanging.
            Err(_) => Err(DiscoveryError::new(
                "proxy build terminated without a result",
            )),
        }
    }

    /// Build the proxy asynchronously.
    ///
    /// Starts one arbitration attempt. Exactly one of the callbacks is
    /// invoked, on the thread that delivers the arbitration outcome.
    pub fn build_async(
        &self,
        on_success: impl FnOnce(Arc<T>) + Send + 'static,
        on_error: impl FnOnce(DiscoveryError) + Send + 'static,
    ) {
        let completion = Completion::new(on_success, on_error);

        let runtime_alive = self.runtime.upgrade().is_some();
        let (messaging_qos, discovery_qos) = {
            let config = self.config.lock();
            (config.messaging_qos, config.discovery_qos.clone())
        };

        let arbitrator: Arc<dyn Arbitration> = {
            let mut state = self.state.lock();
            if !runtime_alive || state.shutting_down {
                drop(state);
                completion.fail(DiscoveryError::new(RUNTIME_ALREADY_DESTROYED));
                return;
            }
            let interface_version = Version::new(T::MAJOR_VERSION, T::MINOR_VERSION);
            let arbitrator = arbitration::create_arbitrator(
                self.domain.clone(),
                T::INTERFACE_NAME,
                interface_version,
                self.discovery.clone(),
                discovery_qos,
            );
            state.arbitrators.push(arbitrator.clone());
            arbitrator
        };

        let weak_builder = self.weak_self.clone();
        let success_completion = completion.clone();
        let on_entry: ArbitrationSuccess = Box::new(move |entry| {
            match weak_builder.upgrade() {
                Some(builder) => {
                    builder.on_arbitration_success(entry, messaging_qos, success_completion);
                }
                None => {
                    success_completion.fail(DiscoveryError::new(RUNTIME_ALREADY_DESTROYED));
                }
            }
        });
        let on_failure: ArbitrationError = Box::new(move |error| completion.fail(error));

        arbitrator.start_arbitration(on_entry, on_failure);
    }

    /// Cancel every in-flight arbitration and make the builder terminal.
    ///
    /// Idempotent. Route registrations already handed to the message router
    /// are not cancelled.
    pub fn stop(&self) {
        let arbitrators = {
            let mut state = self.state.lock();
            state.shutting_down = true;
            std::mem::take(&mut state.arbitrators)
        };
        log::debug!(
            "[builder] stopping {} arbitrator(s) for interface {} on domain {}",
            arbitrators.len(),
            T::INTERFACE_NAME,
            self.domain
        );
        for arbitrator in arbitrators {
            arbitrator.stop_arbitration();
        }
    }

    /// Continue the pipeline after arbitration delivered a provider entry:
    /// create the proxy, install the entry, register the route.
    fn on_arbitration_success(
        &self,
        entry: DiscoveryEntryWithMetaInfo,
        messaging_qos: MessagingQos,
        completion: Completion<T>,
    ) {
        let Some(runtime) = self.runtime.upgrade() else {
            completion.fail(DiscoveryError::new(RUNTIME_ALREADY_DESTROYED));
            return;
        };

        if entry.entry.participant_id.is_empty() {
            completion.fail(DiscoveryError::new(
                "arbitration reported success with empty participantId",
            ));
            return;
        }

        let proxy: Arc<T> = self
            .proxy_factory
            .create_proxy(&runtime, &self.domain, messaging_qos);
        proxy.base().handle_arbitration_finished(entry.clone());

        log::info!(
            "[builder] proxy {} created for provider {} on domain [{}], interface {}",
            proxy.base().proxy_participant_id(),
            entry.entry.participant_id,
            self.domain,
            T::INTERFACE_NAME
        );

        let is_globally_visible = !entry.is_local;
        self.message_router.set_to_known(&entry.entry.participant_id);

        let success_completion = completion.clone();
        let routed_proxy = proxy.clone();
        self.message_router.add_next_hop(
            proxy.base().proxy_participant_id(),
            &self.dispatcher_address,
            is_globally_visible,
            i64::MAX,
            false,
            Box::new(move || success_completion.succeed(routed_proxy)),
            Box::new(move |router_error| {
                completion.fail(DiscoveryError::new(format!(
                    "proxy could not be added to parent router: {}",
                    router_error.message()
                )));
            }),
        );
    }
}

/// One-shot callback pair shared between the pipeline stages.
///
/// The arbitrator guarantees an exactly-once terminal callback; this holder
/// additionally makes the success/error split race-free when the router
/// completes asynchronously.
struct Completion<T: ProxyTarget> {
    callbacks: Arc<Mutex<Option<Callbacks<T>>>>,
}

struct Callbacks<T: ProxyTarget> {
    on_success: Box<dyn FnOnce(Arc<T>) + Send>,
    on_error: Box<dyn FnOnce(DiscoveryError) + Send>,
}

impl<T: ProxyTarget> Completion<T> {
    fn new(
        on_success: impl FnOnce(Arc<T>) + Send + 'static,
        on_error: impl FnOnce(DiscoveryError) + Send + 'static,
    ) -> Self {
        Self {
            callbacks: Arc::new(Mutex::new(Some(Callbacks {
                on_success: Box::new(on_success),
                on_error: Box::new(on_error),
            }))),
        }
    }

    fn succeed(&self, proxy: Arc<T>) {
        if let Some(callbacks) = self.callbacks.lock().take() {
            (callbacks.on_success)(proxy);
        }
    }

    fn fail(&self, error: DiscoveryError) {
        if let Some(callbacks) = self.callbacks.lock().take() {
            log::debug!("[builder] proxy build failed: {}", error.message());
            (callbacks.on_error)(error);
        }
    }
}

impl<T: ProxyTarget> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            callbacks: Arc::clone(&self.callbacks),
        }
    }
}
