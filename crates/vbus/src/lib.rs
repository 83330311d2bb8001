// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # VBUS - Logical-Addressing Communication Middleware
//!
//! Consumer-side binding pipeline for a distributed middleware in which
//! proxies invoke operations on providers addressed by logical identifiers
//! (domain + interface) rather than network endpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vbus::{DiscoveryQos, MessagingQos, Runtime};
//!
//! let runtime = Runtime::builder(message_router, dispatcher_address).build();
//!
//! let builder = runtime.create_proxy_builder::<RadioProxy>("radio.domain");
//! builder
//!     .set_messaging_qos(MessagingQos::new(5_000))
//!     .set_discovery_qos(DiscoveryQos::default());
//! let proxy = builder.build()?;
//! # Ok::<(), vbus::DiscoveryError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                          Consumer Code                             |
//! |        Runtime -> ProxyBuilder<T> -> typed proxy instance          |
//! +--------------------------------------------------------------------+
//! |                       Binding Pipeline                             |
//! |   Arbitrator (strategy, retry) | ProxyFactory | route registration |
//! +--------------------------------------------------------------------+
//! |                      Local Directories                             |
//! |   LocalDiscoveryAggregator | MulticastReceiverDirectory | callers  |
//! +--------------------------------------------------------------------+
//! |                  Surrounding Runtime (external)                    |
//! |      MessageRouter | remote DiscoverySync proxy | transports       |
//! +--------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Runtime`] | Entry point; owns the directories and the proxy factory |
//! | [`ProxyBuilder`] | Arbitrates a provider and binds a typed proxy to it |
//! | [`LocalDiscoveryAggregator`] | Local fast path over the remote discovery service |
//! | [`MulticastReceiverDirectory`] | Publication fanout registry |
//! | [`SubscriptionQos`] | Closed union of subscription QoS shapes |
//!
//! ## Modules Overview
//!
//! - [`runtime`] - Runtime facade and request-caller registry (start here)
//! - [`proxy`] - Proxy builder, factory and binding state
//! - [`arbitration`] - Provider selection strategies and the arbitration worker
//! - [`discovery`] - Discovery interface and the local aggregator
//! - [`routing`] - Message router contract and multicast fanout directory
//! - [`qos`] - Messaging, discovery and subscription QoS

/// Provider arbitration (strategies, worker, contract).
pub mod arbitration;
/// Global configuration (runtime-wide defaults, settings structs).
pub mod config;
/// Discovery interface and the local discovery aggregator.
pub mod discovery;
/// Error types of the binding pipeline.
pub mod error;
/// Consumer-side proxies: builder, factory, binding state.
pub mod proxy;
/// Quality-of-service policies (messaging, discovery, subscription).
pub mod qos;
/// Routing contracts and the multicast receiver directory.
pub mod routing;
/// Runtime facade and in-process request-caller registry.
pub mod runtime;
/// Discovery data model (entries, versions, provider QoS).
pub mod types;

pub use config::{MessagingSettings, SystemServicesSettings};
pub use discovery::{
    DiscoveryResult, DiscoverySync, LocalDiscoveryAggregator, RequestStatus, RequestStatusCode,
};
pub use error::{DiscoveryError, ProviderRuntimeError};
pub use proxy::{ProxyBase, ProxyBuilder, ProxyFactory, ProxyTarget};
pub use qos::{
    ArbitrationStrategy, DiscoveryQos, DiscoveryScope, MessagingQos, OnChangeSubscriptionQos,
    OnChangeWithKeepAliveSubscriptionQos, PeriodicSubscriptionQos, SubscriptionQos,
};
pub use routing::{Address, MessageRouter, MulticastReceiverDirectory};
pub use runtime::{InProcessCallerRegistry, RequestCallerDirectory, Runtime};
pub use types::{
    Connection, CustomParameter, DiscoveryEntry, DiscoveryEntryWithMetaInfo, ProviderQos,
    ProviderScope, Version,
};
