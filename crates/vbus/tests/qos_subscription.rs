// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::module_name_repetitions)] // Test modules

//! Subscription QoS classification integration tests.
//!
//! Validates the classifier table the publication scheduler relies on:
//! which variants count as on-change, and which parameter each variant
//! contributes as minimum interval, periodic publication interval and alert
//! interval.

use vbus::qos::subscription::{
    alert_after_interval_ms, is_on_change_subscription, min_interval_ms,
    periodic_publication_interval_ms, NO_ALERT_AFTER_INTERVAL, NO_INTERVAL,
};
use vbus::{
    OnChangeSubscriptionQos, OnChangeWithKeepAliveSubscriptionQos, PeriodicSubscriptionQos,
    SubscriptionQos,
};

#[test]
fn test_keep_alive_subscription_classification() {
    let qos = SubscriptionQos::OnChangeWithKeepAlive(OnChangeWithKeepAliveSubscriptionQos::new(
        100, 1_000, 2_000,
    ));

    assert!(is_on_change_subscription(&qos));
    assert_eq!(min_interval_ms(&qos), 100);
    assert_eq!(periodic_publication_interval_ms(&qos), 1_000);
    assert_eq!(alert_after_interval_ms(&qos), 2_000);
}

#[test]
fn test_periodic_subscription_classification() {
    let qos = SubscriptionQos::Periodic(PeriodicSubscriptionQos::new(500, 1_500));

    assert!(!is_on_change_subscription(&qos));
    assert_eq!(min_interval_ms(&qos), NO_INTERVAL);
    assert_eq!(periodic_publication_interval_ms(&qos), 500);
    assert_eq!(alert_after_interval_ms(&qos), 1_500);
}

#[test]
fn test_on_change_subscription_classification() {
    let qos = SubscriptionQos::OnChange(OnChangeSubscriptionQos::new(100));

    assert!(is_on_change_subscription(&qos));
    assert_eq!(min_interval_ms(&qos), 100);
    assert_eq!(periodic_publication_interval_ms(&qos), NO_INTERVAL);
    assert_eq!(alert_after_interval_ms(&qos), NO_INTERVAL);
}

#[test]
fn test_keep_alive_reports_max_interval_not_period() {
    // The keep-alive variant is both on-change and periodic; the periodic
    // publication interval must be its max interval, never -1.
    let qos = SubscriptionQos::OnChangeWithKeepAlive(OnChangeWithKeepAliveSubscriptionQos {
        min_interval_ms: 50,
        max_interval_ms: 750,
        alert_after_interval_ms: NO_ALERT_AFTER_INTERVAL,
    });

    assert!(is_on_change_subscription(&qos));
    assert_eq!(periodic_publication_interval_ms(&qos), 750);
}

#[test]
fn test_defaults_are_classifiable() {
    let on_change = SubscriptionQos::OnChange(OnChangeSubscriptionQos::default());
    let keep_alive =
        SubscriptionQos::OnChangeWithKeepAlive(OnChangeWithKeepAliveSubscriptionQos::default());
    let periodic = SubscriptionQos::Periodic(PeriodicSubscriptionQos::default());

    assert!(is_on_change_subscription(&on_change));
    assert!(is_on_change_subscription(&keep_alive));
    assert!(!is_on_change_subscription(&periodic));

    assert_eq!(alert_after_interval_ms(&on_change), NO_INTERVAL);
    assert_eq!(
        alert_after_interval_ms(&keep_alive),
        NO_ALERT_AFTER_INTERVAL
    );
    assert_eq!(
        alert_after_interval_ms(&periodic),
        NO_ALERT_AFTER_INTERVAL
    );
}
