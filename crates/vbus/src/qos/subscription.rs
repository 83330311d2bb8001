// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscription QoS variants and classification.
//!
//! Attribute and broadcast subscriptions carry one of three QoS shapes:
//! change-driven, change-driven with a keep-alive ceiling, or purely
//! periodic. The publication scheduler upstream does not branch on the
//! concrete shape; it asks the classifier functions below for the three
//! parameters it needs (minimum interval, periodic publication interval,
//! alert interval).
//!
//! The union is closed. Classifiers match exhaustively, so adding a variant
//! without teaching the classifiers about it is a compile-time error. The
//! keep-alive variant satisfies both the on-change and the periodic
//! classification; every classifier therefore matches it first so its
//! `max_interval_ms` is reported as the periodic publication interval.

use serde::{Deserialize, Serialize};

/// Value returned by classifiers for parameters a variant does not carry.
pub const NO_INTERVAL: i64 = -1;

/// `alert_after_interval_ms` value meaning "never alert".
pub const NO_ALERT_AFTER_INTERVAL: i64 = 0;

/// Smallest accepted keep-alive / publication interval (milliseconds).
pub const MIN_INTERVAL_FLOOR_MS: i64 = 50;

/// Largest accepted interval of any kind: 30 days in milliseconds.
pub const INTERVAL_CEILING_MS: i64 = 2_592_000_000;

/// Default keep-alive interval (one minute).
pub const DEFAULT_MAX_INTERVAL_MS: i64 = 60_000;

/// Default publication period (one minute).
pub const DEFAULT_PERIOD_MS: i64 = 60_000;

/// Default minimum interval between on-change publications (one second).
pub const DEFAULT_MIN_INTERVAL_MS: i64 = 1_000;

fn clamp_interval(value: i64, floor: i64, context: &str) -> i64 {
    if value < floor {
        log::warn!(
            "[subscription] {} {} ms below minimum, using {} ms",
            context,
            value,
            floor
        );
        floor
    } else if value > INTERVAL_CEILING_MS {
        log::warn!(
            "[subscription] {} {} ms above maximum, using {} ms",
            context,
            value,
            INTERVAL_CEILING_MS
        );
        INTERVAL_CEILING_MS
    } else {
        value
    }
}

fn clamp_alert_interval(value: i64, publication_interval_ms: i64, context: &str) -> i64 {
    if value == NO_ALERT_AFTER_INTERVAL {
        return NO_ALERT_AFTER_INTERVAL;
    }
    if value < publication_interval_ms {
        log::warn!(
            "[subscription] {} alertAfterInterval {} ms below publication interval, using {} ms",
            context,
            value,
            publication_interval_ms
        );
        return publication_interval_ms;
    }
    if value > INTERVAL_CEILING_MS {
        log::warn!(
            "[subscription] {} alertAfterInterval {} ms above maximum, using {} ms",
            context,
            value,
            INTERVAL_CEILING_MS
        );
        return INTERVAL_CEILING_MS;
    }
    value
}

/// QoS of a purely change-driven subscription.
///
/// Publications are sent when the value changes, but never more often than
/// once per `min_interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChangeSubscriptionQos {
    /// Minimum separation between successive publications.
    pub min_interval_ms: i64,
}

impl Default for OnChangeSubscriptionQos {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

impl OnChangeSubscriptionQos {
    #[must_use]
    pub fn new(min_interval_ms: i64) -> Self {
        Self { min_interval_ms }
    }
}

/// QoS of a change-driven subscription with a keep-alive ceiling.
///
/// Behaves like [`OnChangeSubscriptionQos`], but additionally guarantees a
/// publication at least once per `max_interval_ms` even when the value never
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChangeWithKeepAliveSubscriptionQos {
    /// Minimum separation between successive publications.
    pub min_interval_ms: i64,
    /// Keep-alive ceiling: maximum silence between publications.
    pub max_interval_ms: i64,
    /// Missed-publication alarm threshold; 0 disables the alarm.
    pub alert_after_interval_ms: i64,
}

impl Default for OnChangeWithKeepAliveSubscriptionQos {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            alert_after_interval_ms: NO_ALERT_AFTER_INTERVAL,
        }
    }
}

impl OnChangeWithKeepAliveSubscriptionQos {
    /// Construct a keep-alive QoS, clamping the intervals into their valid
    /// ranges: `max_interval_ms` into `[50 ms, 30 days]` and not below
    /// `min_interval_ms`; a non-zero alert interval into
    /// `[max_interval_ms, 30 days]`.
    #[must_use]
    pub fn new(min_interval_ms: i64, max_interval_ms: i64, alert_after_interval_ms: i64) -> Self {
        let max_interval_ms = clamp_interval(max_interval_ms, MIN_INTERVAL_FLOOR_MS, "maxInterval")
            .max(min_interval_ms);
        let alert_after_interval_ms =
            clamp_alert_interval(alert_after_interval_ms, max_interval_ms, "keep-alive");
        Self {
            min_interval_ms,
            max_interval_ms,
            alert_after_interval_ms,
        }
    }
}

/// QoS of a purely periodic subscription.
///
/// Publications are sent every `period_ms` regardless of value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicSubscriptionQos {
    /// Publication period.
    pub period_ms: i64,
    /// Missed-publication alarm threshold; 0 disables the alarm.
    pub alert_after_interval_ms: i64,
}

impl Default for PeriodicSubscriptionQos {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            alert_after_interval_ms: NO_ALERT_AFTER_INTERVAL,
        }
    }
}

impl PeriodicSubscriptionQos {
    /// Construct a periodic QoS, clamping `period_ms` into
    /// `[50 ms, 30 days]` and a non-zero alert interval into
    /// `[period_ms, 30 days]`.
    #[must_use]
    pub fn new(period_ms: i64, alert_after_interval_ms: i64) -> Self {
        let period_ms = clamp_interval(period_ms, MIN_INTERVAL_FLOOR_MS, "period");
        let alert_after_interval_ms =
            clamp_alert_interval(alert_after_interval_ms, period_ms, "periodic");
        Self {
            period_ms,
            alert_after_interval_ms,
        }
    }
}

/// Closed union of subscription QoS shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionQos {
    OnChange(OnChangeSubscriptionQos),
    OnChangeWithKeepAlive(OnChangeWithKeepAliveSubscriptionQos),
    Periodic(PeriodicSubscriptionQos),
}

/// Whether publications are triggered by value changes.
///
/// True for the plain on-change and the keep-alive variants.
#[must_use]
pub fn is_on_change_subscription(qos: &SubscriptionQos) -> bool {
    match qos {
        SubscriptionQos::OnChangeWithKeepAlive(_) | SubscriptionQos::OnChange(_) => true,
        SubscriptionQos::Periodic(_) => false,
    }
}

/// Minimum separation between publications, or [`NO_INTERVAL`] for purely
/// periodic subscriptions.
#[must_use]
pub fn min_interval_ms(qos: &SubscriptionQos) -> i64 {
    match qos {
        SubscriptionQos::OnChangeWithKeepAlive(keep_alive) => keep_alive.min_interval_ms,
        SubscriptionQos::OnChange(on_change) => on_change.min_interval_ms,
        SubscriptionQos::Periodic(_) => NO_INTERVAL,
    }
}

/// Interval at which the scheduler must emit publications regardless of
/// changes: the keep-alive ceiling or the period, [`NO_INTERVAL`] for plain
/// on-change subscriptions.
///
/// The keep-alive arm must stay first: the variant is both on-change and
/// periodic, and its `max_interval_ms` is the periodic interval.
#[must_use]
pub fn periodic_publication_interval_ms(qos: &SubscriptionQos) -> i64 {
    match qos {
        SubscriptionQos::OnChangeWithKeepAlive(keep_alive) => keep_alive.max_interval_ms,
        SubscriptionQos::Periodic(periodic) => periodic.period_ms,
        SubscriptionQos::OnChange(_) => NO_INTERVAL,
    }
}

/// Missed-publication alarm threshold, or [`NO_INTERVAL`] for subscriptions
/// without an alarm parameter.
#[must_use]
pub fn alert_after_interval_ms(qos: &SubscriptionQos) -> i64 {
    match qos {
        SubscriptionQos::OnChangeWithKeepAlive(keep_alive) => keep_alive.alert_after_interval_ms,
        SubscriptionQos::Periodic(periodic) => periodic.alert_after_interval_ms,
        SubscriptionQos::OnChange(_) => NO_INTERVAL,
    }
}
