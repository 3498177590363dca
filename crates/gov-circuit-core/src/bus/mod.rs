// gov-circuit-core/src/bus/mod.rs
// ============================================================================
// Module: Event Bus
// Description: Topic-routed pub/sub with ordered delivery and an event log.
// Purpose: Connective tissue between the circuit's four stages.
// Dependencies: crate::core::{hashing, time}, serde_json, std::panic
// ============================================================================

//! ## Overview
//! Topics form a dotted namespace (`threshold.detected`, `simulation.complete`,
//! …). A subscriber matches an exact topic, a prefix pattern ending in `*`, or
//! the bare wildcard `*`. Delivery is synchronous and single-threaded:
//! `publish` does not return until every matching subscriber, snapshotted
//! before dispatch, has been invoked once. A subscriber that panics or
//! returns an error is isolated — logged, but delivery continues to the rest
//! and the event is never dropped from the log. There is no cross-topic
//! ordering guarantee and no in-process backpressure; the bus never crosses
//! a process boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::hashing::EVENT_ID_LEN;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_prefix;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Topic Pattern
// ============================================================================

/// A subscription's match rule against published topics.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TopicPattern {
    /// Matches only the exact topic string.
    Exact(String),
    /// Matches any topic beginning with this prefix (pattern ended in `*`).
    Prefix(String),
    /// Matches every topic (the bare `*` pattern).
    Wildcard,
}

impl TopicPattern {
    fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Self::Wildcard
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(pattern.to_string())
        }
    }

    fn matches(&self, topic: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == topic,
            Self::Prefix(prefix) => topic.starts_with(prefix.as_str()),
            Self::Wildcard => true,
        }
    }
}

// ============================================================================
// SECTION: Event
// ============================================================================

/// One published event.
///
/// # Invariants
/// - `event_id` is a 12-hex prefix of SHA-256 over the canonical JSON of
///   `topic`, `payload`, `source`, and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Dotted topic this event was published on.
    pub topic: String,
    /// Free-form event payload.
    pub payload: serde_json::Value,
    /// Identifier of the component that published this event.
    pub source: String,
    /// UTC timestamp the event was published at.
    pub timestamp: Timestamp,
    /// Twelve-hex-char SHA-256 prefix derived from the fields above.
    pub event_id: String,
}

/// Fields hashed to produce [`Event::event_id`].
#[derive(Serialize)]
struct HashedFields<'a> {
    topic: &'a str,
    payload: &'a serde_json::Value,
    source: &'a str,
    timestamp: Timestamp,
}

impl Event {
    fn new(
        topic: String,
        payload: serde_json::Value,
        source: String,
        timestamp: Timestamp,
    ) -> Result<Self, HashError> {
        let hashed = HashedFields { topic: &topic, payload: &payload, source: &source, timestamp };
        let event_id = hash_prefix(&hashed, EVENT_ID_LEN)?;
        Ok(Self { topic, payload, source, timestamp, event_id })
    }
}

// ============================================================================
// SECTION: Subscriptions
// ============================================================================

/// Identifier returned by [`EventBus::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Error a subscriber may return from its handler; isolated by the bus and
/// recorded in [`EventBus::failures`] rather than aborting dispatch.
#[derive(Debug, Error)]
#[error("subscriber error: {0}")]
pub struct SubscriberError(pub String);

/// A subscriber handler. Boxed and invoked synchronously on every matching
/// publish; `FnMut` because handlers commonly accumulate state (the
/// Simulator/Deliberator/Intervenor subscribing to feed the next stage).
type Handler = Box<dyn FnMut(&Event) -> Result<(), SubscriberError>>;

struct Subscription {
    id: SubscriptionId,
    pattern: TopicPattern,
    handler: Handler,
}

/// One subscriber's dispatch failure, isolated during a single publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    /// Subscriber whose handler failed.
    pub subscription_id: SubscriptionId,
    /// Human-readable cause (the returned error, or `"panicked"`).
    pub cause: String,
}

// ============================================================================
// SECTION: Event Bus
// ============================================================================

/// In-process, topic-routed publish/subscribe bus with a replayable event
/// log.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    log: Vec<Event>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber against a topic pattern: an exact topic, a
    /// prefix pattern ending in `*`, or the bare wildcard `*`.
    pub fn subscribe(
        &mut self,
        pattern: &str,
        handler: impl FnMut(&Event) -> Result<(), SubscriberError> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            pattern: TopicPattern::parse(pattern),
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a subscription. A no-op if `id` is not currently registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != id);
    }

    /// Publishes an event, dispatching synchronously to every subscriber
    /// whose pattern matches `topic`, snapshotted in subscribe order before
    /// dispatch begins. Always appends to the log, even if every subscriber
    /// fails. Returns the event and any subscriber failures observed.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when `event_id` cannot be computed; no event is
    /// published or logged in that case.
    pub fn publish(
        &mut self,
        topic: impl Into<String>,
        payload: serde_json::Value,
        source: impl Into<String>,
        at: Timestamp,
    ) -> Result<(Event, Vec<DispatchFailure>), HashError> {
        let event = Event::new(topic.into(), payload, source.into(), at)?;
        let matching: Vec<usize> = self
            .subscriptions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.pattern.matches(&event.topic))
            .map(|(index, _)| index)
            .collect();

        let mut failures = Vec::new();
        for index in matching {
            let Some(subscription) = self.subscriptions.get_mut(index) else { continue };
            let id = subscription.id;
            let handler = &mut subscription.handler;
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(&event)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => failures.push(DispatchFailure { subscription_id: id, cause: err.0 }),
                Err(_) => failures.push(DispatchFailure { subscription_id: id, cause: "panicked".to_string() }),
            }
        }

        self.log.push(event.clone());
        Ok((event, failures))
    }

    /// Returns a snapshot of every event published so far, in publication
    /// order.
    #[must_use]
    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// Serializes the event log as newline-delimited canonical JSON, one
    /// event per line.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn export_ndjson(&self) -> Result<String, HashError> {
        let mut out = String::new();
        for event in &self.log {
            let bytes = crate::core::hashing::canonical_json_bytes(event)?;
            out.push_str(&String::from_utf8_lossy(&bytes));
            out.push('\n');
        }
        Ok(out)
    }
}

// ============================================================================
// SECTION: Topic Namespace
// ============================================================================

/// Topic published when the Detector emits a [`crate::core::ThresholdEvent`].
pub const TOPIC_THRESHOLD_DETECTED: &str = "threshold.detected";
/// Topic published when the Simulator emits a [`crate::core::Prediction`].
pub const TOPIC_SIMULATION_COMPLETE: &str = "simulation.complete";
/// Topic published when the Deliberator emits a [`crate::core::DeliberationResult`].
pub const TOPIC_DELIBERATION_COMPLETE: &str = "deliberation.complete";
/// Topic published when the Intervenor emits an [`crate::core::EnforcementResult`].
pub const TOPIC_INTERVENTION_COMPLETE: &str = "intervention.complete";
/// Topic published when the Circuit emits a [`crate::core::CircuitResult`].
pub const TOPIC_CIRCUIT_COMPLETE: &str = "circuit.complete";
/// Topic published when the Circuit's run is cancelled mid-flight.
pub const TOPIC_CIRCUIT_CANCELLED: &str = "circuit.cancelled";
