// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Repejo webhook validator.
//!
//! Runs each inbound webhook through three stages in order:
//! - Signature verification over the raw body
//! - Freshness check on `sent_at`
//! - Event type filtering and normalization
//!
//! Any stage can reject the request. A request whose event type is not in
//! the subscribed set is accepted but produces no records.

use crate::config::ValidationConfig;
use crate::entity::EntityData;
use crate::error::RejectionReason;
use crate::event::{EventType, NormalizedEvent, WebhookEnvelope};
use crate::freshness::{check_freshness, Clock, SystemClock};
use crate::signature::{signature_header, SignatureStatus, SignatureVerifier};
use http::HeaderMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// An inbound webhook, borrowed from the caller for one validation call.
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    pub headers: &'a HeaderMap,
    /// The body exactly as received, when the transport still has it.
    pub raw_body: Option<&'a [u8]>,
    pub body: &'a Value,
}

impl<'a> WebhookRequest<'a> {
    /// A request whose raw body is unavailable.
    pub fn new(headers: &'a HeaderMap, body: &'a Value) -> Self {
        Self {
            headers,
            raw_body: None,
            body,
        }
    }

    pub fn with_raw_body(mut self, raw_body: &'a [u8]) -> Self {
        self.raw_body = Some(raw_body);
        self
    }
}

/// Result of an accepted webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Zero records when the event was filtered out, otherwise one.
    pub events: Vec<NormalizedEvent>,
    pub signature: SignatureStatus,
}

impl Validation {
    pub fn is_suppressed(&self) -> bool {
        self.events.is_empty()
    }
}

/// Validates and normalizes Repejo webhooks.
///
/// Holds only immutable configuration, so one instance can be shared across
/// any number of concurrent requests.
#[derive(Debug)]
pub struct WebhookValidator<C = SystemClock> {
    verifier: Option<SignatureVerifier>,
    subscribed_events: HashSet<EventType>,
    clock: C,
}

impl WebhookValidator<SystemClock> {
    /// Create a validator that reads the system clock.
    pub fn new(config: ValidationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> WebhookValidator<C> {
    pub fn with_clock(config: ValidationConfig, clock: C) -> Self {
        let has_secret = config.has_secret();

        if config.require_signature && !has_secret {
            warn!("Signature validation is enabled but no webhook secret is configured; signatures will not be checked");
        }

        let verifier = (config.require_signature && has_secret)
            .then(|| SignatureVerifier::new(config.secret));

        Self {
            verifier,
            subscribed_events: config.subscribed_events,
            clock,
        }
    }

    /// Whether the signature stage will run.
    pub fn verifies_signatures(&self) -> bool {
        self.verifier.is_some()
    }

    /// Validate a request and return the records to emit.
    pub fn validate(
        &self,
        request: WebhookRequest<'_>,
    ) -> Result<Vec<NormalizedEvent>, RejectionReason> {
        self.validate_detailed(request).map(|v| v.events)
    }

    /// Validate a request, also reporting how the signature was checked.
    pub fn validate_detailed(
        &self,
        request: WebhookRequest<'_>,
    ) -> Result<Validation, RejectionReason> {
        let signature = self.check_signature(&request)?;
        let events = self.process_body(request.body)?;
        Ok(Validation { events, signature })
    }

    /// Validate a request straight from the transport's raw body bytes.
    ///
    /// The signature is checked before the body is parsed, so a forged
    /// request is reported as a signature failure even if it is not JSON.
    pub fn validate_bytes(
        &self,
        headers: &HeaderMap,
        raw_body: &[u8],
    ) -> Result<Validation, RejectionReason> {
        let signature = match &self.verifier {
            Some(verifier) => {
                verify_with(verifier, headers, raw_body)?;
                SignatureStatus::Verified
            }
            None => SignatureStatus::Skipped,
        };

        let body: Value = serde_json::from_slice(raw_body).map_err(|e| {
            debug!(error = %e, "Webhook body is not valid JSON");
            RejectionReason::MalformedPayload(format!("body is not valid JSON: {e}"))
        })?;

        let events = self.process_body(&body)?;
        Ok(Validation { events, signature })
    }

    fn check_signature(
        &self,
        request: &WebhookRequest<'_>,
    ) -> Result<SignatureStatus, RejectionReason> {
        let Some(verifier) = &self.verifier else {
            return Ok(SignatureStatus::Skipped);
        };

        match request.raw_body {
            Some(raw) => {
                verify_with(verifier, request.headers, raw)?;
                Ok(SignatureStatus::Verified)
            }
            None => {
                // Fail on a missing header before doing any fallback work.
                signature_header(request.headers)?;
                warn!("Raw webhook body unavailable; verifying signature against re-serialized JSON");
                let reserialized = serde_json::to_vec(request.body).map_err(|e| {
                    RejectionReason::MalformedPayload(format!("cannot re-serialize body: {e}"))
                })?;
                verify_with(verifier, request.headers, &reserialized)?;
                Ok(SignatureStatus::Degraded)
            }
        }
    }

    /// Freshness, envelope parsing and filtering, in that order.
    fn process_body(&self, body: &Value) -> Result<Vec<NormalizedEvent>, RejectionReason> {
        let object = body.as_object().ok_or_else(|| {
            RejectionReason::MalformedPayload("body is not a JSON object".to_string())
        })?;

        let sent_at = match object.get("sent_at") {
            Some(Value::String(s)) => s.as_str(),
            _ => {
                return Err(RejectionReason::MalformedTimestamp(
                    "sent_at is missing or not a string".to_string(),
                ))
            }
        };
        check_freshness(sent_at, self.clock.now())?;

        let (envelope, data) = parse_envelope(object, sent_at)?;
        Ok(self.normalize(envelope, data))
    }

    /// Apply the subscription filter and build the outbound record.
    pub fn normalize(&self, envelope: WebhookEnvelope, data: Value) -> Vec<NormalizedEvent> {
        if !self.is_subscribed(envelope.event_type) {
            debug!(event_type = %envelope.event_type, "Event not subscribed, suppressing");
            return Vec::new();
        }

        debug!(
            event_type = %envelope.event_type,
            entity_id = envelope.data.id(),
            "Webhook accepted"
        );
        vec![NormalizedEvent::new(envelope, data)]
    }

    /// An empty subscription set means every event type.
    pub fn is_subscribed(&self, event_type: EventType) -> bool {
        self.subscribed_events.is_empty() || self.subscribed_events.contains(&event_type)
    }
}

fn verify_with(
    verifier: &SignatureVerifier,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), RejectionReason> {
    verifier.verify(body, signature_header(headers)?)
}

fn parse_envelope(
    object: &Map<String, Value>,
    sent_at: &str,
) -> Result<(WebhookEnvelope, Value), RejectionReason> {
    let event_type: EventType = match object.get("event_type") {
        Some(Value::String(raw)) => raw.parse()?,
        _ => {
            return Err(RejectionReason::MalformedEventType(
                "event_type is missing or not a string".to_string(),
            ))
        }
    };

    let data = object
        .get("data")
        .ok_or_else(|| RejectionReason::MalformedPayload("data is missing".to_string()))?;
    let entity = EntityData::parse(event_type.entity(), data)?;

    let envelope = WebhookEnvelope {
        sent_at: sent_at.to_string(),
        event_type,
        data: entity,
    };
    Ok((envelope, data.clone()))
}
