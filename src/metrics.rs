// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for webhook outcomes.
//!
//! Suppressed (unsubscribed) events are counted separately from rejections.

use crate::error::RejectionReason;
use crate::signature::SignatureStatus;
use crate::validator::Validation;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters for the webhook receiver, registered in their own registry.
#[derive(Clone)]
pub struct WebhookMetrics {
    registry: Registry,
    outcomes: IntCounterVec,
    signatures: IntCounterVec,
}

impl WebhookMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let outcomes = IntCounterVec::new(
            Opts::new(
                "repejo_webhooks_total",
                "Inbound webhooks by outcome (emitted, suppressed, or rejection code)",
            ),
            &["outcome"],
        )?;
        let signatures = IntCounterVec::new(
            Opts::new(
                "repejo_webhook_signature_total",
                "Accepted webhooks by how the signature was checked",
            ),
            &["status"],
        )?;

        registry.register(Box::new(outcomes.clone()))?;
        registry.register(Box::new(signatures.clone()))?;

        Ok(Self {
            registry,
            outcomes,
            signatures,
        })
    }

    /// Record an accepted webhook.
    pub fn record_accepted(&self, validation: &Validation) {
        let outcome = if validation.is_suppressed() {
            "suppressed"
        } else {
            "emitted"
        };
        self.outcomes.with_label_values(&[outcome]).inc();
        self.record_signature(validation.signature);
    }

    /// Record a rejected webhook under its lower-cased code.
    pub fn record_rejected(&self, reason: &RejectionReason) {
        let code = reason.code().to_ascii_lowercase();
        self.outcomes.with_label_values(&[code.as_str()]).inc();
    }

    fn record_signature(&self, status: SignatureStatus) {
        self.signatures.with_label_values(&[status.as_str()]).inc();
    }

    /// Current count for an outcome label.
    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.outcomes.with_label_values(&[outcome]).get()
    }

    /// Current count for a signature status.
    pub fn signature_count(&self, status: SignatureStatus) -> u64 {
        self.signatures.with_label_values(&[status.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
