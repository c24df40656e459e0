// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rejection reasons for inbound webhooks.

use thiserror::Error;

/// Why a webhook was rejected.
///
/// Every variant is terminal for the request that produced it. Filtering an
/// event the caller is not subscribed to is not a rejection and has no
/// variant here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Missing Repejo-Signature header")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Malformed sent_at timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Webhook is too old (replay attack protection): sent {age_secs}s ago")]
    StaleWebhook { age_secs: i64 },

    #[error("Malformed event type: {0}")]
    MalformedEventType(String),

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),
}

impl RejectionReason {
    /// Stable machine-readable code for responses and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::MalformedTimestamp(_) => "MALFORMED_TIMESTAMP",
            Self::StaleWebhook { .. } => "STALE_WEBHOOK",
            Self::MalformedEventType(_) => "MALFORMED_EVENT_TYPE",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
        }
    }

    /// Whether the sender failed to prove it holds the shared secret or
    /// replayed an old request, as opposed to sending a malformed payload.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingSignature | Self::InvalidSignature | Self::StaleWebhook { .. }
        )
    }
}
