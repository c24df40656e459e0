// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Repejo Webhook Receiver
//!
//! This crate authenticates and normalizes webhooks sent by the Repejo
//! donations platform before they reach a workflow consumer:
//!
//! - HMAC-SHA256 signature verification over the raw body
//! - Replay protection (webhooks older than 5 minutes are rejected)
//! - Event type filtering against a subscribed set
//! - Normalization into `{event_type, sent_at, data, entity_type, action}`

pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod freshness;
pub mod handlers;
pub mod metrics;
pub mod signature;
pub mod validator;

pub use config::{Config, ValidationConfig};
pub use error::RejectionReason;
pub use event::{Action, EntityType, EventType, NormalizedEvent, WebhookEnvelope};
pub use freshness::{Clock, FixedClock, SystemClock};
pub use signature::{SignatureStatus, SignatureVerifier};
pub use validator::{Validation, WebhookRequest, WebhookValidator};
