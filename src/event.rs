// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Repejo event types and the normalized record handed downstream.
//!
//! An event type is always `<entity>.<action>` with exactly one `.`. The
//! six canonical types are every combination of [`EntityType`] and
//! [`Action`], so [`EventType`] is a pair rather than a flat list.

use crate::entity::EntityData;
use crate::error::RejectionReason;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource kind, the segment before the `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Payer,
    Subscription,
    Receivable,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payer => "payer",
            Self::Subscription => "subscription",
            Self::Receivable => "receivable",
        }
    }
}

impl FromStr for EntityType {
    type Err = RejectionReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payer" => Ok(Self::Payer),
            "subscription" => Ok(Self::Subscription),
            "receivable" => Ok(Self::Receivable),
            other => Err(RejectionReason::MalformedEventType(format!(
                "unknown entity type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle action, the segment after the `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Updated,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

impl FromStr for Action {
    type Err = RejectionReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            other => Err(RejectionReason::MalformedEventType(format!(
                "unknown action {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the canonical Repejo event types, e.g. `subscription.updated`.
///
/// Serializes to and from its dotted string form, so it can be used directly
/// in configuration lists and JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType {
    entity: EntityType,
    action: Action,
}

impl EventType {
    pub const PAYER_CREATED: Self = Self::new(EntityType::Payer, Action::Created);
    pub const PAYER_UPDATED: Self = Self::new(EntityType::Payer, Action::Updated);
    pub const SUBSCRIPTION_CREATED: Self = Self::new(EntityType::Subscription, Action::Created);
    pub const SUBSCRIPTION_UPDATED: Self = Self::new(EntityType::Subscription, Action::Updated);
    pub const RECEIVABLE_CREATED: Self = Self::new(EntityType::Receivable, Action::Created);
    pub const RECEIVABLE_UPDATED: Self = Self::new(EntityType::Receivable, Action::Updated);

    /// Every canonical event type.
    pub const ALL: [Self; 6] = [
        Self::PAYER_CREATED,
        Self::PAYER_UPDATED,
        Self::SUBSCRIPTION_CREATED,
        Self::SUBSCRIPTION_UPDATED,
        Self::RECEIVABLE_CREATED,
        Self::RECEIVABLE_UPDATED,
    ];

    pub const fn new(entity: EntityType, action: Action) -> Self {
        Self { entity, action }
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

impl FromStr for EventType {
    type Err = RejectionReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (entity, action) = split_event_type(s)?;
        Ok(Self::new(entity.parse()?, action.parse()?))
    }
}

impl TryFrom<String> for EventType {
    type Error = RejectionReason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.action)
    }
}

/// Split a raw event type into its entity and action segments.
///
/// Exactly two non-empty segments are required; anything else is rejected
/// instead of being truncated.
pub fn split_event_type(raw: &str) -> Result<(&str, &str), RejectionReason> {
    match raw.split_once('.') {
        Some((entity, action))
            if !entity.is_empty() && !action.is_empty() && !action.contains('.') =>
        {
            Ok((entity, action))
        }
        _ => Err(RejectionReason::MalformedEventType(format!(
            "expected <entity>.<action>, got {raw:?}"
        ))),
    }
}

/// A parsed webhook body. Lives for a single validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEnvelope {
    pub sent_at: String,
    pub event_type: EventType,
    pub data: EntityData,
}

/// Record emitted to the workflow consumer for an accepted webhook.
///
/// `data` is the entity payload exactly as received. The typed view that was
/// used to validate it is kept in `entity` and is not serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    pub event_type: EventType,
    pub sent_at: String,
    pub data: serde_json::Value,
    pub entity_type: EntityType,
    pub action: Action,
    #[serde(skip)]
    pub entity: EntityData,
}

impl NormalizedEvent {
    /// Build the outbound record from a validated envelope and the original
    /// `data` value.
    pub fn new(envelope: WebhookEnvelope, data: serde_json::Value) -> Self {
        let event_type = envelope.event_type;
        Self {
            event_type,
            sent_at: envelope.sent_at,
            data,
            entity_type: event_type.entity(),
            action: event_type.action(),
            entity: envelope.data,
        }
    }
}
