// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed views of the entity carried in a webhook's `data` field.
//!
//! The shape of `data` is determined by the entity segment of the event
//! type. Parsing into these types is how the payload is validated; the
//! downstream record still carries the original JSON.

use crate::error::RejectionReason;
use crate::event::EntityType;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value.len() > $prefix.len() && value.starts_with($prefix) {
                    Ok(Self(value))
                } else {
                    Err(format!("expected id starting with {:?}, got {:?}", $prefix, value))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

prefixed_id!(
    /// Payer (donor) identifier, `pay_…`.
    PayerId,
    "pay_"
);
prefixed_id!(
    /// Recurring donation identifier, `sub_…`.
    SubscriptionId,
    "sub_"
);
prefixed_id!(
    /// Payment identifier, `rcv_…`.
    ReceivableId,
    "rcv_"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayerStatus {
    Active,
    Pending,
    Rejected,
    Terminated,
    Aborted,
    Checkout,
    Completed,
}

/// A donor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payer {
    pub id: PayerId,
    pub status: PayerStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address_street: Option<String>,
    #[serde(default)]
    pub address_zip: Option<String>,
    #[serde(default)]
    pub address_city: Option<String>,
    #[serde(default)]
    pub personal_identity_number: Option<String>,
    #[serde(default)]
    pub contact_consent: Option<bool>,
    #[serde(default)]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    SwishRecurring,
    AutogiroExternal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSource {
    Repejo,
}

/// A recurring donation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub payer_id: PayerId,
    pub amount: f64,
    /// A calendar date or the literal `last_bank_date`.
    pub receivable_date: String,
    pub payment_method_type: PaymentMethodType,
    pub status: SubscriptionStatus,
    pub reference: String,
    pub source: SubscriptionSource,
    pub index_adjustment_consent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Paid,
    Rejected,
    InsufficientFunds,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableKind {
    Onetime,
    Recurring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivablePaymentMethod {
    SwishRecurring,
}

/// A single payment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Receivable {
    pub id: ReceivableId,
    pub subscription: SubscriptionId,
    pub amount: f64,
    pub status: ReceivableStatus,
    #[serde(rename = "type")]
    pub kind: ReceivableKind,
    pub payment_method: ReceivablePaymentMethod,
    pub receivable_date: String,
    pub reference: String,
}

/// The entity in a webhook's `data` field, keyed by entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
    Payer(Payer),
    Subscription(Subscription),
    Receivable(Receivable),
}

impl EntityData {
    /// Parse `data` as the shape required by `entity`.
    pub fn parse(entity: EntityType, data: &Value) -> Result<Self, RejectionReason> {
        let parsed = match entity {
            EntityType::Payer => Payer::deserialize(data).map(Self::Payer),
            EntityType::Subscription => Subscription::deserialize(data).map(Self::Subscription),
            EntityType::Receivable => Receivable::deserialize(data).map(Self::Receivable),
        };

        parsed.map_err(|e| {
            RejectionReason::MalformedPayload(format!("data is not a valid {entity}: {e}"))
        })
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Payer(_) => EntityType::Payer,
            Self::Subscription(_) => EntityType::Subscription,
            Self::Receivable(_) => EntityType::Receivable,
        }
    }

    /// Identifier of the entity, e.g. `pay_123`.
    pub fn id(&self) -> &str {
        match self {
            Self::Payer(p) => p.id.as_str(),
            Self::Subscription(s) => s.id.as_str(),
            Self::Receivable(r) => r.id.as_str(),
        }
    }
}
