// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for attack simulation.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{json, Value};

/// The six canonical event types, in a fixed order.
pub const EVENT_TYPES: [&str; 6] = [
    "payer.created",
    "payer.updated",
    "subscription.created",
    "subscription.updated",
    "receivable.created",
    "receivable.updated",
];

/// Entity payload matching the entity segment of `event_type`.
pub fn entity_for(event_type: &str, i: usize) -> Value {
    match event_type.split('.').next() {
        Some("subscription") => json!({
            "id": format!("sub_{i:05}"),
            "payer_id": format!("pay_{i:05}"),
            "amount": 100 + i,
            "receivable_date": "last_bank_date",
            "payment_method_type": "autogiro_external",
            "status": "active",
            "reference": format!("REF{i}"),
            "source": "repejo",
            "index_adjustment_consent": i % 2 == 0
        }),
        Some("receivable") => json!({
            "id": format!("rcv_{i:05}"),
            "subscription": format!("sub_{i:05}"),
            "amount": 100 + i,
            "status": "paid",
            "type": if i % 2 == 0 { "recurring" } else { "onetime" },
            "payment_method": "swish_recurring",
            "receivable_date": "2025-09-27",
            "reference": format!("REF{i}")
        }),
        _ => json!({
            "id": format!("pay_{i:05}"),
            "status": "active",
            "name": format!("Donor {i}"),
            "email": format!("donor{i}@example.se")
        }),
    }
}

/// Generate `count` well-formed webhook bodies sent `age_secs` before `now`.
pub fn generate_payloads(count: usize, now: DateTime<Utc>, age_secs: i64) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let event_type = EVENT_TYPES[i % EVENT_TYPES.len()];
            json!({
                "sent_at": (now - TimeDelta::seconds(age_secs)).to_rfc3339(),
                "event_type": event_type,
                "data": entity_for(event_type, i)
            })
        })
        .collect()
}

/// Forged variants of a valid lower-case hex signature. None should verify.
pub fn forge_signatures(valid: &str) -> Vec<String> {
    let flip = |s: &str, idx: usize| -> String {
        let mut bytes = s.as_bytes().to_vec();
        bytes[idx] = if bytes[idx] == b'0' { b'1' } else { b'0' };
        String::from_utf8(bytes).unwrap()
    };

    vec![
        String::new(),
        "sha256=".to_string(),
        "not-a-signature".to_string(),
        valid[..valid.len() - 2].to_string(),
        format!("{valid}00"),
        flip(valid, 0),
        flip(valid, valid.len() / 2),
        flip(valid, valid.len() - 1),
        format!("sha1={valid}"),
        format!("sha256={}", &valid[..valid.len() - 1]),
        "0".repeat(valid.len()),
        "z".repeat(valid.len()),
    ]
}

/// Acceptable spellings of a valid signature header.
pub fn header_variants(valid: &str) -> Vec<String> {
    vec![
        valid.to_string(),
        valid.to_uppercase(),
        format!("sha256={valid}"),
        format!("SHA256={}", valid.to_uppercase()),
        format!("  sha256={valid}  "),
        format!("\t{valid}"),
    ]
}

/// Malformed event types that must never be truncated into a valid one.
pub fn generate_malformed_event_types() -> Vec<&'static str> {
    vec![
        "",
        ".",
        "payer",
        "payer.",
        ".created",
        "payer.created.extra",
        "payer..created",
        "PAYER.CREATED",
        "payer.deleted",
        "invoice.created",
        "payer created",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_generate_payloads_cycles_event_types() {
        let payloads = generate_payloads(12, Utc::now(), 0);
        assert_eq!(payloads.len(), 12);
        assert_eq!(payloads[0]["event_type"], payloads[6]["event_type"]);
    }

    #[test]
    fn test_forgeries_differ_from_valid() {
        let valid = "ab".repeat(32);
        for forged in forge_signatures(&valid) {
            assert_ne!(forged, valid);
        }
    }
}
