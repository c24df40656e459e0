// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Replay protection based on the webhook's `sent_at` timestamp.
//!
//! Only the age of a webhook is bounded. Timestamps in the future are
//! accepted so that a sender with a fast clock is not rejected.

use crate::error::RejectionReason;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use tracing::debug;

/// Oldest a webhook may be when it arrives, in seconds.
pub const MAX_AGE_SECS: i64 = 5 * 60;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse `sent_at`.
///
/// RFC 3339 is expected. A date-time without an offset is read as UTC.
pub fn parse_sent_at(sent_at: &str) -> Result<DateTime<Utc>, RejectionReason> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(sent_at) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(sent_at, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| RejectionReason::MalformedTimestamp(sent_at.to_string()))
}

/// Reject webhooks sent more than [`MAX_AGE_SECS`] before `now`.
pub fn check_freshness(
    sent_at: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, RejectionReason> {
    let sent = parse_sent_at(sent_at)?;
    let age = now - sent;

    if age > TimeDelta::seconds(MAX_AGE_SECS) {
        debug!(sent_at = %sent, age_secs = age.num_seconds(), "Stale webhook");
        return Err(RejectionReason::StaleWebhook {
            age_secs: age.num_seconds(),
        });
    }

    Ok(sent)
}
