// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Attack simulation patterns for security testing.

/// How each simulated request is manipulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tamper {
    /// Untouched, correctly signed request
    None,
    /// Signature header removed
    StripSignature,
    /// Signature replaced by a forgery
    ForgeSignature,
    /// Body altered after signing
    AlterBody,
    /// Signed with the wrong secret
    WrongSecret,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// How each request is manipulated
    pub tamper: Tamper,
    /// Age of the captured requests in seconds
    pub age_secs: i64,
    /// Whether the receiver checks signatures
    pub require_signature: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 60,
            tamper: Tamper::None,
            age_secs: 5,
            require_signature: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Legitimate traffic - fresh, correctly signed.
    pub fn legitimate() -> Self {
        Self::default()
    }

    /// Replay storm - validly signed requests captured ten minutes ago.
    pub fn replay_storm() -> Self {
        Self {
            total_requests: 120,
            age_secs: 10 * 60,
            ..Default::default()
        }
    }

    /// Forged signatures on otherwise valid requests.
    pub fn forged_signatures() -> Self {
        Self {
            tamper: Tamper::ForgeSignature,
            ..Default::default()
        }
    }

    /// Signature header stripped, hoping verification is skipped.
    pub fn signature_stripping() -> Self {
        Self {
            tamper: Tamper::StripSignature,
            ..Default::default()
        }
    }

    /// Body altered in transit after signing.
    pub fn body_tampering() -> Self {
        Self {
            tamper: Tamper::AlterBody,
            ..Default::default()
        }
    }

    /// Attacker signs with a guessed secret.
    pub fn wrong_secret() -> Self {
        Self {
            tamper: Tamper::WrongSecret,
            ..Default::default()
        }
    }

    /// Replay against a receiver with signature checks turned off.
    pub fn unsigned_replay() -> Self {
        Self {
            tamper: Tamper::StripSignature,
            age_secs: 60 * 60,
            require_signature: false,
            ..Default::default()
        }
    }
}

/// Expected outcomes for different attack types.
pub struct AttackExpectations {
    /// Maximum ratio of requests that should be accepted
    pub max_accepted_ratio: f64,
    /// Description of expected behavior
    pub description: &'static str,
}

impl AttackConfig {
    /// Get expected outcomes for this attack pattern.
    pub fn expectations(&self) -> AttackExpectations {
        if self.age_secs > 5 * 60 {
            AttackExpectations {
                max_accepted_ratio: 0.0,
                description: "Replayed requests should be rejected as stale",
            }
        } else if self.require_signature && self.tamper != Tamper::None {
            AttackExpectations {
                max_accepted_ratio: 0.0,
                description: "Tampered requests should fail signature verification",
            }
        } else {
            AttackExpectations {
                max_accepted_ratio: 1.0,
                description: "Legitimate traffic should be accepted",
            }
        }
    }
}
