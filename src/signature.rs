// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HMAC-SHA256 verification of the `Repejo-Signature` header.
//!
//! The signature covers the raw request body. Header values are accepted in
//! any case, with surrounding whitespace, and with or without a `sha256=`
//! prefix.

use crate::error::RejectionReason;
use hmac::{Hmac, Mac};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "repejo-signature";

const SIGNATURE_PREFIX: &str = "sha256=";

/// How the signature stage treated a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Verified against the raw body.
    Verified,
    /// Verified against a re-serialization of the parsed body because the
    /// raw body was unavailable. Key order is kept, but whitespace and number
    /// formatting may differ from what the sender signed.
    Degraded,
    /// Signature checking is disabled or no secret is configured.
    Skipped,
}

impl SignatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Degraded => "degraded",
            Self::Skipped => "skipped",
        }
    }
}

/// Verifies request bodies against a shared secret.
///
/// The secret is held in a [`SecretString`] so it is zeroized on drop and
/// redacted from `Debug` output.
#[derive(Debug)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Lower-case hex HMAC-SHA256 of `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        hex::encode(self.compute(body))
    }

    /// Check `signature` (a raw header value) against `body`.
    pub fn verify(&self, body: &[u8], signature: &str) -> Result<(), RejectionReason> {
        let provided = match hex::decode(normalize_signature(signature)) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!("Webhook signature is not valid hex");
                return Err(RejectionReason::InvalidSignature);
            }
        };

        let expected = self.compute(body);

        if constant_time_compare(&expected, &provided) {
            Ok(())
        } else {
            debug!("Webhook signature verification failed");
            Err(RejectionReason::InvalidSignature)
        }
    }

    fn compute(&self, body: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(body);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Trim, lower-case and strip an optional `sha256=` prefix.
pub fn normalize_signature(header: &str) -> String {
    let lowered = header.trim().to_ascii_lowercase();
    match lowered.strip_prefix(SIGNATURE_PREFIX) {
        Some(hex) => hex.to_string(),
        None => lowered,
    }
}

/// The signature header value.
///
/// An absent or empty header is `MissingSignature`; a header that is present
/// but not visible ASCII is `InvalidSignature`.
pub fn signature_header(headers: &HeaderMap) -> Result<&str, RejectionReason> {
    let value = headers
        .get(SIGNATURE_HEADER)
        .ok_or(RejectionReason::MissingSignature)?;
    let value = value.to_str().map_err(|_| {
        debug!("Webhook signature header is not valid text");
        RejectionReason::InvalidSignature
    })?;
    if value.is_empty() {
        return Err(RejectionReason::MissingSignature);
    }
    Ok(value)
}

/// Length check first, then a timing-safe byte comparison.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
