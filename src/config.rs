// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the Repejo webhook receiver.
//!
//! Mirrors the trigger settings the platform integration exposes: the
//! subscribed event list, the webhook secret, and whether to check
//! signatures.

use crate::event::EventType;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Configuration for the webhook receiver service.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path the platform posts webhooks to (default: /webhook)
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Settings that drive the webhook validator.
#[derive(Debug, Deserialize)]
pub struct ValidationConfig {
    /// Shared secret for HMAC-SHA256 signatures (default: empty)
    #[serde(
        rename = "webhook_secret",
        alias = "webhookSecret",
        default = "empty_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub secret: SecretString,

    /// Check the Repejo-Signature header (default: true)
    #[serde(
        rename = "validate_signature",
        alias = "validateSignature",
        default = "default_true"
    )]
    pub require_signature: bool,

    /// Event types to emit; empty means all (default: empty)
    #[serde(rename = "events", default)]
    pub subscribed_events: HashSet<EventType>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            webhook_path: default_webhook_path(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            secret: empty_secret(),
            require_signature: default_true(),
            subscribed_events: HashSet::new(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl ValidationConfig {
    /// Whether a non-empty secret is configured.
    pub fn has_secret(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// - `BIND_ADDR`, `WEBHOOK_PATH`
    /// - `REPEJO_EVENTS`: comma-separated event types
    /// - `REPEJO_WEBHOOK_SECRET`
    /// - `REPEJO_VALIDATE_SIGNATURE`: `true` or `false`
    /// - `METRICS_ENABLED`, `METRICS_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let mut validation = ValidationConfig::default();
        if let Some(events) = lookup("REPEJO_EVENTS") {
            validation.subscribed_events = parse_events(&events)?;
        }
        if let Some(secret) = lookup("REPEJO_WEBHOOK_SECRET") {
            validation.secret = SecretString::from(secret);
        }
        if let Some(flag) = lookup("REPEJO_VALIDATE_SIGNATURE") {
            validation.require_signature = parse_bool("REPEJO_VALIDATE_SIGNATURE", &flag)?;
        }

        let metrics = MetricsConfig {
            enabled: match lookup("METRICS_ENABLED") {
                Some(flag) => parse_bool("METRICS_ENABLED", &flag)?,
                None => defaults.metrics.enabled,
            },
            path: lookup("METRICS_PATH").unwrap_or(defaults.metrics.path),
        };

        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            webhook_path: lookup("WEBHOOK_PATH").unwrap_or(defaults.webhook_path),
            validation,
            metrics,
        })
    }
}

fn parse_events(raw: &str) -> Result<HashSet<EventType>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<EventType>().map_err(|e| ConfigError::InvalidValue {
                var: "REPEJO_EVENTS",
                reason: e.to_string(),
            })
        })
        .collect()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            var,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}
