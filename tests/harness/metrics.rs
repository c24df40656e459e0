// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for attack simulation results.

use repejo_webhook::RejectionReason;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Start time of the attack
    start_time: Option<Instant>,
    /// End time of the attack
    end_time: Option<Instant>,
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Emitted,
    Suppressed,
    MissingSignature,
    InvalidSignature,
    MalformedTimestamp,
    Stale,
    MalformedEventType,
    MalformedPayload,
}

impl Outcome {
    /// Classify a validator result.
    pub fn classify<T>(result: &Result<Vec<T>, RejectionReason>) -> Self {
        match result {
            Ok(events) if events.is_empty() => Outcome::Suppressed,
            Ok(_) => Outcome::Emitted,
            Err(RejectionReason::MissingSignature) => Outcome::MissingSignature,
            Err(RejectionReason::InvalidSignature) => Outcome::InvalidSignature,
            Err(RejectionReason::MalformedTimestamp(_)) => Outcome::MalformedTimestamp,
            Err(RejectionReason::StaleWebhook { .. }) => Outcome::Stale,
            Err(RejectionReason::MalformedEventType(_)) => Outcome::MalformedEventType,
            Err(RejectionReason::MalformedPayload(_)) => Outcome::MalformedPayload,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Emitted | Outcome::Suppressed)
    }
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of an attack.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Mark the end of an attack.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get duration of the attack.
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Requests that got past every check (emitted or suppressed).
    pub fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_accepted())
            .map(|(_, count)| count)
            .sum()
    }

    /// Get block rate (ratio of rejected to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.accepted()) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            emitted: self.count(Outcome::Emitted),
            suppressed: self.count(Outcome::Suppressed),
            signature_failed: self.count(Outcome::MissingSignature)
                + self.count(Outcome::InvalidSignature),
            replay_blocked: self.count(Outcome::Stale),
            malformed: self.count(Outcome::MalformedTimestamp)
                + self.count(Outcome::MalformedEventType)
                + self.count(Outcome::MalformedPayload),
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub emitted: usize,
    pub suppressed: usize,
    pub signature_failed: usize,
    pub replay_blocked: usize,
    pub malformed: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Emitted:           {}", self.emitted)?;
        writeln!(f, "Suppressed:        {}", self.suppressed)?;
        writeln!(f, "Signature Failed:  {}", self.signature_failed)?;
        writeln!(f, "Replay Blocked:    {}", self.replay_blocked)?;
        writeln!(f, "Malformed:         {}", self.malformed)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Latency ---")?;
        writeln!(f, "Median:            {} us", self.median_latency_us)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.start();

        metrics.record(Outcome::Emitted, Duration::from_micros(100));
        metrics.record(Outcome::Suppressed, Duration::from_micros(150));
        metrics.record(Outcome::Stale, Duration::from_micros(50));

        metrics.finish();

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.accepted(), 2);
        assert_eq!(metrics.report().replay_blocked, 1);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Emitted, Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(Outcome::InvalidSignature, Duration::ZERO);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }

    #[test]
    fn test_classify_suppressed_is_not_rejection() {
        let suppressed: Result<Vec<()>, RejectionReason> = Ok(Vec::new());
        assert_eq!(Outcome::classify(&suppressed), Outcome::Suppressed);
        assert!(Outcome::Suppressed.is_accepted());
    }
}
