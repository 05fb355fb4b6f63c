//! Pipeline counters: cycles, alerts, deliveries, model failures and cycle latency.
//!
//! Counters are atomics so concurrent cycles record without locking;
//! [`PipelineMetrics::snapshot`] reads a consistent-enough view for reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vantage_core::errors::VantageResult;

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    cycles_started: AtomicU64,
    cycles_completed: AtomicU64,
    cycles_cancelled: AtomicU64,
    cycles_failed: AtomicU64,
    alerts_raised: AtomicU64,
    alerts_resolved: AtomicU64,
    deliveries_succeeded: AtomicU64,
    deliveries_failed: AtomicU64,
    model_failures: AtomicU64,
    completed_cycle_micros: AtomicU64,
}

/// Point-in-time copy of [`PipelineMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cycles_started: u64,
    pub cycles_completed: u64,
    pub cycles_cancelled: u64,
    pub cycles_failed: u64,
    pub alerts_raised: u64,
    pub alerts_resolved: u64,
    pub deliveries_succeeded: u64,
    pub deliveries_failed: u64,
    pub model_failures: u64,
    /// Mean wall time of completed cycles.
    pub avg_cycle_ms: f64,
}

impl MetricsSnapshot {
    /// Share of delivery attempts that succeeded; 1.0 before any attempt.
    pub fn delivery_success_rate(&self) -> f64 {
        let attempts = self.deliveries_succeeded + self.deliveries_failed;
        if attempts == 0 {
            return 1.0;
        }
        self.deliveries_succeeded as f64 / attempts as f64
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle_started(&self) {
        self.cycles_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how a cycle ended. Only completed cycles contribute to latency.
    pub fn record_cycle_finished(&self, outcome: CycleOutcome, elapsed: Duration) {
        match outcome {
            CycleOutcome::Completed => {
                self.cycles_completed.fetch_add(1, Ordering::Relaxed);
                let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
                self.completed_cycle_micros
                    .fetch_add(micros, Ordering::Relaxed);
            }
            CycleOutcome::Cancelled => {
                self.cycles_cancelled.fetch_add(1, Ordering::Relaxed);
            }
            CycleOutcome::Failed => {
                self.cycles_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_alerts(&self, raised: usize, resolved: usize) {
        self.alerts_raised.fetch_add(raised as u64, Ordering::Relaxed);
        self.alerts_resolved
            .fetch_add(resolved as u64, Ordering::Relaxed);
    }

    pub fn record_delivery(&self, delivered: bool) {
        let counter = if delivered {
            &self.deliveries_succeeded
        } else {
            &self.deliveries_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_model_failures(&self, count: usize) {
        self.model_failures
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let completed = self.cycles_completed.load(Ordering::Relaxed);
        let micros = self.completed_cycle_micros.load(Ordering::Relaxed);
        let avg_cycle_ms = if completed == 0 {
            0.0
        } else {
            micros as f64 / completed as f64 / 1000.0
        };
        MetricsSnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            cycles_completed: completed,
            cycles_cancelled: self.cycles_cancelled.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            alerts_resolved: self.alerts_resolved.load(Ordering::Relaxed),
            deliveries_succeeded: self.deliveries_succeeded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            model_failures: self.model_failures.load(Ordering::Relaxed),
            avg_cycle_ms,
        }
    }

    /// Serialize the current snapshot for export.
    pub fn to_json(&self) -> VantageResult<serde_json::Value> {
        Ok(serde_json::to_value(self.snapshot())?)
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in [
            &self.cycles_started,
            &self.cycles_completed,
            &self.cycles_cancelled,
            &self.cycles_failed,
            &self.alerts_raised,
            &self.alerts_resolved,
            &self.deliveries_succeeded,
            &self.deliveries_failed,
            &self.model_failures,
            &self.completed_cycle_micros,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
