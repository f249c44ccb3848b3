use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide counters, reported on `/health`.
#[derive(Default)]
pub struct Metrics {
    turns: AtomicU64,
    relay_requests: AtomicU64,
    relay_failures: AtomicU64,
    tool_rounds: AtomicU64,
    tool_executions: AtomicU64,
    tool_failures: AtomicU64,
    permission_denials: AtomicU64,
    malformed_arguments: AtomicU64,
    dropped_calls: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_turns(&self) {
        self.turns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_relay_requests(&self) {
        self.relay_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_relay_failures(&self) {
        self.relay_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_rounds(&self) {
        self.tool_rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_executions(&self) {
        self.tool_executions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_failures(&self) {
        self.tool_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_permission_denials(&self) {
        self.permission_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_malformed_arguments(&self) {
        self.malformed_arguments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_dropped_calls(&self) {
        self.dropped_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            turns: self.turns.load(Ordering::Relaxed),
            relay_requests: self.relay_requests.load(Ordering::Relaxed),
            relay_failures: self.relay_failures.load(Ordering::Relaxed),
            tool_rounds: self.tool_rounds.load(Ordering::Relaxed),
            tool_executions: self.tool_executions.load(Ordering::Relaxed),
            tool_failures: self.tool_failures.load(Ordering::Relaxed),
            permission_denials: self.permission_denials.load(Ordering::Relaxed),
            malformed_arguments: self.malformed_arguments.load(Ordering::Relaxed),
            dropped_calls: self.dropped_calls.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub turns: u64,
    pub relay_requests: u64,
    pub relay_failures: u64,
    pub tool_rounds: u64,
    pub tool_executions: u64,
    pub tool_failures: u64,
    pub permission_denials: u64,
    pub malformed_arguments: u64,
    pub dropped_calls: u64,
}

impl MetricsSnapshot {
    pub fn relay_success_rate(&self) -> f64 {
        if self.relay_requests == 0 {
            return 1.0;
        }
        1.0 - (self.relay_failures as f64 / self.relay_requests as f64)
    }

    pub fn tool_success_rate(&self) -> f64 {
        if self.tool_executions == 0 {
            return 1.0;
        }
        1.0 - (self.tool_failures as f64 / self.tool_executions as f64)
    }
}
