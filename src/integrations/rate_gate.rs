use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Enforces each integration's stored per-minute call budget.
///
/// Dispatch asks the gate before every outgoing call; once a platform's
/// budget for the current minute window is spent, further calls are refused
/// until the window rolls over.
#[derive(Clone, Default)]
pub struct RateGate {
    inner: Arc<Mutex<HashMap<String, Window>>>,
}

struct Window {
    started: Instant,
    used: u32,
}

const WINDOW: Duration = Duration::from_secs(60);

impl RateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to spend one call from the platform's minute budget.
    /// Returns false when the budget is exhausted.
    pub async fn try_acquire(&self, platform: &str, limit_per_min: u32) -> bool {
        if limit_per_min == 0 {
            return false;
        }

        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        let window = inner.entry(platform.to_string()).or_insert(Window {
            started: now,
            used: 0,
        });

        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.used = 0;
        }

        if window.used >= limit_per_min {
            tracing::warn!(
                platform,
                limit_per_min,
                "Rate gate: minute budget exhausted, refusing dispatch"
            );
            return false;
        }

        window.used += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_budget_spends_down() {
        let gate = RateGate::new();

        assert!(gate.try_acquire("EU_ETS", 2).await);
        assert!(gate.try_acquire("EU_ETS", 2).await);
        assert!(!gate.try_acquire("EU_ETS", 2).await);
    }

    #[tokio::test]
    async fn test_platforms_are_independent() {
        let gate = RateGate::new();

        assert!(gate.try_acquire("EU_ETS", 1).await);
        assert!(!gate.try_acquire("EU_ETS", 1).await);
        assert!(gate.try_acquire("VERRA", 1).await);
    }

    #[tokio::test]
    async fn test_zero_limit_refuses_everything() {
        let gate = RateGate::new();
        assert!(!gate.try_acquire("STRIPE", 0).await);
    }
}
