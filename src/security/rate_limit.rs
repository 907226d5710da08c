//! Per-client sliding window rate limiting.

use std::collections::VecDeque;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Sliding window limiter keyed by client identifier (the peer IP).
///
/// Each client keeps the instants of its admitted requests inside the
/// window. The DashMap entry lock serializes the prune/count/append
/// sequence per key, so two concurrent requests from the same client cannot
/// both be admitted on a stale count.
pub struct RateLimiter {
    clients: DashMap<String, VecDeque<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            max_requests: max_requests as usize,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Admit or reject one request from `client_id`, recording it if admitted.
    pub fn is_allowed(&self, client_id: &str) -> bool {
        self.is_allowed_at(client_id, Instant::now())
    }

    pub fn is_allowed_at(&self, client_id: &str, now: Instant) -> bool {
        let mut history = self.clients.entry(client_id.to_string()).or_default();
        prune(&mut history, now, self.window);

        if history.len() >= self.max_requests {
            return false;
        }
        history.push_back(now);
        true
    }

    /// Drop clients with no requests left in the window. Returns how many
    /// were removed.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, history| {
            prune(history, now, self.window);
            !history.is_empty()
        });
        before.saturating_sub(self.clients.len())
    }

    /// Number of client keys currently held.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// Remove entries at least one window old. The deque is in arrival order.
fn prune(history: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = history.front() {
        if now.saturating_duration_since(oldest) >= window {
            history.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_burst_then_reject() {
        let limiter = RateLimiter::new(2, WINDOW);
        assert!(limiter.is_allowed("c1"));
        assert!(limiter.is_allowed("c1"));
        assert!(!limiter.is_allowed("c1"));
        // Independent counter per client.
        assert!(limiter.is_allowed("c2"));
    }

    #[test]
    fn test_capacity_frees_one_slot_at_a_time() {
        let limiter = RateLimiter::new(2, WINDOW);
        let t0 = Instant::now();

        assert!(limiter.is_allowed_at("c1", t0));
        assert!(limiter.is_allowed_at("c1", t0 + Duration::from_secs(10)));
        assert!(!limiter.is_allowed_at("c1", t0 + Duration::from_secs(20)));

        // Still inside the window of the first request.
        assert!(!limiter.is_allowed_at("c1", t0 + Duration::from_secs(59)));

        // First request aged out: exactly one slot opens.
        let t1 = t0 + Duration::from_secs(60);
        assert!(limiter.is_allowed_at("c1", t1));
        assert!(!limiter.is_allowed_at("c1", t1));

        // Second request ages out at t0 + 70s.
        assert!(limiter.is_allowed_at("c1", t0 + Duration::from_secs(70)));
    }

    #[test]
    fn test_rejected_calls_are_not_recorded() {
        let limiter = RateLimiter::new(1, WINDOW);
        let t0 = Instant::now();

        assert!(limiter.is_allowed_at("c1", t0));
        for s in 1..30 {
            assert!(!limiter.is_allowed_at("c1", t0 + Duration::from_secs(s)));
        }
        // Denials did not extend the window.
        assert!(limiter.is_allowed_at("c1", t0 + WINDOW));
    }

    #[test]
    fn test_evict_idle() {
        let limiter = RateLimiter::new(5, WINDOW);
        let t0 = Instant::now();

        limiter.is_allowed_at("old", t0);
        limiter.is_allowed_at("fresh", t0 + Duration::from_secs(50));
        assert_eq!(limiter.tracked_clients(), 2);

        assert_eq!(limiter.evict_idle_at(t0 + Duration::from_secs(61)), 1);
        assert_eq!(limiter.tracked_clients(), 1);

        assert_eq!(limiter.evict_idle_at(t0 + Duration::from_secs(200)), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_concurrent_same_client_respects_quota() {
        let limiter = Arc::new(RateLimiter::new(10, WINDOW));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..10).filter(|_| limiter.is_allowed("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }
}
