use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;

/// Token bucket with fractional tokens so refill is continuous.
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Takes one token, or returns how many seconds until one is available.
    fn try_take(&mut self, now: Instant) -> Result<(), u64> {
        self.refill(now);
        // epsilon for float drift
        if self.tokens + 1e-9 >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - self.tokens;
            Err(((missing / self.refill_per_sec).ceil() as u64).max(1))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

/// Per-key token buckets for the public contact and quote forms.
#[derive(Clone)]
pub struct FormRateLimiter {
    buckets: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
    idle_ttl: Duration,
}

impl FormRateLimiter {
    pub fn new(capacity: u32, refill_every: Duration, idle_ttl: Duration) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            capacity: capacity as f64,
            refill_per_sec: 1.0 / refill_every.as_secs_f64().max(0.001),
            idle_ttl,
        }
    }

    /// Five submissions in a burst, then one every two minutes.
    pub fn for_public_forms() -> Self {
        Self::new(5, Duration::from_secs(120), Duration::from_secs(3600))
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        if self.buckets.len() > 10_000 {
            self.evict_idle_at(now);
        }

        let bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec, now))))
            .clone();

        let mut bucket = bucket.lock();
        match bucket.try_take(now) {
            Ok(()) => RateDecision::Allowed,
            Err(retry_after_secs) => {
                tracing::debug!(key, retry_after_secs, "Form submission rate limited");
                RateDecision::Limited { retry_after_secs }
            }
        }
    }

    /// Drops buckets that have not been touched within the idle TTL.
    fn evict_idle_at(&self, now: Instant) {
        let ttl = self.idle_ttl;
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.lock().last_refill) <= ttl);
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_then_limited() {
        let limiter = FormRateLimiter::new(2, Duration::from_secs(60), Duration::from_secs(600));
        let now = Instant::now();
        assert_eq!(limiter.check_at("1.2.3.4", now), RateDecision::Allowed);
        assert_eq!(limiter.check_at("1.2.3.4", now), RateDecision::Allowed);
        assert_eq!(
            limiter.check_at("1.2.3.4", now),
            RateDecision::Limited { retry_after_secs: 60 }
        );
        // other keys have their own bucket
        assert_eq!(limiter.check_at("5.6.7.8", now), RateDecision::Allowed);
    }

    #[test]
    fn tokens_refill_over_time() {
        let limiter = FormRateLimiter::new(1, Duration::from_secs(10), Duration::from_secs(600));
        let now = Instant::now();
        assert_eq!(limiter.check_at("ip", now), RateDecision::Allowed);
        assert!(matches!(limiter.check_at("ip", now), RateDecision::Limited { .. }));
        assert_eq!(limiter.check_at("ip", now + Duration::from_secs(10)), RateDecision::Allowed);
    }

    #[test]
    fn idle_buckets_are_evicted() {
        let limiter = FormRateLimiter::new(1, Duration::from_secs(10), Duration::from_secs(60));
        let now = Instant::now();
        limiter.check_at("ip", now);
        assert_eq!(limiter.tracked_keys(), 1);
        limiter.evict_idle_at(now + Duration::from_secs(61));
        assert_eq!(limiter.tracked_keys(), 0);
    }
}
