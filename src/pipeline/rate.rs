//! Rate limiting policy
//!
//! Pacing is a policy object handed to whoever talks to a rate-limited
//! resource (graph writes, the NCBI web API). It is not tied to how the
//! pipeline stages are ordered.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Token bucket allowing `n` operations per second, or no limit at all
#[derive(Clone, Default)]
pub struct RateLimit {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    per_second: u32,
}

impl RateLimit {
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// `0` means unlimited.
    pub fn per_second(per_second: u32) -> Self {
        match NonZeroU32::new(per_second) {
            Some(n) => Self {
                limiter: Some(Arc::new(RateLimiter::direct(Quota::per_second(n)))),
                per_second,
            },
            None => Self::unlimited(),
        }
    }

    pub fn from_option(per_second: Option<u32>) -> Self {
        per_second.map(Self::per_second).unwrap_or_default()
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until one more operation is allowed.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_limited() {
            write!(f, "RateLimit({}/s)", self.per_second)
        } else {
            write!(f, "RateLimit(unlimited)")
        }
    }
}
