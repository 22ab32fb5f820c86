use super::rate_limiter::{BiasRateLimiter, Decision};
use crate::domain::grid::{GridData, Letter};
use crate::error::{AppError, Result};
use std::time::{Duration, Instant};
use tracing::warn;

/// Request/response grid generation with biased requests gated by a
/// [`BiasRateLimiter`].
#[derive(Debug)]
pub struct GridGenerator {
    limiter: BiasRateLimiter,
}

impl GridGenerator {
    pub fn new(bias_window: Duration) -> Self {
        Self {
            limiter: BiasRateLimiter::new(bias_window),
        }
    }

    pub fn request(&self, bias: Option<Letter>, now: Instant) -> Result<GridData> {
        if let Some(letter) = bias
            && self.limiter.check_and_record(now) == Decision::Reject
        {
            warn!(bias = %letter, "bias request rejected by rate limiter");
            return Err(AppError::RateLimited {
                wait_secs: self.limiter.window().as_secs_f64().ceil() as u64,
            });
        }

        Ok(GridData::generate(bias))
    }
}
