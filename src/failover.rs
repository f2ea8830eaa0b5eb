//! Retry policy for generation calls

use std::time::Duration;
use log::debug;

/// Retry policy for failed requests
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   pub max_retries: usize
  , pub backoff_multiplier: f32
  , pub initial_backoff: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_retries: usize
    , backoff_multiplier: f32
    , initial_backoff_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_retries
          , backoff_multiplier
          , initial_backoff: Duration::from_millis(
              initial_backoff_ms
            )
        }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> usize
    {   self.max_retries + 1
    }

    /// Wait before retry number `retry` (1-based).
    /// With the defaults this is 2^retry seconds.
    pub fn backoff_for_attempt(
      &self
    , retry: usize
    ) -> Duration
    {   debug!("Calculating backoff for retry {}", retry);
        let multiplier
          = self.backoff_multiplier.powi(retry as i32);
        Duration::from_millis(
          (self.initial_backoff.as_millis() as f32
            * multiplier) as u64
        )
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::from(&crate::config::RetryConfig::default())
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy
{   fn from(config: &crate::config::RetryConfig) -> Self
    {   RetryPolicy::new(
          config.max_retries
        , config.backoff_multiplier
        , config.initial_backoff_ms
        )
    }
}
