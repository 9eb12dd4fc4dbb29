use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

use crate::models::Config;

pub mod extract;
pub mod screener_client;
pub mod user_agents;

pub use extract::{extract_valuation, ExtractError};
pub use screener_client::ScreenerClient;

/// Why a single fetch attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("base url {base} cannot hold a company path for {ticker}")]
    CannotBeABase { ticker: String, base: url::Url },
    #[error("unexpected page layout: {0}")]
    Extract(#[from] ExtractError),
}

/// Source of raw company pages, one request per call
#[async_trait]
pub trait QuotePageSource: Send + Sync {
    async fn fetch_page(&self, ticker: &str, user_agent: &str) -> Result<String, FetchError>;
}

/// Attempt budget and backoff for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            delay: Duration::from_secs(1),
            jitter: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retries: config.retries,
            delay: config.retry_delay,
            jitter: config.retry_jitter,
        }
    }

    /// Wait before the next attempt: `delay` plus uniform jitter in `[0, jitter)`
    pub fn backoff<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let jitter = rng.random_range(0.0..self.jitter.as_secs_f64());
        self.delay + Duration::from_secs_f64(jitter)
    }
}
