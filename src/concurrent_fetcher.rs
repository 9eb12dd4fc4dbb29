//! Concurrent quote fetching module
//!
//! Each ticker runs its own retry loop. All loops are polled together inside
//! the caller's task and share the source's connection pool; the aggregate
//! resolves only once every ticker has either succeeded or run out of
//! attempts.

use futures::future::join_all;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    api::{extract_valuation, user_agents, FetchError, QuotePageSource, RetryPolicy},
    models::{Config, TickerQuote},
};

/// Progress update for one ticker
#[derive(Debug, Clone, PartialEq)]
pub struct FetchProgress {
    pub ticker: String,
    pub status: FetchStatus,
}

/// Status of a per-ticker fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Started,
    Retrying { attempt: u32, error: String },
    Completed,
    Exhausted { attempts: u32 },
}

impl FetchStatus {
    /// True once the ticker will produce no more events
    pub fn is_final(&self) -> bool {
        matches!(self, FetchStatus::Completed | FetchStatus::Exhausted { .. })
    }
}

/// Fans a ticker list out over one page source
pub struct QuoteFetcher<S: ?Sized> {
    source: Arc<S>,
    policy: RetryPolicy,
    seed: Option<u64>,
}

impl<S: ?Sized> Clone for QuoteFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            policy: self.policy.clone(),
            seed: self.seed,
        }
    }
}

impl<S: QuotePageSource + ?Sized> QuoteFetcher<S> {
    pub fn new(source: Arc<S>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            seed: None,
        }
    }

    pub fn from_config(source: Arc<S>, config: &Config) -> Self {
        Self::new(source, RetryPolicy::from_config(config)).with_seed(config.seed)
    }

    /// Fix the RNG seed for user agents and jitter
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Fetch every ticker concurrently, results come back in ticker order
    pub async fn fetch_all(&self, tickers: &[String]) -> Vec<TickerQuote> {
        self.fetch_all_with_progress(tickers, None).await
    }

    /// Fetch every ticker concurrently and publish per-ticker progress
    pub async fn fetch_all_with_progress(
        &self,
        tickers: &[String],
        progress: Option<&broadcast::Sender<FetchProgress>>,
    ) -> Vec<TickerQuote> {
        info!("🚀 Fetching {} tickers", tickers.len());

        let mut master = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let tasks = tickers.iter().map(|ticker| {
            let mut rng = StdRng::from_rng(&mut master);
            async move {
                fetch_price_and_pe(self.source.as_ref(), ticker, &self.policy, &mut rng, progress).await
            }
        });
        let results = join_all(tasks).await;

        let populated = results.iter().filter(|q| q.is_populated()).count();
        info!("✅ Fetch completed: {} of {} tickers populated", populated, results.len());
        results
    }
}

/// Fetch price and P/E for one ticker with retry and randomized backoff.
///
/// Never fails: once `policy.retries` attempts are spent the result is an
/// empty [`TickerQuote`].
pub async fn fetch_price_and_pe<S: QuotePageSource + ?Sized>(
    source: &S,
    ticker: &str,
    policy: &RetryPolicy,
    rng: &mut StdRng,
    progress: Option<&broadcast::Sender<FetchProgress>>,
) -> TickerQuote {
    emit(progress, ticker, FetchStatus::Started);

    for attempt in 1..=policy.retries {
        let user_agent = user_agents::random(rng);
        let outcome = match source.fetch_page(ticker, user_agent).await {
            Ok(html) => extract_valuation(&html).map_err(FetchError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(valuation) => {
                debug!("{} fetched on attempt {}: {:?}", ticker, attempt, valuation);
                emit(progress, ticker, FetchStatus::Completed);
                return TickerQuote::populated(ticker, valuation);
            }
            Err(e) if attempt == policy.retries => {
                warn!("❌ {} failed after {} attempts: {}", ticker, attempt, e);
            }
            Err(e) => {
                let wait = policy.backoff(rng);
                warn!("Attempt {} failed for {}: {}. Retrying in {:.2}s...", attempt, ticker, e, wait.as_secs_f64());
                emit(
                    progress,
                    ticker,
                    FetchStatus::Retrying {
                        attempt,
                        error: e.to_string(),
                    },
                );
                tokio::time::sleep(wait).await;
            }
        }
    }

    emit(progress, ticker, FetchStatus::Exhausted { attempts: policy.retries });
    TickerQuote::empty(ticker)
}

fn emit(progress: Option<&broadcast::Sender<FetchProgress>>, ticker: &str, status: FetchStatus) {
    if let Some(sender) = progress {
        // No subscribers is fine
        let _ = sender.send(FetchProgress {
            ticker: ticker.to_string(),
            status,
        });
    }
}
