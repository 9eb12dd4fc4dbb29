use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// NIFTY 50 constituents tracked by default
pub const NIFTY_TICKERS: [&str; 10] = [
    "SUNPHARMA", "TCS", "TATACONSUM", "TATAMOTORS", "TATASTEEL",
    "TECHM", "TITAN", "TRENT", "ULTRACEMCO", "WIPRO",
];

pub const DEFAULT_BASE_URL: &str = "https://www.screener.in";

/// Price and P/E ratio scraped for one ticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub price: f64,
    pub pe_ratio: f64,
}

/// One fetch result per ticker.
///
/// Both fields are present or both are absent: an exhausted fetch keeps
/// `valuation` as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerQuote {
    pub ticker: String,
    pub valuation: Option<Valuation>,
}

impl TickerQuote {
    pub fn populated(ticker: impl Into<String>, valuation: Valuation) -> Self {
        Self {
            ticker: ticker.into(),
            valuation: Some(valuation),
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            valuation: None,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.valuation.map(|v| v.price)
    }

    pub fn pe_ratio(&self) -> Option<f64> {
        self.valuation.map(|v| v.pe_ratio)
    }

    pub fn is_populated(&self) -> bool {
        self.valuation.is_some()
    }
}

/// Flat row used for CSV/JSON output, column names match the dashboard table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteRow {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "PE Ratio")]
    pub pe_ratio: Option<f64>,
}

impl From<&TickerQuote> for QuoteRow {
    fn from(quote: &TickerQuote) -> Self {
        Self {
            ticker: quote.ticker.clone(),
            price: quote.price(),
            pe_ratio: quote.pe_ratio(),
        }
    }
}

/// Why a refresh could not be committed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RefreshError {
    #[error("Failed to fetch complete data for {}. Please try refreshing.", .missing.join(", "))]
    Incomplete { missing: Vec<String> },
    #[error("expected results for {expected:?}, got {actual:?}")]
    Mismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Committed snapshot of every ticker's latest valuation
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSet {
    quotes: Vec<TickerQuote>,
    committed_at: DateTime<Utc>,
}

impl QuoteSet {
    /// Validate a full fetch against the requested ticker list.
    ///
    /// Results must line up one-to-one with `tickers` and every record must be
    /// populated, otherwise nothing is committed.
    pub fn from_results(tickers: &[String], results: Vec<TickerQuote>) -> Result<Self, RefreshError> {
        let lined_up = results.len() == tickers.len()
            && results.iter().zip(tickers).all(|(quote, ticker)| &quote.ticker == ticker);
        if !lined_up {
            return Err(RefreshError::Mismatch {
                expected: tickers.to_vec(),
                actual: results.into_iter().map(|q| q.ticker).collect(),
            });
        }

        let missing: Vec<String> = results
            .iter()
            .filter(|q| !q.is_populated())
            .map(|q| q.ticker.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RefreshError::Incomplete { missing });
        }

        Ok(Self {
            quotes: results,
            committed_at: Utc::now(),
        })
    }

    pub fn quotes(&self) -> &[TickerQuote] {
        &self.quotes
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn rows(&self) -> Vec<QuoteRow> {
        self.quotes.iter().map(QuoteRow::from).collect()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub tickers: Vec<String>,
    pub retries: u32,
    pub retry_delay: Duration,
    pub retry_jitter: Duration,
    pub request_timeout: Duration,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            tickers: NIFTY_TICKERS.iter().map(|t| t.to_string()).collect(),
            retries: 5,
            retry_delay: Duration::from_secs(1),
            retry_jitter: Duration::from_secs(2),
            request_timeout: Duration::from_secs(15),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup, unset variables keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("SCREENER_BASE_URL") {
            config.base_url = Url::parse(value.trim()).map_err(|e| invalid("SCREENER_BASE_URL", &value, e))?;
        }

        if let Some(value) = lookup("NIFTY_TICKERS") {
            let tickers: Vec<String> = value
                .split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect();
            if tickers.is_empty() {
                return Err(invalid("NIFTY_TICKERS", &value, "no tickers listed"));
            }
            config.tickers = tickers;
        }

        if let Some(value) = lookup("FETCH_RETRIES") {
            let retries: u32 = value.trim().parse().map_err(|e| invalid("FETCH_RETRIES", &value, e))?;
            if retries == 0 {
                return Err(invalid("FETCH_RETRIES", &value, "at least one attempt is required"));
            }
            config.retries = retries;
        }

        if let Some(value) = lookup("FETCH_DELAY_SECS") {
            config.retry_delay = parse_secs("FETCH_DELAY_SECS", &value)?;
        }
        if let Some(value) = lookup("FETCH_JITTER_SECS") {
            config.retry_jitter = parse_secs("FETCH_JITTER_SECS", &value)?;
        }
        if let Some(value) = lookup("REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("REQUEST_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = lookup("FETCH_SEED") {
            config.seed = Some(value.trim().parse().map_err(|e| invalid("FETCH_SEED", &value, e))?);
        }

        Ok(config)
    }
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = value.trim().parse().map_err(|e| invalid(name, value, e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| invalid(name, value, e))
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
