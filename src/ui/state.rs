use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::concurrent_fetcher::{FetchProgress, FetchStatus};
use crate::models::{QuoteSet, RefreshError, TickerQuote};

const MAX_LOG_MESSAGES: usize = 100;

/// What the dashboard is doing right now
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Idle,
    Fetching {
        started_at: DateTime<Utc>,
        completed: usize,
        total: usize,
    },
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log message with timestamp
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Session state of the dashboard
///
/// Holds the last committed [`QuoteSet`]. A refresh only replaces it when every
/// ticker came back populated.
#[derive(Debug, Clone)]
pub struct DashboardState {
    quote_set: Option<QuoteSet>,
    refresh_pending: bool,
    last_error: Option<String>,
    activity: Activity,
    log_messages: VecDeque<LogMessage>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            quote_set: None,
            refresh_pending: false,
            last_error: None,
            activity: Activity::Idle,
            log_messages: VecDeque::new(),
        }
    }

    pub fn quote_set(&self) -> Option<&QuoteSet> {
        self.quote_set.as_ref()
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.activity, Activity::Fetching { .. })
    }

    /// Mark that the operator asked for fresh data
    pub fn request_refresh(&mut self) {
        self.refresh_pending = true;
    }

    /// Nothing committed yet, or a refresh was requested
    pub fn needs_fetch(&self) -> bool {
        self.quote_set.is_none() || self.refresh_pending
    }

    pub fn begin_fetch(&mut self, total: usize) {
        self.activity = Activity::Fetching {
            started_at: Utc::now(),
            completed: 0,
            total,
        };
        self.add_log_message(LogLevel::Info, &format!("Fetching {} tickers...", total));
    }

    /// Fold a per-ticker progress event into the spinner counter and log
    pub fn record_progress(&mut self, progress: &FetchProgress) {
        if let Activity::Fetching { completed, total, .. } = &mut self.activity {
            if progress.status.is_final() {
                *completed = (*completed + 1).min(*total);
            }
        }

        match &progress.status {
            FetchStatus::Started => {}
            FetchStatus::Retrying { attempt, error } => self.add_log_message(
                LogLevel::Warning,
                &format!("{}: attempt {} failed ({}), retrying", progress.ticker, attempt, error),
            ),
            FetchStatus::Completed => {
                self.add_log_message(LogLevel::Success, &format!("{}: fetched", progress.ticker))
            }
            FetchStatus::Exhausted { attempts } => self.add_log_message(
                LogLevel::Error,
                &format!("{}: gave up after {} attempts", progress.ticker, attempts),
            ),
        }
    }

    /// Commit a finished fetch.
    ///
    /// On success the snapshot is replaced and the pending flag cleared. On
    /// failure the previous snapshot stays, the flag stays set and the error is
    /// kept for display.
    pub fn apply_refresh(
        &mut self,
        tickers: &[String],
        results: Vec<TickerQuote>,
    ) -> Result<&QuoteSet, RefreshError> {
        self.activity = Activity::Idle;

        match QuoteSet::from_results(tickers, results) {
            Ok(quote_set) => {
                self.refresh_pending = false;
                self.last_error = None;
                self.add_log_message(
                    LogLevel::Success,
                    &format!("Committed {} quotes", quote_set.len()),
                );
                Ok(self.quote_set.insert(quote_set))
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.add_log_message(LogLevel::Error, &e.to_string());
                Err(e)
            }
        }
    }

    /// Add a log message, keeping only the most recent ones
    pub fn add_log_message(&mut self, level: LogLevel, message: &str) {
        self.log_messages.push_back(LogMessage {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        });
        while self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.pop_front();
        }
    }

    /// Get recent log messages (last N), oldest first
    pub fn recent_logs(&self, count: usize) -> Vec<&LogMessage> {
        let skip = self.log_messages.len().saturating_sub(count);
        self.log_messages.iter().skip(skip).collect()
    }

    /// Get the current status text for display
    pub fn status_text(&self) -> String {
        match &self.activity {
            Activity::Fetching { started_at, completed, total } => {
                let elapsed = Utc::now() - *started_at;
                format!("Fetching {}/{} ({}s)", completed, total, elapsed.num_seconds())
            }
            Activity::Idle => match (&self.quote_set, &self.last_error) {
                (_, Some(_)) => "Last refresh failed".to_string(),
                (Some(set), None) => format!(
                    "Updated {} ({} tickers)",
                    set.committed_at().format("%Y-%m-%d %H:%M:%S UTC"),
                    set.len()
                ),
                (None, None) => "Ready".to_string(),
            },
        }
    }
}
