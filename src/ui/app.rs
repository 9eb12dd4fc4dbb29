use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use super::dashboard::Dashboard;
use super::state::DashboardState;
use crate::api::{QuotePageSource, ScreenerClient};
use crate::concurrent_fetcher::{FetchProgress, QuoteFetcher};
use crate::models::{Config, TickerQuote};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Terminal dashboard: owns the session state and runs refreshes in the
/// background so the spinner keeps moving.
pub struct DashboardApp {
    tickers: Vec<String>,
    fetcher: QuoteFetcher<dyn QuotePageSource>,
    state: DashboardState,
    dashboard: Dashboard,
    progress_sender: broadcast::Sender<FetchProgress>,
    progress_receiver: broadcast::Receiver<FetchProgress>,
    results_sender: mpsc::UnboundedSender<Vec<TickerQuote>>,
    results_receiver: mpsc::UnboundedReceiver<Vec<TickerQuote>>,
    pub should_quit: bool,
}

impl DashboardApp {
    pub fn new(config: &Config, source: Arc<dyn QuotePageSource>) -> Self {
        let (progress_sender, progress_receiver) = broadcast::channel(256);
        let (results_sender, results_receiver) = mpsc::unbounded_channel();

        Self {
            tickers: config.tickers.clone(),
            fetcher: QuoteFetcher::from_config(source, config),
            state: DashboardState::new(),
            dashboard: Dashboard::new(),
            progress_sender,
            progress_receiver,
            results_sender,
            results_receiver,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        self.dashboard.render(f, area, &self.state);
    }

    /// Spawn a refresh unless one is running or nothing asks for it.
    ///
    /// Returns true when a fetch was started.
    pub fn start_refresh_if_needed(&mut self) -> bool {
        if self.state.is_fetching() || !self.state.needs_fetch() {
            return false;
        }

        info!("🔄 Refreshing {} tickers", self.tickers.len());
        // Drop events still queued from the previous fetch
        self.progress_receiver = self.progress_receiver.resubscribe();
        self.state.begin_fetch(self.tickers.len());

        let fetcher = self.fetcher.clone();
        let tickers = self.tickers.clone();
        let progress = self.progress_sender.clone();
        let results = self.results_sender.clone();
        tokio::spawn(async move {
            let quotes = fetcher.fetch_all_with_progress(&tickers, Some(&progress)).await;
            // Receiver only goes away when the app is shutting down
            let _ = results.send(quotes);
        });

        true
    }

    /// Drain progress events and commit a finished refresh
    pub fn poll_background(&mut self) {
        loop {
            match self.progress_receiver.try_recv() {
                Ok(progress) => self.state.record_progress(&progress),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    info!("Skipped {} progress events", skipped);
                }
                Err(_) => break,
            }
        }

        while let Ok(results) = self.results_receiver.try_recv() {
            match self.state.apply_refresh(&self.tickers, results) {
                Ok(quote_set) => info!("✅ Committed {} quotes", quote_set.len()),
                Err(e) => warn!("Refresh rejected: {}", e),
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.state.request_refresh();
                self.start_refresh_if_needed();
            }
            _ => {}
        }
    }

    pub fn tick(&mut self) {
        self.dashboard.tick();
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_background();
            terminal.draw(|f| self.draw(f))?;

            if tokio::task::block_in_place(|| event::poll(TICK_RATE))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key.code);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }

            self.tick();
            tokio::task::yield_now().await;
        }
    }
}

/// Run the dashboard until the operator quits
pub async fn run_app(config: Config) -> Result<()> {
    let source: Arc<dyn QuotePageSource> = Arc::new(ScreenerClient::new(&config)?);
    let mut app = DashboardApp::new(&config, source);

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Initial data load
    app.start_refresh_if_needed();
    let result = app.event_loop(&mut terminal).await;

    // Cleanup terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
