use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::components::{self, chart_bars, table_rows, Metric};
use super::state::{Activity, DashboardState, LogLevel};
use crate::models::QuoteSet;

pub const TITLE: &str = "📈 NIFTY 50 Stock Prices and PE Ratios";
pub const DESCRIPTION: &str = "An interactive dashboard to view the latest prices and PE ratios of NIFTY 50 stocks. \
Data is fetched live from Screener (https://www.screener.in).";
pub const FETCH_MESSAGE: &str = "Fetching stock prices and PE ratios...";

/// Renders the quote dashboard from a [`DashboardState`]
#[derive(Debug, Default)]
pub struct Dashboard {
    spinner_tick: usize,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spinner animation
    pub fn tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &DashboardState) {
        let banner_height = if state.is_fetching() || state.last_error().is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),             // Title and description
                Constraint::Length(banner_height), // Spinner or error
                Constraint::Min(0),                // Table and charts
                Constraint::Length(3),             // Key hints
            ])
            .split(area);

        self.render_header(f, chunks[0]);

        match state.activity() {
            Activity::Fetching { completed, total, .. } => components::render_loading_indicator(
                f,
                chunks[1],
                self.spinner_tick,
                &format!("{} {}/{}", FETCH_MESSAGE, completed, total),
            ),
            Activity::Idle => {
                if let Some(error) = state.last_error() {
                    components::render_error(f, chunks[1], error);
                }
            }
        }

        match state.quote_set() {
            Some(quote_set) => self.render_quotes(f, chunks[2], quote_set, state),
            None => self.render_empty(f, chunks[2], state),
        }

        self.render_status_bar(f, chunks[3], state);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                TITLE,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(DESCRIPTION),
        ])
        .block(Block::default().borders(Borders::BOTTOM))
        .wrap(Wrap { trim: true });

        f.render_widget(header, area);
    }

    fn render_quotes(&self, f: &mut Frame, area: Rect, quote_set: &QuoteSet, state: &DashboardState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(columns[0]);
        self.render_table(f, left[0], quote_set);
        self.render_log(f, left[1], state);

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        self.render_chart(f, charts[0], quote_set, Metric::Price);
        self.render_chart(f, charts[1], quote_set, Metric::PeRatio);
    }

    fn render_empty(&self, f: &mut Frame, area: Rect, state: &DashboardState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.render_log(f, columns[0], state);
        let message = if state.is_fetching() { FETCH_MESSAGE } else { "No data yet. Press R to refresh." };
        components::render_placeholder(f, columns[1], "Quotes", message);
    }

    fn render_table(&self, f: &mut Frame, area: Rect, quote_set: &QuoteSet) {
        let header = Row::new(vec!["Ticker", "Price", "PE Ratio"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows = table_rows(quote_set)
            .into_iter()
            .map(|[ticker, price, pe]| Row::new(vec![Cell::from(ticker), Cell::from(price), Cell::from(pe)]));

        let table = Table::new(
            rows,
            [Constraint::Length(12), Constraint::Length(12), Constraint::Length(10)],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("📊 Current Stock Prices and PE Ratios"),
        );

        f.render_widget(table, area);
    }

    fn render_chart(&self, f: &mut Frame, area: Rect, quote_set: &QuoteSet, metric: Metric) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("📉 {}", metric.title()));

        let bars: Vec<Bar> = chart_bars(quote_set, metric)
            .into_iter()
            .map(|bar| {
                Bar::default()
                    .label(Line::from(bar.label))
                    .value(bar.value)
                    .text_value(bar.text)
            })
            .collect();

        let color = match metric {
            Metric::Price => Color::Green,
            Metric::PeRatio => Color::Blue,
        };

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(color))
            .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .data(BarGroup::default().bars(&bars));

        f.render_widget(chart, area);
    }

    fn render_log(&self, f: &mut Frame, area: Rect, state: &DashboardState) {
        let visible = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = state
            .recent_logs(visible)
            .into_iter()
            .map(|log| {
                let color = match log.level {
                    LogLevel::Info => Color::White,
                    LogLevel::Success => Color::Green,
                    LogLevel::Warning => Color::Yellow,
                    LogLevel::Error => Color::Red,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(log.timestamp.format("%H:%M:%S ").to_string(), Style::default().fg(Color::Gray)),
                    Span::styled(log.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Activity"));
        f.render_widget(list, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, state: &DashboardState) {
        let status = Paragraph::new(Line::from(vec![
            Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" 🔄 Refresh Data • ", Style::default().fg(Color::Gray)),
            Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" to quit • ", Style::default().fg(Color::Gray)),
            Span::styled(state.status_text(), Style::default().fg(Color::Cyan)),
        ]))
        .block(Block::default().borders(Borders::ALL));

        f.render_widget(status, area);
    }
}
