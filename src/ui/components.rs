/// UI components and utilities for the quote dashboard
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{QuoteSet, TickerQuote};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Chart values are stored in hundredths so two decimals survive the u64 bars
const BAR_SCALE: f64 = 100.0;

/// Which value a bar chart shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Price,
    PeRatio,
}

impl Metric {
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Price => "Stock Price Distribution",
            Metric::PeRatio => "PE Ratio Distribution",
        }
    }

    fn value(&self, quote: &TickerQuote) -> Option<f64> {
        match self {
            Metric::Price => quote.price(),
            Metric::PeRatio => quote.pe_ratio(),
        }
    }
}

/// One bar of a chart keyed by ticker
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: u64,
    pub text: String,
}

/// Bars for `metric`, one per populated quote in snapshot order.
///
/// Negative values (loss-making companies have a negative P/E) draw as empty
/// bars but keep their printed value.
pub fn chart_bars(quote_set: &QuoteSet, metric: Metric) -> Vec<ChartBar> {
    quote_set
        .quotes()
        .iter()
        .filter_map(|quote| {
            metric.value(quote).map(|value| ChartBar {
                label: quote.ticker.clone(),
                value: (value.max(0.0) * BAR_SCALE).round() as u64,
                text: format_value(value),
            })
        })
        .collect()
}

/// Table cells: ticker, price, P/E
pub fn table_rows(quote_set: &QuoteSet) -> Vec<[String; 3]> {
    quote_set
        .quotes()
        .iter()
        .map(|quote| {
            [
                quote.ticker.clone(),
                format_optional(quote.price()),
                format_optional(quote.pe_ratio()),
            ]
        })
        .collect()
}

pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "-".to_string())
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, tick: usize, message: &str) {
    let loading = Paragraph::new(Line::from(vec![
        Span::styled(spinner_frame(tick), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Loading"));

    f.render_widget(loading, area);
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let error_paragraph = Paragraph::new(error.to_string())
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area);
}

/// Render a centered placeholder inside a titled box
pub fn render_placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let placeholder = Paragraph::new(message.to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(placeholder, area);
}
