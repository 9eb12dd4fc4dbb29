//! Plain output of a committed snapshot for the `fetch` command

use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

use crate::models::QuoteSet;
use crate::ui::components::format_optional;

/// Output format for `fetch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

pub fn write_report<W: Write>(writer: &mut W, quote_set: &QuoteSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(writer, quote_set),
        OutputFormat::Csv => write_csv(writer, quote_set),
        OutputFormat::Json => write_json(writer, quote_set),
    }
}

/// Aligned text table with the dashboard's columns
pub fn write_table<W: Write>(writer: &mut W, quote_set: &QuoteSet) -> Result<()> {
    let ticker_width = quote_set
        .quotes()
        .iter()
        .map(|q| q.ticker.len())
        .max()
        .unwrap_or(0)
        .max("Ticker".len());

    writeln!(writer, "{:<ticker_width$}  {:>12}  {:>10}", "Ticker", "Price", "PE Ratio")?;
    writeln!(writer, "{}", "-".repeat(ticker_width + 26))?;
    for quote in quote_set.quotes() {
        writeln!(
            writer,
            "{:<ticker_width$}  {:>12}  {:>10}",
            quote.ticker,
            format_optional(quote.price()),
            format_optional(quote.pe_ratio()),
        )?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(writer: &mut W, quote_set: &QuoteSet) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if quote_set.is_empty() {
        csv_writer.write_record(["Ticker", "Price", "PE Ratio"])?;
    }
    for row in quote_set.rows() {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, quote_set: &QuoteSet) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &quote_set.rows())?;
    writeln!(writer)?;
    Ok(())
}
