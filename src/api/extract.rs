//! Field extraction from screener.in company pages
//!
//! Selectors are positional and tied to the current page layout, so all of
//! the scraping rules live here and nowhere else.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::models::Valuation;

/// Header block holding the current price, e.g. `₹ 1,234.50 (+1.2%)`.
/// The class attribute must match exactly; siblings with extra classes are skipped.
const PRICE_SELECTOR: &str = r#"div[class="flex flex-align-center"]"#;
/// Rows of the top ratios list, same exact-class rule
const RATIO_SELECTOR: &str = r#"li[class="flex flex-space-between"]"#;
/// Stock P/E is the fourth ratio row
const PE_ROW_INDEX: usize = 3;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    #[error("no element matches {0}")]
    MissingElement(&'static str),
    #[error("{field} text {text:?} has no value token")]
    MissingToken { field: &'static str, text: String },
    #[error("{field} value {raw:?} is not a number")]
    InvalidNumber { field: &'static str, raw: String },
    #[error("selector {selector} does not parse: {reason}")]
    InvalidSelector { selector: &'static str, reason: String },
}

/// Extract price and P/E ratio from a company page
pub fn extract_valuation(html: &str) -> Result<Valuation, ExtractError> {
    let document = Html::parse_document(html);

    let price_block = document
        .select(&selector(PRICE_SELECTOR)?)
        .next()
        .ok_or(ExtractError::MissingElement(PRICE_SELECTOR))?;
    let price = parse_price(&element_text(price_block))?;

    let pe_row = document
        .select(&selector(RATIO_SELECTOR)?)
        .nth(PE_ROW_INDEX)
        .ok_or(ExtractError::MissingElement(RATIO_SELECTOR))?;
    let pe_ratio = parse_pe_ratio(&element_text(pe_row))?;

    Ok(Valuation { price, pe_ratio })
}

/// Second whitespace token with thousands separators removed
pub fn parse_price(text: &str) -> Result<f64, ExtractError> {
    let token = text.split_whitespace().nth(1).ok_or_else(|| ExtractError::MissingToken {
        field: "price",
        text: text.to_string(),
    })?;
    parse_number("price", &token.replace(',', ""))
}

/// Last whitespace token of the ratio row
pub fn parse_pe_ratio(text: &str) -> Result<f64, ExtractError> {
    let token = text.split_whitespace().last().ok_or_else(|| ExtractError::MissingToken {
        field: "pe_ratio",
        text: text.to_string(),
    })?;
    parse_number("pe_ratio", token)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ExtractError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExtractError::InvalidNumber {
            field,
            raw: raw.to_string(),
        }),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css,
        reason: e.to_string(),
    })
}
