//! Snapshot validation over the default ticker list

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use test_log::test;

use nifty_stocks::models::{QuoteSet, RefreshError, TickerQuote, Valuation, NIFTY_TICKERS};

fn default_tickers() -> Vec<String> {
    NIFTY_TICKERS.iter().map(|t| t.to_string()).collect()
}

fn populated(ticker: &str, seed: f64) -> TickerQuote {
    TickerQuote::populated(ticker, Valuation { price: 100.0 + seed, pe_ratio: 10.0 + seed })
}

#[test]
fn test_default_list_has_ten_unique_tickers() {
    let tickers = default_tickers();
    let unique: HashSet<&String> = tickers.iter().collect();
    assert_eq!(tickers.len(), 10);
    assert_eq!(unique.len(), 10);
}

#[test]
fn test_full_refresh_yields_one_quote_per_ticker() {
    let tickers = default_tickers();
    let results = tickers.iter().enumerate().map(|(i, t)| populated(t, i as f64)).collect();

    let set = QuoteSet::from_results(&tickers, results).unwrap();

    let symbols: Vec<String> = set.quotes().iter().map(|q| q.ticker.clone()).collect();
    assert_eq!(symbols, tickers);
    for quote in set.quotes() {
        assert_eq!(quote.price().is_some(), quote.pe_ratio().is_some());
    }
}

#[test]
fn test_any_empty_record_rejects_the_refresh() {
    let tickers = default_tickers();
    for failing in 0..tickers.len() {
        let results = tickers
            .iter()
            .enumerate()
            .map(|(i, t)| if i == failing { TickerQuote::empty(t.as_str()) } else { populated(t, i as f64) })
            .collect();

        let err = QuoteSet::from_results(&tickers, results).unwrap_err();
        assert_eq!(err, RefreshError::Incomplete { missing: vec![tickers[failing].clone()] });
    }
}

#[test]
fn test_out_of_order_results_are_rejected() {
    let tickers = vec!["TCS".to_string(), "WIPRO".to_string()];
    let results = vec![populated("WIPRO", 1.0), populated("TCS", 2.0)];

    assert!(matches!(
        QuoteSet::from_results(&tickers, results),
        Err(RefreshError::Mismatch { .. })
    ));
}
