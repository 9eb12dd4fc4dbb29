//! Fetch, validate and render against a mock screener.in

use pretty_assertions::assert_eq;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use test_log::test;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::fixtures::{company_path, mount_company_page, test_config};
use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use nifty_stocks::api::ScreenerClient;
use nifty_stocks::concurrent_fetcher::QuoteFetcher;
use nifty_stocks::models::RefreshError;
use nifty_stocks::ui::components::{chart_bars, table_rows, Metric};
use nifty_stocks::ui::{Dashboard, DashboardState};

#[test(tokio::test)]
async fn test_two_tickers_end_to_end() {
    init_test_logging();
    log_test_step("Refreshing TCS and WIPRO from the mock server");

    let server = MockServer::start().await;
    mount_company_page(&server, "TCS", "₹ 4,123.50 (+0.8%)", "31.2").await;
    mount_company_page(&server, "WIPRO", "₹ 301.05 (-0.4%)", "24.8").await;

    let config = test_config(&server, &["TCS", "WIPRO"], 5);
    let fetcher = QuoteFetcher::from_config(Arc::new(ScreenerClient::new(&config).unwrap()), &config);

    let results = fetcher.fetch_all(&config.tickers).await;
    log_test_data("Fetch results", &results);

    let mut state = DashboardState::new();
    let quote_set = state.apply_refresh(&config.tickers, results).unwrap().clone();

    assert_eq!(quote_set.len(), 2);
    assert!(quote_set.quotes().iter().all(|q| q.is_populated()));
    assert_eq!(quote_set.quotes()[0].price(), Some(4123.50));
    assert_eq!(quote_set.quotes()[1].pe_ratio(), Some(24.8));

    assert_eq!(table_rows(&quote_set).len(), 2);
    for metric in [Metric::Price, Metric::PeRatio] {
        let labels: Vec<String> = chart_bars(&quote_set, metric).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["TCS".to_string(), "WIPRO".to_string()]);
    }

    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    let dashboard = Dashboard::new();
    terminal
        .draw(|f| {
            let area = f.area();
            dashboard.render(f, area, &state);
        })
        .unwrap();
    let rendered: String = terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(rendered.contains("TCS"));
    assert!(rendered.contains("WIPRO"));
    assert!(rendered.contains("4123.50"));
}

#[test(tokio::test)]
async fn test_failed_ticker_keeps_previous_snapshot() {
    init_test_logging();

    let server = MockServer::start().await;
    mount_company_page(&server, "TCS", "₹ 4,123.50", "31.2").await;
    mount_company_page(&server, "WIPRO", "₹ 301.05", "24.8").await;

    let config = test_config(&server, &["TCS", "WIPRO"], 2);
    let fetcher = QuoteFetcher::from_config(Arc::new(ScreenerClient::new(&config).unwrap()), &config);

    let mut state = DashboardState::new();
    let first = fetcher.fetch_all(&config.tickers).await;
    state.apply_refresh(&config.tickers, first).unwrap();
    let committed = state.quote_set().cloned();

    log_test_step("Taking WIPRO offline");
    server.reset().await;
    mount_company_page(&server, "TCS", "₹ 4,200.00", "32.0").await;
    Mock::given(method("GET"))
        .and(path(company_path("WIPRO")))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    state.request_refresh();
    let second = fetcher.fetch_all(&config.tickers).await;
    let err = state.apply_refresh(&config.tickers, second).unwrap_err();

    assert_eq!(err, RefreshError::Incomplete { missing: vec!["WIPRO".to_string()] });
    assert_eq!(state.quote_set().cloned(), committed);
    assert!(state.refresh_pending());
    assert_eq!(state.quote_set().unwrap().quotes()[0].price(), Some(4123.50));
}
