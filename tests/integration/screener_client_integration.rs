//! Integration tests for the screener.in client against a mock server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use test_log::test;
use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::fixtures::{company_page, company_path, mount_company_page, test_config};
use crate::common::logging::{init_test_logging, log_test_step};
use nifty_stocks::api::{user_agents, FetchError, QuotePageSource, RetryPolicy, ScreenerClient};
use nifty_stocks::concurrent_fetcher::fetch_price_and_pe;

fn fast_policy(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        delay: Duration::ZERO,
        jitter: Duration::ZERO,
    }
}

#[test(tokio::test)]
async fn test_fetch_page_returns_body() {
    init_test_logging();
    log_test_step("Fetching a company page from the mock server");

    let server = MockServer::start().await;
    mount_company_page(&server, "TCS", "₹ 4,123.50", "31.2").await;

    let client = ScreenerClient::new(&test_config(&server, &["TCS"], 1)).unwrap();
    let body = client.fetch_page("TCS", user_agents::USER_AGENTS[0]).await.unwrap();

    assert_eq!(body, company_page("₹ 4,123.50", "31.2"));
}

#[test(tokio::test)]
async fn test_error_status_fails_the_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(company_path("TCS")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ScreenerClient::new(&test_config(&server, &["TCS"], 1)).unwrap();
    let result = client.fetch_page("TCS", user_agents::USER_AGENTS[0]).await;

    assert_matches!(result, Err(FetchError::Http(e)) if e.status().map(|s| s.as_u16()) == Some(503));
}

#[test(tokio::test)]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(company_path("TCS")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(company_page("₹ 1", "1"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        ScreenerClient::with_base_url(Url::parse(&server.uri()).unwrap(), Duration::from_millis(100)).unwrap();
    let result = client.fetch_page("TCS", user_agents::USER_AGENTS[0]).await;

    assert_matches!(result, Err(FetchError::Http(e)) if e.is_timeout());
}

#[test(tokio::test)]
async fn test_retries_until_page_is_served() {
    let server = MockServer::start().await;
    // First two attempts hit a server error, the third gets the page
    Mock::given(method("GET"))
        .and(path(company_path("WIPRO")))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(company_path("WIPRO")))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(company_page("₹ 301.05", "24.8")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ScreenerClient::new(&test_config(&server, &["WIPRO"], 5)).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let quote = fetch_price_and_pe(&client, "WIPRO", &fast_policy(5), &mut rng, None).await;

    assert_eq!(quote.price(), Some(301.05));
    assert_eq!(quote.pe_ratio(), Some(24.8));
}

#[test(tokio::test)]
async fn test_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(company_path("TITAN")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Maintenance</body></html>"))
        .expect(3)
        .mount(&server)
        .await;

    let client = ScreenerClient::new(&test_config(&server, &["TITAN"], 3)).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let quote = fetch_price_and_pe(&client, "TITAN", &fast_policy(3), &mut rng, None).await;

    assert_eq!(quote.ticker, "TITAN");
    assert_eq!(quote.price(), None);
    assert_eq!(quote.pe_ratio(), None);
}
