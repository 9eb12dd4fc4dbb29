//! Canned pages and mock server setup

use nifty_stocks::models::Config;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Minimal screener.in company page with the price header and ratio list
pub fn company_page(price: &str, pe: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <div class="company-info">
    <div class="flex flex-align-center">
      <span>{price}</span>
    </div>
    <ul id="top-ratios">
      <li class="flex flex-space-between">
        <span class="name">Market Cap</span>
        <span class="nowrap value">₹ 15,02,345 Cr.</span>
      </li>
      <li class="flex flex-space-between">
        <span class="name">Current Price</span>
        <span class="nowrap value">₹ 4,123</span>
      </li>
      <li class="flex flex-space-between">
        <span class="name">High / Low</span>
        <span class="nowrap value">₹ 4,592 / 3,311</span>
      </li>
      <li class="flex flex-space-between">
        <span class="name">Stock P/E</span>
        <span class="nowrap value">{pe}</span>
      </li>
    </ul>
  </div>
</body>
</html>"#
    )
}

pub fn company_path(ticker: &str) -> String {
    format!("/company/{}/consolidated/", ticker)
}

/// Serve a well-formed page for `ticker`
pub async fn mount_company_page(server: &MockServer, ticker: &str, price: &str, pe: &str) {
    Mock::given(method("GET"))
        .and(path(company_path(ticker)))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(company_page(price, pe)))
        .mount(server)
        .await;
}

/// Config pointed at the mock server, no backoff waits
pub fn test_config(server: &MockServer, tickers: &[&str], retries: u32) -> Config {
    Config {
        base_url: Url::parse(&server.uri()).expect("mock server uri"),
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        retries,
        retry_delay: Duration::ZERO,
        retry_jitter: Duration::ZERO,
        request_timeout: Duration::from_secs(2),
        seed: Some(7),
    }
}
