use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::models::Config;
use super::{FetchError, QuotePageSource};

/// HTTP client for screener.in consolidated company pages
pub struct ScreenerClient {
    client: Client,
    base_url: Url,
}

impl ScreenerClient {
    /// Create a new screener client
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_base_url(config.base_url.clone(), config.request_timeout)
    }

    pub fn with_base_url(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `<base>/company/<TICKER>/consolidated/`
    pub fn company_url(&self, ticker: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::CannotBeABase {
                ticker: ticker.to_string(),
                base: self.base_url.clone(),
            })?
            .pop_if_empty()
            .extend(&["company", ticker, "consolidated", ""]);
        Ok(url)
    }
}

#[async_trait]
impl QuotePageSource for ScreenerClient {
    async fn fetch_page(&self, ticker: &str, user_agent: &str) -> Result<String, FetchError> {
        let url = self.company_url(ticker)?;
        debug!("GET {} as {}", url, user_agent);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
