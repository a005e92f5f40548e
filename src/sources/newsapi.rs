//! NewsAPI.org top-headlines client.
//!
//! A single `GET {base}/top-headlines` with four query parameters. HTTP
//! failures surface as [`BriefingError::Transport`]; a well-formed response
//! whose `status` is not `"ok"` surfaces as [`BriefingError::Upstream`]
//! carrying the API's own message. Nothing is retried.

use crate::error::{BriefingError, Result};
use crate::models::{Article, Category, HeadlinesResponse};
use crate::sources::HeadlineSource;
use reqwest::Client;
use std::fmt;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const BASE_URL: &str = "https://newsapi.org/v2";

/// NewsAPI.org rejects requests that carry no User-Agent.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (must be an absolute URL).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            BriefingError::Validation(format!("Invalid news API base URL '{base_url}': {e}"))
        })?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// The fixed category enumeration accepted by the endpoint.
    pub fn available_categories() -> &'static [Category] {
        &Category::ALL
    }

    /// Fetch the raw `/top-headlines` response.
    ///
    /// # Errors
    ///
    /// - [`BriefingError::Transport`] on network failure or a non-2xx status
    /// - [`BriefingError::Decode`] if the body is not a JSON headlines envelope
    #[instrument(level = "info", skip_all, fields(%category, %country, page_size))]
    pub async fn get_top_headlines(
        &self,
        category: Category,
        country: &str,
        page_size: u32,
    ) -> Result<HeadlinesResponse> {
        let endpoint = format!("{}/top-headlines", self.base_url);
        let page_size_param = page_size.to_string();

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("category", category.as_str()),
                ("country", country),
                ("pageSize", page_size_param.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                let e = e.without_url();
                warn!(error = %e, "Headline request failed");
                BriefingError::Transport(e)
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| BriefingError::Transport(e.without_url()))?;
        let parsed: HeadlinesResponse = serde_json::from_str(&body)?;
        debug!(
            bytes = body.len(),
            status = ?parsed.status,
            code = ?parsed.code,
            total_results = ?parsed.total_results,
            "Received headlines response"
        );
        Ok(parsed)
    }

    /// Pull the article list out of a response, checking its status first.
    ///
    /// The list is returned verbatim; a missing `articles` field is an empty list.
    pub fn extract_articles(response: HeadlinesResponse) -> Result<Vec<Article>> {
        if response.status.as_deref() != Some("ok") {
            let message = response
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(BriefingError::Upstream(message));
        }
        Ok(response.articles.unwrap_or_default())
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HeadlineSource for NewsApiClient {
    async fn top_headlines(
        &self,
        category: Category,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<Article>> {
        let response = self.get_top_headlines(category, country, page_size).await?;
        let mut articles = Self::extract_articles(response)?;
        articles.truncate(page_size as usize);
        info!(count = articles.len(), %category, "Fetched headlines");
        Ok(articles)
    }
}
