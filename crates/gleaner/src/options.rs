// ABOUTME: Configuration options for the document loader and the fluent LoaderBuilder.
// ABOUTME: Covers timeout, user agent, custom headers, non-200 handling, and page-walk bounds.

use std::collections::HashMap;
use std::time::Duration;

use crate::loader::Loader;

/// Configuration options for a [`Loader`].
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub parse_non_200: bool,
    pub max_pages: usize,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "gleaner/0.1".to_string(),
            headers: HashMap::new(),
            parse_non_200: false,
            max_pages: 25,
            http_client: None,
        }
    }
}

/// Builder for constructing [`Loader`] instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderBuilder {
    opts: Options,
}

impl LoaderBuilder {
    /// Create a new LoaderBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch timeout. Expiry fails the load with a `Timeout` error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Accept non-200 responses instead of failing the fetch.
    pub fn parse_non_200(mut self, allow: bool) -> Self {
        self.opts.parse_non_200 = allow;
        self
    }

    /// Cap the number of documents a page sequence will yield.
    pub fn max_pages(mut self, max: usize) -> Self {
        self.opts.max_pages = max;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Loader with the configured options.
    pub fn build(self) -> Loader {
        Loader::new(self.opts)
    }
}
