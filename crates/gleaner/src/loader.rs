// ABOUTME: The Loader turns a URL or raw markup into a parsed, queryable Document.
// ABOUTME: Owns a configured reqwest client; network I/O is its only side effect.

use crate::document::Document;
use crate::error::Result;
use crate::fetch::{fetch, FetchOptions};
use crate::options::{LoaderBuilder, Options};
use crate::pages::Pages;

/// Loads HTML documents from URLs or raw markup.
///
/// Fetching is the only side-effecting operation in the pipeline; everything
/// downstream is a pure function over the parsed tree. No retries and no
/// caching: a failed fetch propagates and the caller decides whether to
/// re-fetch.
pub struct Loader {
    opts: Options,
    http: reqwest::Client,
}

impl Loader {
    /// Create a new LoaderBuilder for configuring the loader.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    /// Create a new Loader with the given options.
    pub fn new(opts: Options) -> Self {
        let http = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http }
    }

    /// Fetch the given URL and parse the response body into a Document.
    ///
    /// Fails with `InvalidUrl`/`Fetch`/`Timeout` on retrieval problems and
    /// `Parse` when the body is fundamentally not HTML. The returned
    /// Document records the final URL after redirects.
    pub async fn load(&self, url: &str) -> Result<Document> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            parse_non_200: self.opts.parse_non_200,
        };

        let fetched = fetch(&self.http, url, &fetch_opts).await?;
        let markup = fetched.text_utf8(None);
        Document::parse_with_url(&markup, &fetched.final_url)
    }

    /// A lazy, finite sequence of documents starting at `start_url`,
    /// following next-page links until none remain or the configured
    /// `max_pages` bound is reached.
    ///
    /// The sequence is restartable: calling `pages` again yields a fresh
    /// walk from the start URL.
    pub fn pages<'a>(&'a self, start_url: &str) -> Pages<'a> {
        Pages::new(self, start_url, self.opts.max_pages)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use httpmock::prelude::*;
    use std::time::Duration;

    #[tokio::test]
    async fn load_fetches_and_parses() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html><body><h1>Web scraping</h1></body></html>");
        });

        let loader = Loader::builder().build();
        let doc = loader.load(&server.url("/page")).await.expect("load");
        mock.assert();

        let h1 = Selector::parse("h1").unwrap();
        let heading = doc.select_first(&h1).expect("h1 present");
        assert_eq!(heading.text(), "Web scraping");
        assert!(doc.url().unwrap().contains("/page"));
    }

    #[tokio::test]
    async fn load_rejects_non_html_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/data");
            then.status(200)
                .header("content-type", "application/json")
                .body("{\"not\": \"html\"}");
        });

        let loader = Loader::builder().build();
        let err = loader
            .load(&server.url("/data"))
            .await
            .expect_err("JSON body is not HTML");
        mock.assert();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn load_propagates_http_failure() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(500).body("boom");
        });

        let loader = Loader::builder().build();
        let err = loader
            .load(&server.url("/gone"))
            .await
            .expect_err("500 should fail");
        mock.assert();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn load_times_out() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body("<html></html>");
        });

        let loader = Loader::builder()
            .timeout(Duration::from_millis(50))
            .build();
        let err = loader
            .load(&server.url("/slow"))
            .await
            .expect_err("should time out");
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn load_rejects_malformed_url() {
        let loader = Loader::builder().build();
        let err = loader.load("not a url").await.expect_err("bad URL");
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn load_sends_configured_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/hdr")
                .header("x-session", "abc");
            then.status(200).body("<html><body>ok</body></html>");
        });

        let loader = Loader::builder().header("x-session", "abc").build();
        loader.load(&server.url("/hdr")).await.expect("load");
        mock.assert();
    }
}
