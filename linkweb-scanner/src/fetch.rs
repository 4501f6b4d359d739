use crate::error::{Result, ScanError};
use crate::links;
use futures::future::BoxFuture;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches a page and returns the raw outbound link targets found on it.
///
/// Links are absolute and may repeat: a target linked three times on a page
/// shows up three times. Implementations report transport and status
/// problems as errors; the crawl decides what to do with them.
pub trait Scraper: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &'static str;

    fn scrape<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// Build the HTTP client shared by the network-backed scrapers.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("linkweb/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
        .pool_max_idle_per_host(50)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    Ok(client)
}

/// A successfully fetched page body with its content type.
struct Page {
    body: String,
    content_type: Option<String>,
}

impl Page {
    fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false)
    }
}

async fn fetch_page(client: &Client, url: &str) -> Result<Page> {
    debug!("Fetching {}", url);

    let target = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    let response = client.get(target).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = response.text().await?;

    Ok(Page { body, content_type })
}

/// Extracts links by walking the parsed DOM for `a[href]` elements.
pub struct HtmlScraper {
    client: Client,
    anchors: Selector,
}

impl HtmlScraper {
    pub fn new(client: Client) -> Result<Self> {
        let anchors =
            Selector::parse("a[href]").map_err(|e| ScanError::ParseError(e.to_string()))?;
        Ok(Self { client, anchors })
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::new(build_client(timeout_secs)?)
    }

    /// Extract absolute link targets from an HTML document.
    pub fn extract_links(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let hrefs = document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"));

        links::resolve_all(page_url, hrefs)
    }
}

impl Scraper for HtmlScraper {
    fn name(&self) -> &'static str {
        "html"
    }

    fn scrape<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            let page = fetch_page(&self.client, url).await?;

            // Only parse HTML content
            if !page.is_html() {
                debug!("Skipping non-HTML content at {}", url);
                return Ok(Vec::new());
            }

            let links = self.extract_links(&page.body, url);
            debug!("Found {} links on {}", links.len(), url);
            Ok(links)
        })
    }
}

/// Extracts links by pattern-matching `href=` attributes in the raw body.
///
/// Cheaper than building a DOM and tolerant of broken markup, at the cost of
/// also matching hrefs on non-anchor elements such as `<link>`.
pub struct RegexScraper {
    client: Client,
    href: Regex,
}

impl RegexScraper {
    pub fn new(client: Client) -> Result<Self> {
        let href = Regex::new(r#"href=['"]?([^'" >]+)"#)
            .map_err(|e| ScanError::ParseError(e.to_string()))?;
        Ok(Self { client, href })
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::new(build_client(timeout_secs)?)
    }

    pub fn extract_links(&self, body: &str, page_url: &str) -> Vec<String> {
        let hrefs = self
            .href
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str());

        links::resolve_all(page_url, hrefs)
    }
}

impl Scraper for RegexScraper {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn scrape<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            let page = fetch_page(&self.client, url).await?;
            let links = self.extract_links(&page.body, url);
            debug!("Found {} links on {}", links.len(), url);
            Ok(links)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    async fn mount_html(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_bytes(body.into_bytes()),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_html_extract_links_keeps_duplicates() {
        let scraper = HtmlScraper::with_timeout(5).unwrap();
        let html = r##"<html><body>
            <a href="/p1">One</a>
            <a href="/p1">One again</a>
            <a href="http://other.org/x">Out</a>
            <a href="#top">Top</a>
            <a>No href</a>
        </body></html>"##;

        let links = scraper.extract_links(html, "http://example.com/");
        assert_eq!(
            links,
            vec![
                "http://example.com/p1",
                "http://example.com/p1",
                "http://other.org/x"
            ]
        );
    }

    #[test]
    fn test_regex_extract_links_quoting_styles() {
        let scraper = RegexScraper::with_timeout(5).unwrap();
        let body = r#"<a href="/a">a</a> <a href='/b'>b</a> <a href=/c>c</a> <a href="mailto:x@y.z">m</a>"#;

        let links = scraper.extract_links(body, "http://example.com/dir/");
        assert_eq!(
            links,
            vec![
                "http://example.com/a",
                "http://example.com/b",
                "http://example.com/c"
            ]
        );
    }

    #[tokio::test]
    async fn test_html_scrape_from_server() {
        let mock_server = MockServer::start().await;
        let root_html = format!(
            r#"<html><body>
                <a href="{0}/page1">Page 1</a>
                <a href="/page2">Page 2</a>
                <a href="/page2">Page 2 again</a>
            </body></html>"#,
            mock_server.uri()
        );
        mount_html(&mock_server, "/", root_html).await;

        let scraper = HtmlScraper::with_timeout(5).unwrap();
        let links = scraper.scrape(&mock_server.uri()).await.unwrap();

        assert_eq!(links.len(), 3);
        assert_eq!(links[0], format!("{}/page1", mock_server.uri()));
        assert_eq!(links[1], format!("{}/page2", mock_server.uri()));
        assert_eq!(links[1], links[2]);
    }

    #[tokio::test]
    async fn test_html_scrape_ignores_non_html() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(br#"{"href": "/nope"}"#.to_vec()),
            )
            .mount(&mock_server)
            .await;

        let scraper = HtmlScraper::with_timeout(5).unwrap();
        let url = format!("{}/data.json", mock_server.uri());
        let links = scraper.scrape(&url).await.unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_regex_scrape_from_server() {
        let mock_server = MockServer::start().await;
        mount_html(
            &mock_server,
            "/",
            r#"<a href="/x">x</a><a href="/x">x</a>"#.to_string(),
        )
        .await;

        let scraper = RegexScraper::with_timeout(5).unwrap();
        let links = scraper.scrape(&mock_server.uri()).await.unwrap();

        assert_eq!(
            links,
            vec![
                format!("{}/x", mock_server.uri()),
                format!("{}/x", mock_server.uri())
            ]
        );
    }

    #[tokio::test]
    async fn test_scrape_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let scraper = HtmlScraper::with_timeout(5).unwrap();
        let url = format!("{}/missing", mock_server.uri());
        let err = scraper.scrape(&url).await.unwrap_err();

        assert!(
            matches!(err, ScanError::Status { status: 404, .. }),
            "unexpected error: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_scrape_invalid_url() {
        let scraper = RegexScraper::with_timeout(5).unwrap();
        let err = scraper.scrape("not a url").await.unwrap_err();

        assert!(matches!(err, ScanError::InvalidUrl(_)), "unexpected error: {}", err);
    }
}
