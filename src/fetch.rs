use std::collections::BTreeMap;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use thiserror::Error;
use tracing::debug;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Field name → raw text for one element matched by a schema's base selector.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("SPIDER_API_KEY is not set; markdown rendering is unavailable")]
    MissingApiKey,
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("fetch service: {0}")]
    Upstream(String),
    #[error("no content in fetch response")]
    Malformed,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid selector {0}")]
    Selector(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    #[default]
    Bypass,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Attribute(&'static str),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub selector: &'static str,
    pub kind: FieldKind,
}

/// CSS extraction schema: one row per `base_selector` match.
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    pub name: &'static str,
    pub base_selector: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone)]
pub enum FetchMode {
    /// Full rendered page as markdown.
    Markdown,
    Schema(ExtractionSchema),
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub cache: CacheMode,
    pub mode: FetchMode,
    pub page_timeout: Duration,
    pub stealth: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub markdown: Option<String>,
    pub rows: Vec<Row>,
}

impl Fetched {
    pub fn markdown(md: impl Into<String>) -> Self {
        Fetched {
            markdown: Some(md.into()),
            rows: Vec::new(),
        }
    }

    pub fn rows(rows: Vec<Row>) -> Self {
        Fetched {
            markdown: None,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.markdown.as_deref().map_or(true, |m| m.trim().is_empty())
    }
}

/// Page retrieval. Implementations are called one URL at a time.
pub trait Fetcher {
    fn fetch(
        &self,
        url: &str,
        config: &FetchConfig,
    ) -> impl Future<Output = Result<Fetched, FetchError>>;
}

/// Markdown through spider.cloud, selector rows through a plain HTTP GET.
pub struct SpiderFetcher {
    spider: Option<Spider>,
    http: reqwest::Client,
}

impl SpiderFetcher {
    pub fn new(api_key: Option<String>) -> Result<Self, FetchError> {
        let spider = match api_key {
            Some(key) => Some(
                Spider::new(Some(key))
                    .map_err(|e| FetchError::Upstream(format!("failed to create client: {}", e)))?,
            ),
            None => None,
        };
        let http = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(SpiderFetcher { spider, http })
    }

    async fn fetch_markdown(&self, url: &str, config: &FetchConfig) -> Result<Fetched, FetchError> {
        let spider = self.spider.as_ref().ok_or(FetchError::MissingApiKey)?;
        let params = RequestParams {
            return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Markdown)),
            cache: Some(config.cache == CacheMode::Enabled),
            stealth: Some(config.stealth),
            ..Default::default()
        };
        debug!(url, stealth = config.stealth, cache = ?config.cache, "rendering via spider");

        let limit = config.page_timeout;
        let response = tokio::time::timeout(limit, spider.scrape_url(url, Some(params), "application/json"))
            .await
            .map_err(|_| FetchError::Timeout(limit))?
            .map_err(|e| FetchError::Upstream(e.to_string()))?;

        let parsed: serde_json::Value = match response.as_str() {
            Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
            None => response,
        };

        let content = parsed
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|obj| obj.get("content"))
            .and_then(|c| c.as_str())
            .map(strip_images)
            .ok_or(FetchError::Malformed)?;

        Ok(Fetched::markdown(content))
    }

    async fn fetch_rows(
        &self,
        url: &str,
        schema: &ExtractionSchema,
        config: &FetchConfig,
    ) -> Result<Fetched, FetchError> {
        let mut request = self.http.get(url);
        if config.cache == CacheMode::Bypass {
            request = request.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }
        request = request.timeout(config.page_timeout);
        debug!(url, schema = schema.name, "fetching html");

        let html = request.send().await?.error_for_status()?.text().await?;
        Ok(Fetched::rows(apply_schema(&html, schema)?))
    }
}

impl Fetcher for SpiderFetcher {
    async fn fetch(&self, url: &str, config: &FetchConfig) -> Result<Fetched, FetchError> {
        match &config.mode {
            FetchMode::Markdown => self.fetch_markdown(url, config).await,
            FetchMode::Schema(schema) => self.fetch_rows(url, schema, config).await,
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Selector(format!("{:?}: {:?}", css, e)))
}

/// Run a CSS schema over an HTML document. Missing fields are left out of the row.
pub fn apply_schema(html: &str, schema: &ExtractionSchema) -> Result<Vec<Row>, FetchError> {
    let base = parse_selector(schema.base_selector)?;
    let fields = schema
        .fields
        .iter()
        .map(|spec| parse_selector(spec.selector).map(|selector| (spec, selector)))
        .collect::<Result<Vec<_>, FetchError>>()?;

    let document = Html::parse_document(html);
    let rows = document
        .select(&base)
        .map(|element| {
            fields
                .iter()
                .filter_map(|(spec, selector)| {
                    let node = element.select(selector).next()?;
                    let value = match spec.kind {
                        FieldKind::Text => node.text().collect::<String>(),
                        FieldKind::Attribute(attr) => node.value().attr(attr)?.to_string(),
                    };
                    Some((spec.name.to_string(), value.trim().to_string()))
                })
                .collect::<Row>()
        })
        .collect();
    Ok(rows)
}

/// Remove markdown image syntax: ![alt](url) and [![alt](url)](link)
fn strip_images(md: &str) -> String {
    let cleaned = IMAGE_RE.replace_all(md, "");
    BLANKS_RE.replace_all(&cleaned, "\n\n").to_string()
}
