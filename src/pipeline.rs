//! Per-source pipelines: fetch → extract → dedup → classify → normalize.
//!
//! A [`RunState`] owns the seen-set and the result cap for exactly one run, so
//! repeated or concurrent runs never share state. Fetch failures and empty
//! pages only drop that URL's contribution.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::classify::{categorize, categorize_ai_directory, categorize_producthunt};
use crate::fetch::{
    CacheMode, ExtractionSchema, FetchConfig, FetchMode, Fetched, Fetcher, FieldKind, FieldSpec,
};
use crate::parser::trending::{
    language_to_runtime, TrendingRows, FIELD_DESCRIPTION, FIELD_LANGUAGE, FIELD_REPO_PATH,
    FIELD_STARS,
};
use crate::parser::{producthunt, taaft, Extractor};
use crate::record::{truncate_chars, CatalogRecord, RawItem, MAX_TAGLINE_LEN};
use crate::slug::slugify;

pub const PAGE_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    GithubTrending,
    ProductHunt,
    Taaft,
}

impl Source {
    /// Fixed order used when merging independent runs.
    pub const ALL: [Source; 3] = [Source::GithubTrending, Source::ProductHunt, Source::Taaft];

    pub fn name(self) -> &'static str {
        match self {
            Source::GithubTrending => "github-trending",
            Source::ProductHunt => "producthunt",
            Source::Taaft => "taaft",
        }
    }

    pub fn urls(self) -> &'static [&'static str] {
        match self {
            Source::GithubTrending => &[
                "https://github.com/trending?since=daily",
                "https://github.com/trending?since=weekly",
            ],
            Source::ProductHunt => &[
                "https://www.producthunt.com/topics/artificial-intelligence",
                "https://www.producthunt.com/topics/developer-tools",
            ],
            Source::Taaft => &[
                "https://theresanaiforthat.com/",
                "https://theresanaiforthat.com/s/ai-agents/",
            ],
        }
    }

    pub fn max_results(self) -> usize {
        match self {
            Source::GithubTrending => 50,
            Source::ProductHunt | Source::Taaft => 100,
        }
    }

    pub fn submitted_by(self) -> &'static str {
        match self {
            Source::GithubTrending => "catalog-scraper-github-trending",
            Source::ProductHunt => "catalog-scraper-producthunt",
            Source::Taaft => "catalog-scraper-taaft",
        }
    }

    pub fn output_file(self) -> String {
        format!("{}.json", self.name())
    }

    pub fn fetch_config(self, options: &RunOptions) -> FetchConfig {
        let (mode, stealth) = match self {
            Source::GithubTrending => (FetchMode::Schema(trending_schema()), false),
            Source::ProductHunt | Source::Taaft => (FetchMode::Markdown, true),
        };
        FetchConfig {
            cache: options.cache,
            mode,
            page_timeout: options.page_timeout,
            stealth,
        }
    }

    /// Topic hints implied by the listing URL.
    pub fn url_topics(self, url: &str) -> Vec<String> {
        if self != Source::ProductHunt {
            return Vec::new();
        }
        let topics: &[&str] = match url.trim_end_matches('/').rsplit('/').next() {
            Some("artificial-intelligence") => &["artificial-intelligence", "ai"],
            Some("developer-tools") => &["developer-tools", "developer"],
            _ => &[],
        };
        topics.iter().map(|t| t.to_string()).collect()
    }

    /// Raw items recovered from one fetched page.
    pub fn extract(self, fetched: &Fetched) -> Vec<RawItem> {
        match self {
            Source::GithubTrending => TrendingRows.extract(&fetched.rows),
            Source::ProductHunt => producthunt::EXTRACTOR.extract(markdown_of(fetched)),
            Source::Taaft => taaft::EXTRACTOR.extract(markdown_of(fetched)),
        }
    }

    /// Map a surviving raw item onto the catalog shape.
    pub fn normalize(self, item: RawItem, topics: &[String]) -> CatalogRecord {
        let submitted_by = self.submitted_by().to_string();
        match self {
            Source::GithubTrending => {
                let desc = item.description.unwrap_or_default();
                let tagline = if desc.is_empty() {
                    format!("GitHub trending: {}", item.name)
                } else {
                    desc.clone()
                };
                let description = if desc.is_empty() {
                    format!("No description provided for {}", item.name)
                } else {
                    desc.clone()
                };
                CatalogRecord {
                    slug: slugify(&item.name),
                    category: categorize(&desc, &[], item.language.as_deref()),
                    tagline: truncate_chars(&tagline, MAX_TAGLINE_LEN),
                    description,
                    tags: Vec::new(),
                    source_url: item.url,
                    runtime: language_to_runtime(item.language.as_deref()),
                    stars: item.stars,
                    submitted_by,
                    name: item.name,
                }
            }
            Source::ProductHunt => {
                let tagline = item
                    .tagline
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| format!("Discovered on Product Hunt: {}", item.name));
                let tags = if topics.is_empty() {
                    vec!["product-hunt".to_string()]
                } else {
                    topics.to_vec()
                };
                // Listing keys come straight from the URL and still need the slug rules.
                let slug = item
                    .slug
                    .as_deref()
                    .map(slugify)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| slugify(&item.name));
                CatalogRecord {
                    slug,
                    category: categorize_producthunt(&tagline, topics),
                    tagline: truncate_chars(&tagline, MAX_TAGLINE_LEN),
                    description: tagline,
                    tags,
                    source_url: item.url,
                    runtime: None,
                    stars: item.stars,
                    submitted_by,
                    name: item.name,
                }
            }
            Source::Taaft => CatalogRecord {
                slug: slugify(&item.name),
                category: categorize_ai_directory(&item.name),
                tagline: truncate_chars(&format!("AI tool: {}", item.name), MAX_TAGLINE_LEN),
                description: format!("Discovered on There's An AI For That: {}", item.name),
                tags: vec!["ai".to_string()],
                source_url: item.url,
                runtime: None,
                stars: item.stars,
                submitted_by,
                name: item.name,
            },
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn markdown_of(fetched: &Fetched) -> &str {
    fetched.markdown.as_deref().unwrap_or_default()
}

pub(crate) fn trending_schema() -> ExtractionSchema {
    ExtractionSchema {
        name: "TrendingRepos",
        base_selector: "article.Box-row",
        fields: vec![
            FieldSpec {
                name: FIELD_REPO_PATH,
                selector: "h2 a",
                kind: FieldKind::Attribute("href"),
            },
            FieldSpec {
                name: FIELD_DESCRIPTION,
                selector: "p",
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: FIELD_LANGUAGE,
                selector: "[itemprop='programmingLanguage']",
                kind: FieldKind::Text,
            },
            FieldSpec {
                name: FIELD_STARS,
                selector: "a[href$='/stargazers']",
                kind: FieldKind::Text,
            },
        ],
    }
}

/// Per-run knobs; the cap defaults to the source's own.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub max_results: usize,
    pub page_timeout: Duration,
    pub cache: CacheMode,
}

impl RunOptions {
    pub fn new(max_results: usize) -> Self {
        RunOptions {
            max_results,
            page_timeout: PAGE_TIMEOUT,
            cache: CacheMode::Bypass,
        }
    }
}

/// Seen-set and result cap for one pipeline run.
#[derive(Debug)]
pub struct RunState {
    seen: HashSet<String>,
    records: Vec<CatalogRecord>,
    max_results: usize,
}

impl RunState {
    pub fn new(max_results: usize) -> Self {
        RunState {
            seen: HashSet::new(),
            records: Vec::new(),
            max_results,
        }
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.max_results
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Normalize and keep every unseen item until the cap is hit. Returns how many were added.
    pub fn ingest(&mut self, source: Source, items: Vec<RawItem>, topics: &[String]) -> usize {
        let before = self.records.len();
        for item in items {
            if self.is_full() {
                break;
            }
            if self.has_seen(&item.key) {
                continue;
            }
            self.seen.insert(item.key.clone());
            self.records.push(source.normalize(item, topics));
        }
        self.records.len() - before
    }

    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.records
    }
}

/// Run one source over all its URLs, sequentially, with a fresh [`RunState`].
pub async fn run<F: Fetcher>(source: Source, fetcher: &F, options: &RunOptions) -> Vec<CatalogRecord> {
    run_urls(source, source.urls(), fetcher, options).await
}

pub async fn run_urls<F: Fetcher>(
    source: Source,
    urls: &[&str],
    fetcher: &F,
    options: &RunOptions,
) -> Vec<CatalogRecord> {
    let config = source.fetch_config(options);
    let mut state = RunState::new(options.max_results);

    for url in urls {
        if state.is_full() {
            break;
        }
        info!(source = %source, url, "crawling");

        let fetched = match fetcher.fetch(url, &config).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(source = %source, url, error = %e, "fetch failed, skipping");
                continue;
            }
        };
        if fetched.is_empty() {
            warn!(source = %source, url, "no content, skipping");
            continue;
        }

        let items = source.extract(&fetched);
        let topics = source.url_topics(url);
        let found = items.len();
        let added = state.ingest(source, items, &topics);
        info!(source = %source, url, found, added, "extracted");
    }

    info!(source = %source, count = state.records.len(), "run finished");
    state.into_records()
}

/// Merge independent runs, first occurrence by source URL wins in run order.
pub fn merge_runs<I>(runs: I) -> Vec<CatalogRecord>
where
    I: IntoIterator<Item = Vec<CatalogRecord>>,
{
    let mut seen = HashSet::new();
    runs.into_iter()
        .flatten()
        .filter(|record| seen.insert(record.source_url.clone()))
        .collect()
}
