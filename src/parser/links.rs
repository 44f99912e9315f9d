use std::collections::HashMap;

use regex::{Captures, Regex};

use super::{first_occurrence, Extractor};
use crate::record::RawItem;

/// One `[text](url)` hit whose URL matched a source pattern.
#[derive(Debug, Clone, Copy)]
pub struct LinkMatch<'a> {
    pub text: &'a str,
    pub url: &'a str,
    pub key: &'a str,
    /// Trailing detail path after the identifier (e.g. `/reviews`), if any.
    pub detail: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameParts {
    pub name: String,
    pub tagline: Option<String>,
}

/// Source-specific configuration for [`LinkExtractor`].
///
/// `pattern` must define the named groups `text`, `url` and `key`; `detail` is optional.
pub struct LinkRules {
    pub pattern: &'static str,
    pub reject: fn(&LinkMatch) -> bool,
    pub name_parts: fn(&str) -> Option<NameParts>,
    pub source_url: fn(&LinkMatch) -> String,
    pub popularity: fn(&LinkMatch) -> Option<u64>,
    /// The URL key doubles as the record slug.
    pub key_is_slug: bool,
}

/// Markdown link-block extractor: regex match → noise filter → name split → first-occurrence dedup.
pub struct LinkExtractor {
    re: Regex,
    rules: LinkRules,
}

impl LinkExtractor {
    pub fn new(rules: LinkRules) -> Result<Self, regex::Error> {
        let re = Regex::new(rules.pattern)?;
        Ok(LinkExtractor { re, rules })
    }

    fn to_match<'a>(caps: &'a Captures<'a>) -> Option<LinkMatch<'a>> {
        Some(LinkMatch {
            text: caps.name("text")?.as_str().trim(),
            url: caps.name("url")?.as_str(),
            key: caps.name("key")?.as_str(),
            detail: caps.name("detail").map(|d| d.as_str()),
        })
    }
}

impl Extractor for LinkExtractor {
    type Input = str;

    fn extract(&self, markdown: &str) -> Vec<RawItem> {
        let mut popularity: HashMap<String, u64> = HashMap::new();
        let mut candidates = Vec::new();

        for caps in self.re.captures_iter(markdown) {
            let Some(m) = Self::to_match(&caps) else {
                continue;
            };

            if let Some(count) = (self.rules.popularity)(&m) {
                popularity.entry(m.key.to_string()).or_insert(count);
            }
            if (self.rules.reject)(&m) {
                continue;
            }
            let Some(parts) = (self.rules.name_parts)(m.text) else {
                continue;
            };

            candidates.push(RawItem {
                key: m.key.to_string(),
                name: parts.name,
                slug: self.rules.key_is_slug.then(|| m.key.to_string()),
                tagline: parts.tagline,
                description: None,
                url: (self.rules.source_url)(&m),
                language: None,
                stars: 0,
            });
        }

        let mut items = first_occurrence(candidates);
        for item in &mut items {
            if let Some(count) = popularity.get(&item.key) {
                item.stars = *count;
            }
        }
        items
    }
}

/// True when the text is too short to be a name or implausibly long for one.
pub fn outside_len(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    len < min || len > max
}

pub fn no_popularity(_: &LinkMatch) -> Option<u64> {
    None
}
