use serde::{Deserialize, Serialize};

use crate::classify::Category;

pub const MAX_TAGLINE_LEN: usize = 160;

/// Coarse ecosystem bucket derived from a reported programming language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node,
    Python,
    Rust,
    Go,
    Other,
}

/// One candidate recovered by an extractor, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    /// Per-source dedup key (URL path segment or repo path).
    pub key: String,
    pub name: String,
    /// Slug already derived from the source URL, if the source has one.
    pub slug: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub language: Option<String>,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub source_url: String,
    pub runtime: Option<Runtime>,
    pub stars: u64,
    pub submitted_by: String,
}

/// Char-boundary-safe prefix of at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("éééé", 2), "éé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn serializes_catalog_shape() {
        let record = CatalogRecord {
            slug: "acme".into(),
            name: "Acme".into(),
            tagline: "Fix bugs".into(),
            description: "Fix bugs".into(),
            category: Category::SaasTool,
            tags: vec!["product-hunt".into()],
            source_url: "https://www.producthunt.com/products/acme".into(),
            runtime: None,
            stars: 0,
            submitted_by: "catalog-scraper-producthunt".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sourceUrl"], "https://www.producthunt.com/products/acme");
        assert_eq!(value["submittedBy"], "catalog-scraper-producthunt");
        assert_eq!(value["category"], "saas-tool");
        assert!(value["runtime"].is_null());
        assert_eq!(value.as_object().unwrap().len(), 10);
    }

    #[test]
    fn runtime_lowercase() {
        assert_eq!(serde_json::to_string(&Runtime::Node).unwrap(), "\"node\"");
        assert_eq!(serde_json::to_string(&Runtime::Other).unwrap(), "\"other\"");
    }
}
