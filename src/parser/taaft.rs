use std::sync::LazyLock;

use regex::Regex;

use super::links::{no_popularity, outside_len, LinkExtractor, LinkMatch, LinkRules, NameParts};

const TOOL_PATTERN: &str = r"\[(?P<text>[^\]]+)\]\((?P<url>https://theresanaiforthat\.com/ai/(?P<key>[a-z0-9-]+(?:-\d+)?)/?)\)";

static STATS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d,.\s]+$").unwrap());
static PRICING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^free").unwrap());
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+v[\d.]+\s*$").unwrap());

pub static EXTRACTOR: LazyLock<LinkExtractor> = LazyLock::new(|| {
    LinkExtractor::new(LinkRules {
        pattern: TOOL_PATTERN,
        reject: is_noise,
        name_parts: strip_version,
        source_url: |m| format!("https://theresanaiforthat.com/ai/{}/", m.key),
        popularity: no_popularity,
        key_is_slug: false,
    })
    .unwrap()
});

// Each tool card links its name, its pricing and its save/view stats to the same URL.
fn is_noise(m: &LinkMatch) -> bool {
    STATS_RE.is_match(m.text)
        || PRICING_RE.is_match(m.text)
        || m.text.starts_with('$')
        || outside_len(m.text, 2, 100)
}

/// "Tool v1.2.3" → "Tool".
pub fn strip_version(text: &str) -> Option<NameParts> {
    let name = VERSION_RE.replace(text, "");
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(NameParts {
        name: name.to_string(),
        tagline: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Extractor;

    #[test]
    fn name_from_first_valid_link() {
        let md = "[18,458108](https://theresanaiforthat.com/ai/jasper/)\n\
                  [Free + from $39/mo](https://theresanaiforthat.com/ai/jasper/)\n\
                  [Jasper v2.1](https://theresanaiforthat.com/ai/jasper/)\n\
                  [Jasper again](https://theresanaiforthat.com/ai/jasper/)";
        let items = EXTRACTOR.extract(md);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Jasper");
        assert_eq!(items[0].key, "jasper");
        assert_eq!(items[0].url, "https://theresanaiforthat.com/ai/jasper/");
        assert_eq!(items[0].slug, None);
    }

    #[test]
    fn numeric_suffix_keys_are_distinct() {
        let md = "[Chat Helper](https://theresanaiforthat.com/ai/chat-helper/)\n\
                  [Chat Helper](https://theresanaiforthat.com/ai/chat-helper-2)";
        let items = EXTRACTOR.extract(md);
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["chat-helper", "chat-helper-2"]);
        assert_eq!(items[1].url, "https://theresanaiforthat.com/ai/chat-helper-2/");
    }

    #[test]
    fn pricing_and_price_rejected() {
        let md = "[free trial](https://theresanaiforthat.com/ai/a/)\n\
                  [$9/mo](https://theresanaiforthat.com/ai/b/)\n\
                  [1,204](https://theresanaiforthat.com/ai/c/)";
        assert!(EXTRACTOR.extract(md).is_empty());
    }

    #[test]
    fn version_suffix_stripped() {
        assert_eq!(strip_version("Tool v1.2.3").unwrap().name, "Tool");
        assert_eq!(strip_version("Tool v1.2.3 ").unwrap().name, "Tool");
        assert_eq!(strip_version("Vivid").unwrap().name, "Vivid");
        assert_eq!(strip_version("Release v2").unwrap().name, "Release");
        assert!(strip_version("   ").is_none());
    }

    #[test]
    fn fixture_page() {
        let md = std::fs::read_to_string("tests/fixtures/taaft.md").unwrap();
        let items = EXTRACTOR.extract(&md);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ChatGPT", "Midjourney", "Crypto Copilot", "Notion AI"]);
    }
}
