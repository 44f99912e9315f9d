use std::sync::LazyLock;

use regex::Regex;

use super::links::{outside_len, LinkExtractor, LinkMatch, LinkRules, NameParts};

const PRODUCT_PATTERN: &str = r"\[(?P<text>[^\]]+)\]\((?P<url>https://www\.producthunt\.com/products/(?P<key>[a-z0-9-]+))(?P<detail>/reviews[^\)]*)?\)";

const NAV_LABELS: &[&str] = &["view all", "see all", "reviews", "promoted", ""];

static REVIEW_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[\d.,]+K?\s*reviews?$").unwrap());
static REVIEW_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d.]+)\s*(K?)\s*reviews?").unwrap());
// Name words are capitalized; the tagline starts at an article or the next capitalized word.
static NAME_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][^\s]+(?: [A-Z][^\s]+)*)\s+(The |A |An |[A-Z][a-z])").unwrap()
});

pub static EXTRACTOR: LazyLock<LinkExtractor> = LazyLock::new(|| {
    LinkExtractor::new(LinkRules {
        pattern: PRODUCT_PATTERN,
        reject: is_noise,
        name_parts: split_name_tagline,
        source_url: |m| m.url.to_string(),
        popularity: review_popularity,
        key_is_slug: true,
    })
    .unwrap()
});

fn is_noise(m: &LinkMatch) -> bool {
    REVIEW_TEXT_RE.is_match(m.text)
        || NAV_LABELS.contains(&m.text.to_lowercase().as_str())
        || outside_len(m.text, 2, 200)
}

fn review_popularity(m: &LinkMatch) -> Option<u64> {
    m.detail?;
    REVIEW_TEXT_RE
        .is_match(m.text)
        .then(|| parse_review_count(m.text))
}

/// Split concatenated "Name Tagline" link text.
///
/// Heuristic: the name is the longest run of capitalized words that is still
/// followed by an article or another capitalized word. A multi-word name whose
/// tagline also opens with a capital is cut early.
pub fn split_name_tagline(text: &str) -> Option<NameParts> {
    let (name, tagline) = match NAME_SPLIT_RE.captures(text) {
        Some(caps) => {
            let split = caps.get(1).map_or(0, |m| m.end());
            (text[..split].trim(), text[split..].trim())
        }
        None => (text.trim(), ""),
    };
    if name.is_empty() {
        return None;
    }
    let tagline = if tagline.is_empty() {
        format!("Discovered on Product Hunt: {}", name)
    } else {
        tagline.to_string()
    };
    Some(NameParts {
        name: name.to_string(),
        tagline: Some(tagline),
    })
}

/// "1.4K reviews" → 1400, "630 reviews" → 630, anything else → 0.
pub fn parse_review_count(text: &str) -> u64 {
    let Some(caps) = REVIEW_COUNT_RE.captures(text) else {
        return 0;
    };
    let Ok(num) = caps[1].parse::<f64>() else {
        return 0;
    };
    let scaled = if caps[2].is_empty() { num } else { num * 1000.0 };
    if scaled.is_finite() && scaled >= 0.0 {
        scaled as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Extractor;

    fn split(text: &str) -> (String, String) {
        let parts = split_name_tagline(text).unwrap();
        (parts.name, parts.tagline.unwrap())
    }

    #[test]
    fn name_and_tagline() {
        let items = EXTRACTOR.extract("[Acme Fix your bugs fast](https://www.producthunt.com/products/acme)");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Acme");
        assert_eq!(items[0].tagline.as_deref(), Some("Fix your bugs fast"));
        assert_eq!(items[0].slug.as_deref(), Some("acme"));
        assert_eq!(items[0].url, "https://www.producthunt.com/products/acme");
    }

    #[test]
    fn review_link_is_not_a_candidate() {
        let items = EXTRACTOR.extract("[1.4K reviews](https://www.producthunt.com/products/acme/reviews)");
        assert!(items.is_empty());
    }

    #[test]
    fn review_count_becomes_popularity() {
        let md = "[Acme Fix your bugs fast](https://www.producthunt.com/products/acme)\n\
                  [1.4K reviews](https://www.producthunt.com/products/acme/reviews)";
        let items = EXTRACTOR.extract(md);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stars, 1400);
    }

    #[test]
    fn navigation_labels_rejected() {
        let md = "[View all](https://www.producthunt.com/products/acme)\n\
                  [Promoted](https://www.producthunt.com/products/beta)\n\
                  [X](https://www.producthunt.com/products/gamma)";
        assert!(EXTRACTOR.extract(md).is_empty());
    }

    #[test]
    fn overlong_text_rejected() {
        let md = format!("[{}](https://www.producthunt.com/products/acme)", "Word ".repeat(50));
        assert!(EXTRACTOR.extract(&md).is_empty());
    }

    #[test]
    fn repeated_slug_keeps_first() {
        let md = "[Acme Fix your bugs fast](https://www.producthunt.com/products/acme)\n\
                  [Acme Something else](https://www.producthunt.com/products/acme)\n\
                  [Acme](https://www.producthunt.com/products/acme)";
        let items = EXTRACTOR.extract(md);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].tagline.as_deref(), Some("Fix your bugs fast"));
    }

    #[test]
    fn single_word_gets_placeholder_tagline() {
        assert_eq!(
            split("Notion"),
            ("Notion".to_string(), "Discovered on Product Hunt: Notion".to_string())
        );
        assert_eq!(
            split("lowercase brand does things"),
            (
                "lowercase brand does things".to_string(),
                "Discovered on Product Hunt: lowercase brand does things".to_string()
            )
        );
    }

    #[test]
    fn article_starts_tagline() {
        assert_eq!(
            split("Linear App The issue tracker you'll enjoy"),
            ("Linear App".to_string(), "The issue tracker you'll enjoy".to_string())
        );
        assert_eq!(
            split("Raycast A launcher for everything"),
            ("Raycast".to_string(), "A launcher for everything".to_string())
        );
    }

    #[test]
    fn multi_word_name() {
        assert_eq!(
            split("Google Docs Write together"),
            ("Google Docs".to_string(), "Write together".to_string())
        );
    }

    // Known limitation: a capitalized first tagline word after a multi-word
    // name shifts the cut one word left.
    #[test]
    fn capitalized_tagline_word_characterization() {
        assert_eq!(
            split("Visual Studio Code editing made simple"),
            ("Visual Studio".to_string(), "Code editing made simple".to_string())
        );
        assert_eq!(
            split("Acme Cloud storage for teams"),
            ("Acme".to_string(), "Cloud storage for teams".to_string())
        );
    }

    #[test]
    fn review_counts() {
        assert_eq!(parse_review_count("1.4K reviews"), 1400);
        assert_eq!(parse_review_count("630 reviews"), 630);
        assert_eq!(parse_review_count("1 review"), 1);
        assert_eq!(parse_review_count("2k Reviews"), 2000);
        assert_eq!(parse_review_count("no reviews yet"), 0);
        assert_eq!(parse_review_count(""), 0);
    }

    #[test]
    fn fixture_page() {
        let md = std::fs::read_to_string("tests/fixtures/producthunt.md").unwrap();
        let items = EXTRACTOR.extract(&md);
        let slugs: Vec<&str> = items.iter().filter_map(|i| i.slug.as_deref()).collect();
        assert_eq!(slugs, vec!["cursor", "lovable", "raycast", "notion"]);
        assert_eq!(items[0].name, "Cursor");
        assert_eq!(items[0].tagline.as_deref(), Some("The AI code editor"));
        assert_eq!(items[0].stars, 1400);
        assert_eq!(items[2].stars, 630);
        assert_eq!(
            items[3].tagline.as_deref(),
            Some("Discovered on Product Hunt: Notion")
        );
    }
}
