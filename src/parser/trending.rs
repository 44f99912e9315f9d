use super::{first_occurrence, Extractor};
use crate::fetch::Row;
use crate::record::{RawItem, Runtime};

pub const FIELD_REPO_PATH: &str = "repo_path";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_LANGUAGE: &str = "language";
pub const FIELD_STARS: &str = "stars_text";

/// Selector-row extractor for trending repository listings.
pub struct TrendingRows;

impl Extractor for TrendingRows {
    type Input = [Row];

    fn extract(&self, rows: &[Row]) -> Vec<RawItem> {
        first_occurrence(rows.iter().filter_map(row_to_item))
    }
}

fn field<'a>(row: &'a Row, name: &str) -> Option<&'a str> {
    row.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn row_to_item(row: &Row) -> Option<RawItem> {
    let repo_path = field(row, FIELD_REPO_PATH)?;
    // "/owner/repo" → "owner/repo"
    let full_name = repo_path.trim_start_matches('/');
    if full_name.is_empty() {
        return None;
    }
    Some(RawItem {
        key: repo_path.to_string(),
        name: full_name.to_string(),
        slug: None,
        tagline: None,
        description: field(row, FIELD_DESCRIPTION).map(str::to_string),
        url: format!("https://github.com/{}", full_name),
        language: field(row, FIELD_LANGUAGE).map(str::to_string),
        stars: row.get(FIELD_STARS).map_or(0, |s| parse_stars(s)),
    })
}

/// Parse " 1,234 " or "12.5k"; anything unparseable is 0.
pub fn parse_stars(text: &str) -> u64 {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return 0;
    }
    if let Some(num) = cleaned.strip_suffix(['k', 'K']) {
        return match num.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => (n * 1000.0) as u64,
            _ => 0,
        };
    }
    cleaned.parse::<u64>().unwrap_or(0)
}

/// Exact case-insensitive language lookup; unknown labels land in `Other`, absent ones in `None`.
pub fn language_to_runtime(language: Option<&str>) -> Option<Runtime> {
    let lang = language.map(str::trim).filter(|l| !l.is_empty())?;
    let runtime = match lang.to_lowercase().as_str() {
        "typescript" | "javascript" => Runtime::Node,
        "python" => Runtime::Python,
        "rust" => Runtime::Rust,
        "go" => Runtime::Go,
        _ => Runtime::Other,
    };
    Some(runtime)
}
