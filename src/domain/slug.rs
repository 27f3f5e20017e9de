//! URL slug helpers

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Builds a slug from free text: `"St. Louis Park"` -> `"st-louis-park"`
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();

    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Normalizes a slug received from a URL: trimmed, lowercased, whitespace runs become `-`.
///
/// Input must already be percent-decoded; axum's `Path` extractor does that
/// for every route, so `/api/locations/San%20Diego` arrives as `San Diego`.
/// Unlike [`slugify`] this keeps punctuation, so an explicit slug column value
/// compares equal to the same value typed into a URL.
pub fn normalize_slug(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    WHITESPACE.replace_all(&lower, "-").to_string()
}

/// Turns a slug back into a display name: `"los-angeles"` -> `"Los Angeles"`
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Los Angeles"), "los-angeles");
        assert_eq!(slugify("  St. Louis Park "), "st-louis-park");
        assert_eq!(slugify("Car Accident / Injury"), "car-accident-injury");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("Los-Angeles"), "los-angeles");
        assert_eq!(normalize_slug(" prairie   ridge "), "prairie-ridge");
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("los-angeles"), "Los Angeles");
        assert_eq!(title_from_slug("fresno"), "Fresno");
        assert_eq!(title_from_slug(""), "");
    }
}
