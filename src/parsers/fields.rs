use once_cell::sync::Lazy;
use regex::Regex;

/// Rupee-prefixed amount with an optional `/unit`, or an `Rs`-prefixed amount
static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)₹\s*[\d,]+(?:\s*/\s*\w+)?|Rs\.?\s*[\d,]+")
        .expect("Price pattern should be valid")
});

/// Pull the first price out of a block of text
///
/// Returns the first line of the first match, trimmed, or an empty string when
/// the text carries no price.
pub fn extract_price(text: &str) -> String {
    let Some(found) = PRICE_REGEX.find(text) else {
        return String::new();
    };

    found
        .as_str()
        .trim()
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}

/// Take the first non-empty line following the first occurrence of `anchor`
///
/// Text without the anchor yields an empty string.
pub fn extract_location(text: &str, anchor: &str) -> String {
    if anchor.is_empty() {
        return String::new();
    }
    let Some((_, after)) = text.split_once(anchor) else {
        return String::new();
    };

    after
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}
