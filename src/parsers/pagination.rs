use crate::parsers::text::inline_text;
use crate::urls::normalize_any_url;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static REL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[rel]").expect("Rel selector should be valid"));
static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Anchor selector should be valid"));

/// Visible labels treated as a "next page" control
const NEXT_LABELS: [&str; 6] = ["next", "next >", "next »", "›", "»", ">"];

/// Find the URL of the page following `current_url`, if the page links one
///
/// An anchor marked `rel="next"` wins; otherwise the first anchor labelled
/// like a next control. Links back to the current page are ignored.
pub fn next_page(doc: &Html, current_url: &str) -> Option<String> {
    let by_rel = doc
        .select(&REL_SELECTOR)
        .filter(|anchor| has_next_rel(*anchor))
        .find_map(|anchor| candidate(anchor, current_url));
    if by_rel.is_some() {
        return by_rel;
    }

    doc.select(&HREF_SELECTOR)
        .filter(|anchor| is_next_label(&inline_text(*anchor)))
        .find_map(|anchor| candidate(anchor, current_url))
}

fn has_next_rel(anchor: ElementRef) -> bool {
    anchor
        .value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|token| token.eq_ignore_ascii_case("next")))
}

/// Whether visible text reads like a "next page" control
pub fn is_next_label(text: &str) -> bool {
    let label = collapse_whitespace(text).to_lowercase();
    NEXT_LABELS.contains(&label.as_str()) || label.starts_with("next")
}

fn candidate(anchor: ElementRef, current_url: &str) -> Option<String> {
    let href = anchor.value().attr("href")?;
    let url = normalize_any_url(href, current_url);
    if url.is_empty() || url == current_url {
        ::log::trace!("Ignoring pagination link {:?} on {}", href, current_url);
        return None;
    }
    Some(url)
}
