use crate::utils::collapse_whitespace;
use scraper::ElementRef;

/// Flatten an element's text into one trimmed line per text node
///
/// Whitespace-only nodes are dropped, so the result has no blank lines. This
/// is the block representation the field extractors scan.
pub fn block_text(element: ElementRef) -> String {
    trimmed_fragments(element).collect::<Vec<_>>().join("\n")
}

/// Flatten an element's text onto a single whitespace-collapsed line
pub fn inline_text(element: ElementRef) -> String {
    collapse_whitespace(&trimmed_fragments(element).collect::<Vec<_>>().join(" "))
}

fn trimmed_fragments<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
}
