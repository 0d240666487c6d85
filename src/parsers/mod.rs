pub mod card;
pub mod fields;
pub mod html;
pub mod pagination;
pub mod text;

#[cfg(test)]
mod tests;

use crate::config::SiteConfig;
use crate::results::{Listing, ListingContext};
use html::ListingExtractor;
use scraper::Html;

/// Result of parsing one listing page
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Listings found on the page, in document order
    pub listings: Vec<Listing>,
    /// Absolute URL of the following page, if any
    pub next_page: Option<String>,
}

/// Parses rendered listing pages into listings and a pagination hint
#[derive(Debug, Clone)]
pub struct Parser {
    extractor: ListingExtractor,
}

impl Parser {
    pub fn new(site: &SiteConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor: ListingExtractor::new(site)?,
        })
    }

    /// Parse raw page source fetched from `page_url`
    pub fn parse(&self, source: &str, page_url: &str, context: ListingContext) -> ParseResult {
        let doc = Html::parse_document(source);
        self.parse_document(&doc, page_url, context)
    }

    /// Extract from an already parsed document
    pub fn parse_document(
        &self,
        doc: &Html,
        page_url: &str,
        context: ListingContext,
    ) -> ParseResult {
        ParseResult {
            listings: self.extractor.extract(doc, page_url, context),
            next_page: pagination::next_page(doc, page_url),
        }
    }
}
