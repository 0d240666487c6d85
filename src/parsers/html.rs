use crate::config::SiteConfig;
use crate::filter::LinkClassifier;
use crate::parsers::card::CardResolver;
use crate::parsers::fields::{extract_location, extract_price};
use crate::parsers::text::{block_text, inline_text};
use crate::results::{Listing, ListingContext};
use crate::urls::SiteUrls;
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Anchor selector should be valid"));

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 500;
const MAX_SUPPLIER_CHARS: usize = 200;
const MAX_LOCATION_CHARS: usize = 300;

/// Turns a rendered listing page into listing records
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    urls: SiteUrls,
    classifier: LinkClassifier,
    currency_markers: Vec<String>,
    location_anchor: String,
    max_card_depth: usize,
}

impl ListingExtractor {
    pub fn new(site: &SiteConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            urls: SiteUrls::new(site),
            classifier: LinkClassifier::new(site)?,
            currency_markers: site.currency_markers.clone(),
            location_anchor: site.location_anchor.clone(),
            max_card_depth: site.max_card_depth,
        })
    }

    pub fn card_resolver(&self) -> CardResolver<'_> {
        CardResolver::new(&self.classifier, &self.currency_markers, self.max_card_depth)
    }

    /// Extract one listing per product link, in document order
    pub fn extract(&self, doc: &Html, page_url: &str, context: ListingContext) -> Vec<Listing> {
        let listings: Vec<Listing> = doc
            .select(&HREF_SELECTOR)
            .filter(|anchor| {
                anchor
                    .value()
                    .attr("href")
                    .is_some_and(|href| self.classifier.is_product_link(href))
            })
            .filter_map(|anchor| self.extract_one(anchor, page_url, context))
            .collect();

        ::log::debug!("Extracted {} listings from {}", listings.len(), page_url);
        listings
    }

    fn extract_one(
        &self,
        link: ElementRef,
        page_url: &str,
        context: ListingContext,
    ) -> Option<Listing> {
        let href = link.value().attr("href")?;
        let url = self.urls.normalize(href, Some(page_url));
        if url.is_empty() {
            return None;
        }

        let title = inline_text(link);
        if title.chars().count() < MIN_TITLE_CHARS {
            ::log::trace!("Skipping product link without a usable title: {}", url);
            return None;
        }
        let title = truncate_chars(&title, MAX_TITLE_CHARS);

        let mut listing = Listing::new(title, url, context.category, context.scraped_at);

        let Some(card) = self.card_resolver().resolve(link) else {
            ::log::debug!("No card found around {}", listing.url);
            return Some(listing);
        };

        let text = block_text(card);
        listing.price = extract_price(&text);
        listing.location = truncate_chars(
            &extract_location(&text, &self.location_anchor),
            MAX_LOCATION_CHARS,
        );
        listing.supplier = self.find_supplier(card, &listing, page_url);

        if listing.price.is_empty() {
            ::log::trace!("No price in card for {}", listing.url);
        }
        Some(listing)
    }

    /// Text of the first profile link in the card that is not the product itself
    fn find_supplier(&self, card: ElementRef, listing: &Listing, page_url: &str) -> String {
        card.select(&HREF_SELECTOR)
            .find_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let url = self.urls.normalize(href, Some(page_url));
                if url.is_empty()
                    || url == listing.url
                    || self.classifier.is_product_url(&url)
                    || !self.classifier.is_supplier_link(&url)
                {
                    return None;
                }

                let name = inline_text(anchor);
                if name.is_empty() || name == listing.title {
                    return None;
                }
                Some(truncate_chars(&name, MAX_SUPPLIER_CHARS))
            })
            .unwrap_or_default()
    }
}
