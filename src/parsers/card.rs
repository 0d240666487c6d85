use crate::filter::LinkClassifier;
use crate::parsers::text::block_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Anchor selector should be valid"));

/// Finds the DOM subtree holding exactly one listing around a product link
///
/// Listing pages carry no container tag for a card, so the boundary is
/// inferred from product-link density, with a looser price-text fallback.
#[derive(Debug, Clone, Copy)]
pub struct CardResolver<'c> {
    classifier: &'c LinkClassifier,
    currency_markers: &'c [String],
    max_depth: usize,
}

impl<'c> CardResolver<'c> {
    pub fn new(
        classifier: &'c LinkClassifier,
        currency_markers: &'c [String],
        max_depth: usize,
    ) -> Self {
        Self {
            classifier,
            currency_markers,
            max_depth,
        }
    }

    /// Link-density boundary, falling back to the first ancestor mentioning a price
    pub fn resolve<'a>(&self, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.by_link_density(link).or_else(|| self.by_currency_text(link))
    }

    /// Largest ancestor whose only product link is `link`
    ///
    /// Ascends while the ancestor still holds a single product link; the first
    /// ancestor that also holds a sibling's product link ends the walk.
    pub fn by_link_density<'a>(&self, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let mut card = None;
        for ancestor in self.ancestors(link) {
            if !self.holds_only(ancestor, link) {
                break;
            }
            card = Some(ancestor);
        }
        card
    }

    /// Nearest ancestor whose flattened text contains a currency marker
    pub fn by_currency_text<'a>(&self, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.ancestors(link).find(|ancestor| {
            let text = block_text(*ancestor);
            self.currency_markers
                .iter()
                .any(|marker| !marker.is_empty() && text.contains(marker.as_str()))
        })
    }

    /// Element ancestors below `<body>`, nearest first, bounded by `max_depth`
    fn ancestors<'a>(&self, link: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
        std::iter::successors(parent_element(link), |element| parent_element(*element))
            .take_while(|element| element.value().name() != "body")
            .take(self.max_depth)
    }

    fn holds_only<'a>(&self, ancestor: ElementRef<'a>, link: ElementRef<'a>) -> bool {
        let mut product_links = ancestor.select(&HREF_SELECTOR).filter(|anchor| {
            anchor
                .value()
                .attr("href")
                .is_some_and(|href| self.classifier.is_product_link(href))
        });

        product_links.next() == Some(link) && product_links.next().is_none()
    }
}

fn parent_element(element: ElementRef) -> Option<ElementRef> {
    element.parent().and_then(ElementRef::wrap)
}
