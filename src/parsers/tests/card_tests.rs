use crate::config::SiteConfig;
use crate::filter::LinkClassifier;
use crate::parsers::card::CardResolver;
use scraper::{ElementRef, Html, Selector};

#[cfg(test)]
mod tests {
    use super::*;

    const SIBLING_CARDS: &str = r#"
        <html><body>
          <div id="list">
            <div class="card" id="card-a">
              <div class="info"><a href="https://www.indiamart.com/proddetail/press-1.html">Hydraulic Press</a></div>
              <span>₹ 1,25,000/Unit</span>
            </div>
            <div class="card" id="card-b">
              <div class="info"><a href="https://www.indiamart.com/proddetail/lathe-2.html">CNC Lathe</a></div>
              <span>₹ 4,50,000</span>
            </div>
          </div>
        </body></html>"#;

    fn classifier() -> LinkClassifier {
        LinkClassifier::new(&SiteConfig::default()).unwrap()
    }

    fn link<'a>(doc: &'a Html, href: &str) -> ElementRef<'a> {
        let selector = Selector::parse(&format!(r#"a[href="{}"]"#, href)).unwrap();
        doc.select(&selector).next().unwrap()
    }

    fn element_id<'a>(element: ElementRef<'a>) -> Option<&'a str> {
        element.value().id()
    }

    #[test]
    fn test_sibling_cards_resolve_to_distinct_boundaries() {
        let doc = Html::parse_document(SIBLING_CARDS);
        let classifier = classifier();
        let markers = SiteConfig::default().currency_markers;
        let resolver = CardResolver::new(&classifier, &markers, 15);

        let first = link(&doc, "https://www.indiamart.com/proddetail/press-1.html");
        let second = link(&doc, "https://www.indiamart.com/proddetail/lathe-2.html");

        let card_a = resolver.resolve(first).unwrap();
        let card_b = resolver.resolve(second).unwrap();

        assert_ne!(card_a, card_b);
        assert_eq!(element_id(card_a), Some("card-a"));
        assert_eq!(element_id(card_b), Some("card-b"));
        assert!(!card_a.descendants().any(|node| node == *second));
        assert!(!card_b.descendants().any(|node| node == *first));
    }

    #[test]
    fn test_single_link_page_stops_below_body() {
        let doc = Html::parse_document(
            r#"<html><body><div id="outer"><div id="d1"><div id="d2"><div id="d3">
                <a href="/proddetail/pump-1.html">Water Pump</a>
            </div></div></div></div></body></html>"#,
        );
        let classifier = classifier();
        let markers = SiteConfig::default().currency_markers;
        let product = link(&doc, "/proddetail/pump-1.html");

        let resolver = CardResolver::new(&classifier, &markers, 15);
        assert_eq!(element_id(resolver.by_link_density(product).unwrap()), Some("outer"));

        let shallow = CardResolver::new(&classifier, &markers, 2);
        assert_eq!(element_id(shallow.by_link_density(product).unwrap()), Some("d2"));
    }

    #[test]
    fn test_currency_fallback_when_links_share_a_parent() {
        let doc = Html::parse_document(
            r#"<html><body><div id="grid"><p id="row">
                <a href="/proddetail/lathe-1.html">Lathe Machine</a> Rs. 5000
                <a href="/proddetail/drill-2.html">Bench Drill</a>
            </p></div></body></html>"#,
        );
        let classifier = classifier();
        let markers = SiteConfig::default().currency_markers;
        let resolver = CardResolver::new(&classifier, &markers, 15);
        let product = link(&doc, "/proddetail/lathe-1.html");

        assert!(resolver.by_link_density(product).is_none());
        let fallback = resolver.by_currency_text(product).unwrap();
        assert_eq!(element_id(fallback), Some("row"));
        assert_eq!(element_id(resolver.resolve(product).unwrap()), Some("row"));
    }

    #[test]
    fn test_no_card_without_isolation_or_price() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="/proddetail/lathe-1.html">Lathe Machine</a>
                <a href="/proddetail/drill-2.html">Bench Drill</a>
            </body></html>"#,
        );
        let classifier = classifier();
        let markers = SiteConfig::default().currency_markers;
        let resolver = CardResolver::new(&classifier, &markers, 15);

        assert!(resolver.resolve(link(&doc, "/proddetail/lathe-1.html")).is_none());
    }

    #[test]
    fn test_non_product_links_do_not_split_cards() {
        let doc = Html::parse_document(
            r#"<html><body><div id="list">
                <div id="card"><a href="/proddetail/lathe-1.html">Lathe Machine</a>
                  <a href="/company/abc/">ABC</a><a href="/impcat/lathes.html">More lathes</a></div>
                <div><a href="/proddetail/drill-2.html">Bench Drill</a></div>
            </div></body></html>"#,
        );
        let classifier = classifier();
        let markers = SiteConfig::default().currency_markers;
        let resolver = CardResolver::new(&classifier, &markers, 15);

        let card = resolver.resolve(link(&doc, "/proddetail/lathe-1.html")).unwrap();
        assert_eq!(element_id(card), Some("card"));
    }
}
