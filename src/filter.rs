use crate::config::SiteConfig;
use regex::Regex;
use url::Url;

/// Decides what role a link plays on the site, judged purely by URL shape
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    domain_suffix: String,
    profile_prefix: String,
    product_prefix: String,
    reserved_segments: Vec<String>,
    product_link_regex: Regex,
}

impl LinkClassifier {
    /// Create a classifier from the site configuration
    pub fn new(site: &SiteConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            domain_suffix: site.domain_suffix.to_lowercase(),
            profile_prefix: site.profile_prefix.to_lowercase(),
            product_prefix: site.product_prefix.to_lowercase(),
            reserved_segments: vec![
                site.product_prefix.to_lowercase(),
                site.category_prefix.to_lowercase(),
                site.search_prefix.to_lowercase(),
            ],
            product_link_regex: Regex::new(&site.product_link_pattern)?,
        })
    }

    /// Whether a raw `href` attribute points at a product detail page
    pub fn is_product_link(&self, href: &str) -> bool {
        self.product_link_regex.is_match(href)
    }

    /// Whether a normalized URL is a product detail page
    pub fn is_product_url(&self, url: &str) -> bool {
        url.contains(&format!("/{}/", self.product_prefix))
    }

    /// Whether a normalized URL looks like a supplier or company profile page
    pub fn is_supplier_link(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        if !self.is_on_site(&parsed) {
            return false;
        }

        let path = parsed.path().trim_matches('/').to_lowercase();
        if path.is_empty() {
            return false;
        }

        let segments: Vec<&str> = path.split('/').collect();
        let first = segments[0];
        if self.reserved_segments.iter().any(|s| s == first) {
            return false;
        }
        if first == self.profile_prefix {
            return true;
        }

        // Bare-slug profile pages: https://www.example.com/abc-traders/
        segments.len() == 1
    }

    /// Check if a URL's host belongs to the site
    fn is_on_site(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| host.to_lowercase().ends_with(&self.domain_suffix))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LinkClassifier {
        LinkClassifier::new(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_reserved_segments_are_not_suppliers() {
        let classifier = classifier();
        for url in [
            "https://www.indiamart.com/proddetail/press-1.html",
            "https://dir.indiamart.com/impcat/industrial-machinery.html",
            "https://dir.indiamart.com/search/pumps",
            "https://www.indiamart.com/PRODDETAIL/x.html",
        ] {
            assert!(!classifier.is_supplier_link(url), "{}", url);
        }
    }

    #[test]
    fn test_profile_and_single_segment_paths_are_suppliers() {
        let classifier = classifier();
        assert!(classifier.is_supplier_link("https://www.indiamart.com/company/12345/"));
        assert!(classifier.is_supplier_link("https://www.indiamart.com/company/abc/about.html"));
        assert!(classifier.is_supplier_link("https://www.indiamart.com/abc-traders/"));
        assert!(classifier.is_supplier_link("https://m.indiamart.com/xyz-industries"));
    }

    #[test]
    fn test_multi_segment_non_profile_paths_are_rejected() {
        let classifier = classifier();
        assert!(
            !classifier.is_supplier_link("https://www.indiamart.com/abc-traders/products.html")
        );
    }

    #[test]
    fn test_off_site_and_empty_paths_are_rejected() {
        let classifier = classifier();
        assert!(!classifier.is_supplier_link("https://example.com/abc-traders/"));
        assert!(!classifier.is_supplier_link("https://www.indiamart.com/"));
        assert!(!classifier.is_supplier_link("https://www.indiamart.com"));
        assert!(!classifier.is_supplier_link("not a url"));
        assert!(!classifier.is_supplier_link(""));
    }

    #[test]
    fn test_product_links() {
        let classifier = classifier();
        assert!(classifier.is_product_link("https://www.indiamart.com/proddetail/press-1.html"));
        assert!(classifier.is_product_link("//www.indiamart.com/proddetail/press-1.html"));
        assert!(classifier.is_product_link("/proddetail/press-1.html"));
        assert!(classifier.is_product_link("proddetail/press-1.html"));
        assert!(!classifier.is_product_link("https://www.indiamart.com/company/abc/"));
        assert!(!classifier.is_product_link("https://example.com/proddetail/x.html"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let site = SiteConfig {
            product_link_pattern: "(".to_string(),
            ..SiteConfig::default()
        };
        assert!(LinkClassifier::new(&site).is_err());
    }
}
