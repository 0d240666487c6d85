use crate::config::SiteConfig;
use url::Url;

/// Resolve an `href` into an absolute URL against `base_url`
///
/// Blank input, or input that cannot be resolved, yields an empty string.
pub fn normalize_any_url(href: &str, base_url: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("//") {
        return format!("https:{}", href);
    }
    if href.starts_with("http") {
        return href.to_string();
    }

    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            ::log::debug!("Dropping unresolvable link {:?} (base {}): {}", href, base_url, e);
            String::new()
        }
    }
}

/// Site-aware normalizer for a catalog split across two hosts
///
/// Category pages live on one host while product and company pages live on
/// another, so site-absolute paths are anchored by their first segment rather
/// than by the page they were found on.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    category_root: String,
    catalog_root: String,
    category_prefix: String,
    catalog_prefixes: Vec<String>,
}

impl SiteUrls {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            category_root: site.category_root.clone(),
            catalog_root: site.catalog_root.clone(),
            category_prefix: site.category_prefix.clone(),
            catalog_prefixes: vec![site.product_prefix.clone(), site.profile_prefix.clone()],
        }
    }

    /// Canonical absolute form of `href` found on `page_url`
    pub fn normalize(&self, href: &str, page_url: Option<&str>) -> String {
        let href = href.trim();
        if href.is_empty() {
            return String::new();
        }
        if href.starts_with("//") || href.starts_with("http") {
            return normalize_any_url(href, &self.catalog_root);
        }

        if starts_with_segment(href, &self.category_prefix) {
            return normalize_any_url(href, &self.category_root);
        }
        if self
            .catalog_prefixes
            .iter()
            .any(|prefix| starts_with_segment(href, prefix))
        {
            return normalize_any_url(href, &self.catalog_root);
        }

        if href.starts_with('/') {
            return normalize_any_url(href, &self.catalog_root);
        }

        match page_url {
            Some(page_url) if !page_url.is_empty() => normalize_any_url(href, page_url),
            _ => normalize_any_url(href, &self.catalog_root),
        }
    }
}

/// True for `/segment/...` and `segment/...`
fn starts_with_segment(href: &str, segment: &str) -> bool {
    let path = href.strip_prefix('/').unwrap_or(href);
    path.strip_prefix(segment).is_some_and(|rest| rest.starts_with('/'))
}
