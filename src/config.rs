use crate::error::HarvestError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// A catalog section to harvest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Label written into every listing's `category` column
    pub name: String,

    /// First listing page of the section
    pub url: String,
}

impl CategoryConfig {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Hosts, path conventions and text markers of the target site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Host serving category listing pages
    #[serde(default = "default_category_root")]
    pub category_root: String,

    /// Host serving product detail and company pages, also the fallback root
    #[serde(default = "default_catalog_root")]
    pub catalog_root: String,

    /// First path segment of category listing pages
    #[serde(default = "default_category_prefix")]
    pub category_prefix: String,

    /// First path segment of product detail pages
    #[serde(default = "default_product_prefix")]
    pub product_prefix: String,

    /// First path segment of company profile pages
    #[serde(default = "default_profile_prefix")]
    pub profile_prefix: String,

    /// First path segment of search pages
    #[serde(default = "default_search_prefix")]
    pub search_prefix: String,

    /// Hosts must end with this to count as on-site
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,

    /// Regex matched against raw `href` attributes to find product links
    #[serde(default = "default_product_link_pattern")]
    pub product_link_pattern: String,

    /// Text fragments marking a block as carrying a price
    #[serde(default = "default_currency_markers")]
    pub currency_markers: Vec<String>,

    /// Phrase after which the location line follows
    #[serde(default = "default_location_anchor")]
    pub location_anchor: String,

    /// Maximum number of ancestors examined when resolving a card
    #[serde(default = "default_max_card_depth")]
    pub max_card_depth: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            category_root: default_category_root(),
            catalog_root: default_catalog_root(),
            category_prefix: default_category_prefix(),
            product_prefix: default_product_prefix(),
            profile_prefix: default_profile_prefix(),
            search_prefix: default_search_prefix(),
            domain_suffix: default_domain_suffix(),
            product_link_pattern: default_product_link_pattern(),
            currency_markers: default_currency_markers(),
            location_anchor: default_location_anchor(),
            max_card_depth: default_max_card_depth(),
        }
    }
}

/// Bounded exponential backoff applied to page navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before retry `n` (0-based) is `unit * base^(n+1)`
    #[serde(default = "default_backoff_base")]
    pub backoff_base: u64,

    /// Unit of the backoff delay in milliseconds
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,

    /// Per-attempt navigation timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wait after a successful load so client-side rendering can finish
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
            backoff_unit_ms: default_backoff_unit_ms(),
            timeout_ms: default_timeout_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after the failed attempt with the given 0-based index
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = self.backoff_base.saturating_pow(attempt.saturating_add(1));
        Duration::from_millis(self.backoff_unit_ms.saturating_mul(factor))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// What to do when a page cannot be loaded after all retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole run
    #[default]
    AbortRun,
    /// Keep what was collected and move on to the next category
    SkipCategory,
}

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Sections to harvest, in order
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub retry: RetryPolicy,

    /// Stop after this many listings across all categories
    #[serde(default)]
    pub max_listings: Option<usize>,

    /// Maximum listing pages followed per category
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pause between categories
    #[serde(default = "default_category_delay_ms")]
    pub category_delay_ms: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// User agent presented by the browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Destination of the CSV output
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            site: SiteConfig::default(),
            retry: RetryPolicy::default(),
            max_listings: None,
            max_pages: default_max_pages(),
            category_delay_ms: default_category_delay_ms(),
            failure_policy: FailurePolicy::default(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            output_path: default_output_path(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the traversal cannot work with
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.retry.max_attempts == 0 {
            return Err(HarvestError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(HarvestError::Config("max_pages must be at least 1".to_string()));
        }
        if let Some(category) = self.categories.iter().find(|c| c.url.trim().is_empty()) {
            return Err(HarvestError::Config(format!(
                "category '{}' has no url",
                category.name
            )));
        }
        Ok(())
    }

    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    let root = default_category_root();
    vec![
        CategoryConfig::new(
            "Industrial Machinery",
            &format!("{}impcat/industrial-machinery.html", root),
        ),
        CategoryConfig::new(
            "Electronics",
            &format!("{}impcat/electronic-gadgets.html", root),
        ),
    ]
}

fn default_category_root() -> String {
    "https://dir.indiamart.com/".to_string()
}

fn default_catalog_root() -> String {
    "https://www.indiamart.com/".to_string()
}

fn default_category_prefix() -> String {
    "impcat".to_string()
}

fn default_product_prefix() -> String {
    "proddetail".to_string()
}

fn default_profile_prefix() -> String {
    "company".to_string()
}

fn default_search_prefix() -> String {
    "search".to_string()
}

fn default_domain_suffix() -> String {
    "indiamart.com".to_string()
}

fn default_product_link_pattern() -> String {
    r"(?:indiamart\.com/|^/?)proddetail/".to_string()
}

fn default_currency_markers() -> Vec<String> {
    vec!["₹".to_string(), "Rs".to_string()]
}

fn default_location_anchor() -> String {
    "Contact Supplier".to_string()
}

fn default_max_card_depth() -> usize {
    15
}

fn default_max_attempts() -> u32 {
    4
}

fn default_backoff_base() -> u64 {
    2
}

fn default_backoff_unit_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_max_pages() -> usize {
    1
}

fn default_category_delay_ms() -> u64 {
    2500
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_output_path() -> String {
    "output/listings.csv".to_string()
}
