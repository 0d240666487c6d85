pub mod collector;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod session;
pub mod sink;
pub mod urls;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CategoryConfig, FailurePolicy, HarvestConfig};
pub use error::{HarvestError, NavigationError};
pub use results::Listing;
pub use session::HarvestSession;

use crawlers::WebDriverNavigator;

/// Main builder for a harvest run against a WebDriver browser
pub struct Harvester {
    config: HarvestConfig,
}

impl Harvester {
    /// Create a new Harvester with the given configuration
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, HarvestError> {
        Ok(Self::new(HarvestConfig::from_file(path)?))
    }

    /// Stop after this many listings across all categories
    pub fn with_max_listings(mut self, max_listings: usize) -> Self {
        self.config.max_listings = Some(max_listings);
        self
    }

    /// Follow at most this many pages per category
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Apply a `WEBDRIVER_URL` value, which wins over the configured URL unless blank
    pub fn with_webdriver_env(self, webdriver_url: Option<String>) -> Self {
        match webdriver_url {
            Some(url) if !url.trim().is_empty() => self.with_webdriver_url(url.trim()),
            _ => self,
        }
    }

    pub fn with_output_path(mut self, output_path: &str) -> Self {
        self.config.output_path = output_path.to_string();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Run every category and return the deduplicated listings
    pub async fn run(self) -> Result<Vec<Listing>, HarvestError> {
        let config = self.config;
        config.validate()?;

        let navigator = WebDriverNavigator::connect(&config).await?;
        let mut session = HarvestSession::new(navigator, config)?;

        let outcome = session.run().await;
        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        log_summaries(session.summaries());
        if session.collector().is_empty() {
            ::log::warn!("No listings were collected");
        }
        outcome?;

        Ok(session.finish())
    }
}

fn log_summaries(summaries: &[session::CategorySummary]) {
    for summary in summaries {
        match &summary.error {
            Some(error) => ::log::warn!(
                "{}: {} listings before failure ({})",
                summary.name,
                summary.listings,
                error
            ),
            None => ::log::info!("{}: {} listings", summary.name, summary.listings),
        }
    }
}
