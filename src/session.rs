use crate::collector::Collector;
use crate::config::{CategoryConfig, FailurePolicy, HarvestConfig};
use crate::crawlers::{PageNavigator, RetryNavigator};
use crate::error::{HarvestError, NavigationError};
use crate::parsers::Parser;
use crate::results::{Listing, ListingContext};
use crate::utils::run_timestamp;
use std::collections::HashSet;

/// Traversal state for one category
#[derive(Debug, Default)]
pub struct PageContext {
    current_url: Option<String>,
    visited: HashSet<String>,
    pages: usize,
    retries: u32,
}

impl PageContext {
    pub fn new(start_url: &str) -> Self {
        Self {
            current_url: Some(start_url.to_string()),
            ..Self::default()
        }
    }

    /// Claim the next page to load, or `None` when the walk is over
    ///
    /// The walk ends at the page cap, when no next page is known, or when the
    /// next page was already visited.
    pub fn advance(&mut self, max_pages: usize) -> Option<String> {
        if self.pages >= max_pages {
            ::log::debug!("Page cap of {} reached", max_pages);
            return None;
        }
        let url = self.current_url.take()?;
        if !self.visited.insert(url.clone()) {
            ::log::debug!("Pagination cycled back to {}", url);
            return None;
        }
        self.pages += 1;
        Some(url)
    }

    pub fn set_next(&mut self, next_url: Option<String>) {
        self.current_url = next_url;
    }

    /// Count the retries spent on a navigation that took `attempts` attempts
    pub fn record_attempts(&mut self, attempts: u32) {
        self.retries += attempts.saturating_sub(1);
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

/// Outcome of harvesting one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub listings: usize,
    pub pages: usize,
    pub retries: u32,
    /// Set when the category was abandoned after a navigation failure
    pub error: Option<String>,
}

/// A single harvest run over every configured category
pub struct HarvestSession<N> {
    navigator: RetryNavigator<N>,
    parser: Parser,
    collector: Collector,
    config: HarvestConfig,
    scraped_at: String,
    summaries: Vec<CategorySummary>,
}

impl<N: PageNavigator> HarvestSession<N> {
    pub fn new(navigator: N, config: HarvestConfig) -> Result<Self, HarvestError> {
        config.validate()?;
        Ok(Self {
            navigator: RetryNavigator::new(navigator, config.retry.clone()),
            parser: Parser::new(&config.site)?,
            collector: Collector::new(config.max_listings),
            config,
            scraped_at: run_timestamp(),
            summaries: Vec::new(),
        })
    }

    /// Override the run timestamp stamped onto listings
    pub fn with_scraped_at(mut self, scraped_at: &str) -> Self {
        self.scraped_at = scraped_at.to_string();
        self
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn summaries(&self) -> &[CategorySummary] {
        &self.summaries
    }

    pub fn navigator(&self) -> &N {
        self.navigator.inner()
    }

    /// Harvest every category in order, stopping early once the listing cap is hit
    pub async fn run(&mut self) -> Result<(), HarvestError> {
        let categories = self.config.categories.clone();

        for (index, category) in categories.iter().enumerate() {
            if self.collector.is_full() {
                ::log::info!(
                    "Listing cap reached, skipping {} remaining categories",
                    categories.len() - index
                );
                break;
            }
            if index > 0 {
                tokio::time::sleep(self.config.category_delay()).await;
            }

            ::log::info!("Scraping: {} - {}", category.name, category.url);
            let mut context = PageContext::new(&category.url);
            let before = self.collector.len();
            let outcome = self.harvest_category(category, &mut context).await;

            let mut summary = CategorySummary {
                name: category.name.clone(),
                listings: self.collector.len() - before,
                pages: context.pages(),
                retries: context.retries(),
                error: None,
            };

            if let Err(error) = outcome {
                match self.config.failure_policy {
                    FailurePolicy::AbortRun => {
                        ::log::error!("Aborting run on {}: {}", category.name, error);
                        self.summaries.push(summary);
                        return Err(error.into());
                    }
                    FailurePolicy::SkipCategory => {
                        ::log::warn!("Skipping rest of {}: {}", category.name, error);
                        summary.error = Some(error.to_string());
                    }
                }
            }

            ::log::info!(
                "  -> {} listings from {} pages ({} retries)",
                summary.listings,
                summary.pages,
                summary.retries
            );
            self.summaries.push(summary);
        }

        Ok(())
    }

    /// Walk one category's pages, feeding listings to the collector
    pub async fn harvest_category(
        &mut self,
        category: &CategoryConfig,
        context: &mut PageContext,
    ) -> Result<(), NavigationError> {
        let listing_context = ListingContext {
            category: &category.name,
            scraped_at: &self.scraped_at,
        };

        while let Some(url) = context.advance(self.config.max_pages) {
            let (source, attempts) = match self.navigator.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    if let NavigationError::Exhausted { attempts, .. } = &error {
                        context.record_attempts(*attempts);
                    }
                    return Err(error);
                }
            };
            context.record_attempts(attempts);

            let result = self.parser.parse(&source, &url, listing_context);
            ::log::debug!(
                "Page {} of {}: {} listings",
                context.pages(),
                category.name,
                result.listings.len()
            );

            for listing in result.listings {
                if !self.collector.push(listing) {
                    break;
                }
            }
            if self.collector.is_full() {
                ::log::info!("Listing cap reached on {}", url);
                break;
            }

            context.set_next(result.next_page);
        }

        Ok(())
    }

    /// Release the browser session
    pub async fn close(&mut self) -> Result<(), NavigationError> {
        self.navigator.inner_mut().close().await
    }

    /// Consume the session, returning its listings deduplicated by URL
    pub fn finish(self) -> Vec<Listing> {
        self.collector.into_deduplicated()
    }
}
