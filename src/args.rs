use catalog_harvest::{FailurePolicy, HarvestConfig, HarvestError, Harvester};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(about = "Harvest product listings from paginated catalog pages into CSV")]
#[command(version)]
pub struct Args {
    /// Stop after collecting this many listings (across all categories)
    #[arg(long)]
    pub max_listings: Option<usize>,

    /// Max listing pages to follow per category (best-effort via a Next link)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV output path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// WebDriver URL (WEBDRIVER_URL takes precedence)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Keep going with the next category when a page cannot be loaded
    #[arg(long, default_value_t = false)]
    pub skip_failed_categories: bool,
}

impl Args {
    /// Build the harvester, command-line flags overriding the file and
    /// `WEBDRIVER_URL` overriding both
    pub fn into_harvester(self) -> Result<Harvester, HarvestError> {
        self.into_harvester_with_env(std::env::var("WEBDRIVER_URL").ok())
    }

    fn into_harvester_with_env(
        self,
        webdriver_env: Option<String>,
    ) -> Result<Harvester, HarvestError> {
        let mut harvester = match &self.config {
            Some(path) => Harvester::from_config_file(path)?,
            None => Harvester::new(HarvestConfig::default()),
        };

        if let Some(max_listings) = self.max_listings {
            harvester = harvester.with_max_listings(max_listings);
        }
        if let Some(max_pages) = self.max_pages {
            harvester = harvester.with_max_pages(max_pages);
        }
        if let Some(output) = &self.output {
            harvester = harvester.with_output_path(output);
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            harvester = harvester.with_webdriver_url(webdriver_url);
        }
        if self.skip_failed_categories {
            harvester = harvester.with_failure_policy(FailurePolicy::SkipCategory);
        }
        let harvester = harvester.with_webdriver_env(webdriver_env);

        harvester.config().validate()?;
        Ok(harvester)
    }
}
