use catalog_harvest::sink::{CsvSink, ListingSink};
use clap::Parser;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let harvester = match args.into_harvester() {
        Ok(harvester) => harvester,
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(2);
        }
    };

    println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Using WebDriver at {} (set WEBDRIVER_URL to change it)",
        harvester.config().webdriver_url
    );

    let output_path = harvester.config().output_path.clone();
    let start_time = std::time::Instant::now();

    let listings = match harvester.run().await {
        Ok(listings) => listings,
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            std::process::exit(1);
        }
    };

    let saved = CsvSink::create(&output_path).and_then(|mut sink| sink.write_all(&listings));
    if let Err(e) = saved {
        ::log::error!("Failed to write {}: {}", output_path, e);
        std::process::exit(1);
    }

    ::log::info!(
        "Saved {} listings to {} in {:.2} seconds",
        listings.len(),
        output_path,
        start_time.elapsed().as_secs_f64()
    );
}
