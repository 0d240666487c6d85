use crate::config::HarvestConfig;
use crate::crawlers::crawler::PageNavigator;
use crate::error::NavigationError;
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;

/// Drivers tried when the configured WebDriver URL is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Page navigator backed by a WebDriver browser session
pub struct WebDriverNavigator {
    client: Client,
}

impl WebDriverNavigator {
    /// Open a browser session on the configured WebDriver, falling back to common local ports
    pub async fn connect(config: &HarvestConfig) -> Result<Self, NavigationError> {
        let capabilities = browser_capabilities(config.headless, &config.user_agent);

        match open_session(&config.webdriver_url, &capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == config.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = open_session(url, &capabilities).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(NavigationError::Connect(format!(
            "no WebDriver reachable at {} or fallbacks",
            config.webdriver_url
        )))
    }
}

async fn open_session(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(webdriver_url).await
}

/// Chrome capabilities for a headless session with a desktop user agent
fn browser_capabilities(headless: bool, user_agent: &str) -> Capabilities {
    let mut args = vec![
        format!("--user-agent={}", user_agent),
        "--window-size=1366,900".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }

    let mut capabilities = Capabilities::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

/// Render a WebDriver command error, flagging lost sessions
fn describe_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> String {
    let message = error.to_string();
    if message.contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    }
    message
}

#[async_trait]
impl PageNavigator for WebDriverNavigator {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
        ::log::debug!("GOTO: {}", url);
        match tokio::time::timeout(timeout, self.client.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(NavigationError::Failed {
                url: url.to_string(),
                reason: describe_error(e, "loading", url),
            }),
            Err(_) => Err(NavigationError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn content(&mut self) -> Result<String, NavigationError> {
        self.client
            .source()
            .await
            .map_err(|e| NavigationError::Content(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), NavigationError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| NavigationError::Failed {
                url: String::new(),
                reason: format!("closing session: {}", e),
            })
    }
}
