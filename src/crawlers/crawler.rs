use crate::error::NavigationError;
use async_trait::async_trait;
use std::time::Duration;

/// A browser tab that can load a URL and hand back the rendered source
#[async_trait]
pub trait PageNavigator: Send {
    /// Load `url`, failing if it does not complete within `timeout`
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError>;

    /// Rendered HTML of the currently loaded page
    async fn content(&mut self) -> Result<String, NavigationError>;

    /// Pause, typically to let client-side rendering finish
    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Release the underlying session
    async fn close(&mut self) -> Result<(), NavigationError> {
        Ok(())
    }
}
