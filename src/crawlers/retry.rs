use crate::config::RetryPolicy;
use crate::crawlers::crawler::PageNavigator;
use crate::error::NavigationError;
use std::time::Duration;

/// Where a navigation currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    Navigating { attempt: u32 },
    Retrying { attempt: u32, delay: Duration },
    Success,
    Failed,
}

/// Wraps a navigator with bounded exponential backoff
pub struct RetryNavigator<N> {
    navigator: N,
    policy: RetryPolicy,
    state: NavigationState,
}

impl<N: PageNavigator> RetryNavigator<N> {
    pub fn new(navigator: N, policy: RetryPolicy) -> Self {
        Self {
            navigator,
            policy,
            state: NavigationState::Idle,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn inner(&self) -> &N {
        &self.navigator
    }

    pub fn inner_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Load `url`, retrying failed attempts, then wait for the page to settle
    ///
    /// Returns how many attempts were used. After `max_attempts` failures the
    /// last error is returned wrapped in [`NavigationError::Exhausted`].
    pub async fn goto(&mut self, url: &str) -> Result<u32, NavigationError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            self.transition(NavigationState::Navigating { attempt });

            match self.navigator.goto(url, self.policy.timeout()).await {
                Ok(()) => {
                    self.navigator.wait(self.policy.settle()).await;
                    self.transition(NavigationState::Success);
                    return Ok(attempt + 1);
                }
                Err(error) if attempt + 1 < max_attempts => {
                    let delay = self.policy.backoff(attempt);
                    ::log::warn!(
                        "Retry {}/{} for {} in {:.1}s after: {}",
                        attempt + 1,
                        max_attempts - 1,
                        url,
                        delay.as_secs_f64(),
                        error
                    );
                    self.transition(NavigationState::Retrying { attempt, delay });
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    self.transition(NavigationState::Failed);
                    ::log::error!("Giving up on {} after {} attempts", url, attempt + 1);
                    return Err(NavigationError::Exhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                        last: Box::new(error),
                    });
                }
            }
        }
    }

    /// Navigate to `url` and return its rendered source with the attempts used
    pub async fn fetch(&mut self, url: &str) -> Result<(String, u32), NavigationError> {
        let attempts = self.goto(url).await?;
        let source = self.navigator.content().await?;
        Ok((source, attempts))
    }

    fn transition(&mut self, next: NavigationState) {
        ::log::trace!("Navigation state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::time::Instant;

    /// Fails the first `failures` loads, recording when each load started
    struct FlakyNavigator {
        failures: u32,
        starts: Vec<Instant>,
        waits: Vec<Duration>,
    }

    impl FlakyNavigator {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                starts: Vec::new(),
                waits: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl PageNavigator for FlakyNavigator {
        async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavigationError> {
            self.starts.push(Instant::now());
            if self.failures > 0 {
                self.failures -= 1;
                return Err(NavigationError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            Ok(())
        }

        async fn content(&mut self) -> Result<String, NavigationError> {
            Ok("<html></html>".to_string())
        }

        async fn wait(&mut self, duration: Duration) {
            self.waits.push(duration);
            tokio::time::sleep(duration).await;
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff_base: 2,
            backoff_unit_ms: 1000,
            timeout_ms: 30_000,
            settle_ms: 3000,
        }
    }

    fn gaps(starts: &[Instant]) -> Vec<Duration> {
        starts.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_schedule_then_failure() {
        let mut navigator = RetryNavigator::new(FlakyNavigator::new(u32::MAX), policy(4));

        let error = navigator.goto("https://example.com/list").await.unwrap_err();

        assert!(matches!(
            error,
            NavigationError::Exhausted { attempts: 4, .. }
        ));
        assert_eq!(navigator.state(), &NavigationState::Failed);
        assert_eq!(
            gaps(&navigator.inner().starts),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
        assert!(navigator.inner().waits.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_failures() {
        let mut navigator = RetryNavigator::new(FlakyNavigator::new(2), policy(4));

        let attempts = navigator.goto("https://example.com/list").await.unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(navigator.state(), &NavigationState::Success);
        assert_eq!(navigator.inner().waits, vec![Duration::from_secs(3)]);
        assert_eq!(
            gaps(&navigator.inner().starts),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_sleeps() {
        let mut navigator = RetryNavigator::new(FlakyNavigator::new(1), policy(1));
        let started = Instant::now();

        assert!(navigator.goto("https://example.com/list").await.is_err());
        assert_eq!(navigator.inner().starts.len(), 1);
        assert_eq!(Instant::now() - started, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_returns_source() {
        let mut navigator = RetryNavigator::new(FlakyNavigator::new(0), policy(4));
        assert_eq!(navigator.state(), &NavigationState::Idle);

        let (source, attempts) = navigator.fetch("https://example.com/list").await.unwrap();
        assert_eq!(source, "<html></html>");
        assert_eq!(attempts, 1);
    }
}
