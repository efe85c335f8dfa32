//! Polling waits on top of [`Driver`]
//!
//! Every wait is bounded: it polls its condition at the configured interval and
//! fails with [`E2eError::Timeout`] once the bound has elapsed. Transient lookup
//! errors (element missing, stale reference) count as "not yet"; anything else
//! aborts the wait immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::debug;

use super::{Driver, ElementRef};
use crate::config::Timeouts;
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

pub struct DriverHelper {
    driver: Arc<dyn Driver>,
    polling: Duration,
    default_timeout: Duration,
}

impl DriverHelper {
    pub fn new(driver: Arc<dyn Driver>, timeouts: &Timeouts) -> Self {
        Self {
            driver,
            polling: timeouts.polling(),
            default_timeout: timeouts.default_wait(),
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub async fn navigate(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.driver.navigate(url).await
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// First element matching `locator`, without waiting
    pub async fn find(&self, locator: &Locator) -> E2eResult<ElementRef> {
        self.driver
            .find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    /// First displayed element matching `locator`, if any
    pub async fn visible_element(&self, locator: &Locator) -> E2eResult<Option<ElementRef>> {
        for element in self.driver.find_elements(locator).await? {
            match self.driver.is_displayed(&element).await {
                Ok(true) => return Ok(Some(element)),
                Ok(false) => {}
                Err(e) if e.is_transient() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        Ok(self.visible_element(locator).await?.is_some())
    }

    /// Poll `check` until it yields a value or `timeout` elapses
    pub async fn wait_until<T, F, Fut>(&self, what: &str, timeout: Duration, mut check: F) -> E2eResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<Option<T>>>,
    {
        let deadline = Instant::now() + timeout;
        let polling = self.polling;

        let poll = async {
            loop {
                match check().await {
                    Ok(Some(value)) => return Ok(value),
                    Ok(None) => {}
                    Err(e) if e.is_transient() => debug!("Retrying '{}' after: {}", what, e),
                    Err(e) => return Err(e),
                }

                let now = Instant::now();
                if now >= deadline {
                    return Err(E2eError::timeout(what, timeout));
                }
                sleep(polling.min(deadline - now)).await;
            }
        };

        // A driver call that never returns still ends the wait.
        match timeout_at(deadline + polling, poll).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::timeout(what, timeout)),
        }
    }

    pub async fn wait_visibility(&self, locator: &Locator, timeout: Duration) -> E2eResult<ElementRef> {
        let what = format!("visibility of {}", locator);
        self.wait_until(&what, timeout, || self.visible_element(locator)).await
    }

    pub async fn wait_disappearance(&self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        let what = format!("disappearance of {}", locator);
        self.wait_until(&what, timeout, || async move {
            Ok(if self.is_visible(locator).await? { None } else { Some(()) })
        })
        .await
    }

    pub async fn wait_and_click(&self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        let what = format!("clicking {}", locator);
        self.wait_until(&what, timeout, || async move {
            match self.visible_element(locator).await? {
                Some(element) => {
                    self.driver.click(&element).await?;
                    Ok(Some(()))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Wait until the text of `locator` contains `expected`; returns the full text
    pub async fn wait_text_contains(&self, locator: &Locator, expected: &str, timeout: Duration) -> E2eResult<String> {
        let what = format!("'{}' in {}", expected, locator);
        self.wait_until(&what, timeout, || async move {
            match self.visible_element(locator).await? {
                Some(element) => {
                    let text = self.driver.element_text(&element).await?;
                    Ok(text.contains(expected).then_some(text))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Wait for `locator` to be visible, then send `text` to it
    pub async fn type_text(&self, locator: &Locator, text: &str, timeout: Duration) -> E2eResult<()> {
        let element = self.wait_visibility(locator, timeout).await?;
        debug!("Typing {} chars into {}", text.chars().count(), locator);
        self.driver.send_keys(&element, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FakeDriver;

    fn helper(driver: Arc<FakeDriver>) -> DriverHelper {
        DriverHelper::new(driver, &Timeouts::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_visibility_times_out_at_bound() {
        let driver = Arc::new(FakeDriver::new());
        let helper = helper(driver);
        let start = Instant::now();

        let err = helper
            .wait_visibility(&Locator::css(".never"), Duration::from_secs(10))
            .await
            .unwrap_err();

        let elapsed = start.elapsed();
        assert!(matches!(err, E2eError::Timeout { timeout_ms: 10_000, .. }));
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_visibility_picks_up_late_element() {
        let driver = Arc::new(FakeDriver::new());
        let locator = Locator::css(".late");
        driver.show_after(locator.clone(), "", Duration::from_secs(3));
        let helper = helper(driver);

        helper.wait_visibility(&locator, Duration::from_secs(10)).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_reports_missing_element() {
        let helper = helper(Arc::new(FakeDriver::new()));
        let err = helper.find(&Locator::css(".missing")).await.unwrap_err();
        assert!(matches!(err, E2eError::ElementNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_aborts_wait() {
        let driver = Arc::new(FakeDriver::new());
        driver.close().await.unwrap();
        let helper = helper(driver);
        let start = Instant::now();

        let err = helper
            .wait_visibility(&Locator::css(".x"), Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(matches!(err, E2eError::Driver(_)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_text_contains() {
        let driver = Arc::new(FakeDriver::new());
        let locator = Locator::css(".output");
        driver.show(locator.clone(), "Restoring packages...");
        let helper = helper(driver.clone());

        let waiter = helper.wait_text_contains(&locator, "Build succeeded", Duration::from_secs(30));
        let update = async {
            sleep(Duration::from_secs(2)).await;
            driver.set_text(&locator, "Restoring packages...\nBuild succeeded.");
        };
        let (text, _) = tokio::join!(waiter, update);
        assert!(text.unwrap().ends_with("Build succeeded."));
    }
}
