//! Modal dialogs of the IDE shell

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct DialogWindow {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl DialogWindow {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn dialog_locator() -> Locator {
        Locator::css("#theia-dialog-shell .dialogBlock")
    }

    pub fn content_locator() -> Locator {
        Locator::css("#theia-dialog-shell .dialogContent")
    }

    pub fn button_locator(text: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id='theia-dialog-shell']//button[text()={}]",
            xpath_literal(text)
        ))
    }

    pub async fn wait_dialog_with_text(&self, expected: &str, timeout: Duration) -> E2eResult<()> {
        debug!("DialogWindow::wait_dialog_with_text '{}'", expected);
        self.driver_helper
            .wait_text_contains(&Self::content_locator(), expected, timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_dialog_disappearance(&self) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::dialog_locator(), self.config.timeouts.default_wait())
            .await
    }

    pub async fn click_button(&self, text: &str) -> E2eResult<()> {
        self.driver_helper
            .wait_and_click(&Self::button_locator(text), self.config.timeouts.default_wait())
            .await
    }

    /// Wait for a dialog mentioning `expected`, follow its link and wait for it to close
    pub async fn wait_dialog_and_open_link(&self, expected: &str, timeout: Duration) -> E2eResult<()> {
        self.wait_dialog_with_text(expected, timeout).await?;
        self.click_button("Open Link").await?;
        self.wait_dialog_disappearance().await
    }
}
