//! Quick-open palette (task picker, command palette)

use std::sync::Arc;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct QuickOpenContainer {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl QuickOpenContainer {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn container_locator() -> Locator {
        Locator::css("div.monaco-quick-open-widget")
    }

    pub fn item_locator(text: &str) -> Locator {
        Locator::xpath(format!(
            "//div[contains(@class, 'monaco-quick-open-widget')]//div[contains(@class, 'quick-open-entry')]//span[text()={}]",
            xpath_literal(text)
        ))
    }

    pub async fn wait_container(&self) -> E2eResult<()> {
        self.driver_helper
            .wait_visibility(&Self::container_locator(), self.config.timeouts.default_wait())
            .await?;
        Ok(())
    }

    pub async fn wait_container_disappearance(&self) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::container_locator(), self.config.timeouts.default_wait())
            .await
    }

    pub async fn click_on_container_item(&self, text: &str) -> E2eResult<()> {
        debug!("QuickOpenContainer::click_on_container_item '{}'", text);
        self.wait_container().await?;
        self.driver_helper
            .wait_and_click(&Self::item_locator(text), self.config.timeouts.default_wait())
            .await?;
        self.wait_container_disappearance().await
    }
}
