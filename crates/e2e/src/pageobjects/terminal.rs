//! Terminal panel at the bottom of the IDE

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct Terminal {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl Terminal {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn tab_locator(title: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id='theia-bottom-content-panel']//li[contains(@title, {})]",
            xpath_literal(title)
        ))
    }

    pub fn close_icon_locator(title: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id='theia-bottom-content-panel']//li[contains(@title, {})]//div[contains(@class, 'p-TabBar-tabCloseIcon')]",
            xpath_literal(title)
        ))
    }

    /// Rendered rows of the terminal currently shown in the panel
    pub fn output_locator() -> Locator {
        Locator::xpath(
            "//div[@id='theia-bottom-content-panel']//div[contains(@class, 'terminal-container') and not(contains(@class, 'p-mod-hidden'))]//div[contains(@class, 'xterm-rows')]",
        )
    }

    pub async fn wait_tab(&self, title: &str, timeout: Duration) -> E2eResult<()> {
        debug!("Terminal::wait_tab '{}'", title);
        self.driver_helper.wait_visibility(&Self::tab_locator(title), timeout).await?;
        Ok(())
    }

    pub async fn select_tab(&self, title: &str) -> E2eResult<()> {
        self.driver_helper
            .wait_and_click(&Self::tab_locator(title), self.config.timeouts.default_wait())
            .await
    }

    pub async fn close_tab(&self, title: &str) -> E2eResult<()> {
        debug!("Terminal::close_tab '{}'", title);
        let timeout = self.config.timeouts.default_wait();
        self.driver_helper
            .wait_and_click(&Self::close_icon_locator(title), timeout)
            .await?;
        self.driver_helper.wait_disappearance(&Self::tab_locator(title), timeout).await
    }

    /// Select the terminal `title` and wait until its output contains `expected`
    pub async fn wait_text(&self, title: &str, expected: &str, timeout: Duration) -> E2eResult<String> {
        debug!("Terminal::wait_text '{}' in '{}'", expected, title);
        self.select_tab(title).await?;
        self.driver_helper
            .wait_text_contains(&Self::output_locator(), expected, timeout)
            .await
    }
}
