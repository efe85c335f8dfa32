//! User dashboard: get-started samples and the workspaces list

use std::sync::Arc;
use tracing::info;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct Dashboard {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl Dashboard {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn get_started_locator() -> Locator {
        Locator::id("get-started-page")
    }

    pub fn workspaces_list_locator() -> Locator {
        Locator::id("workspaces-list")
    }

    pub fn sample_locator(stack: &str) -> Locator {
        Locator::xpath(format!(
            "//div[contains(@class, 'sample-card') and .//span[text()={}]]",
            xpath_literal(stack)
        ))
    }

    pub fn workspace_row_locator(name: &str) -> Locator {
        Locator::xpath(format!("//div[@id={}]", xpath_literal(&format!("ws-full-name-{}", name))))
    }

    pub fn stop_button_locator(name: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id={}]//span[@uib-tooltip='Stop workspace']",
            xpath_literal(&format!("ws-full-name-{}", name))
        ))
    }

    pub fn status_locator(name: &str, status: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id={}]//span[@name='workspace-status' and text()={}]",
            xpath_literal(&format!("ws-full-name-{}", name)),
            xpath_literal(status)
        ))
    }

    pub fn checkbox_locator(name: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id={}]//md-checkbox",
            xpath_literal(&format!("ws-full-name-{}", name))
        ))
    }

    pub fn delete_button_locator() -> Locator {
        Locator::id("delete-item-button")
    }

    pub fn confirm_button_locator() -> Locator {
        Locator::id("ok-dialog-button")
    }

    async fn open(&self, route: &str, marker: &Locator) -> E2eResult<()> {
        let url = format!("{}#/{}", self.config.dashboard_url(), route);
        self.driver_helper.navigate(&url).await?;
        self.driver_helper
            .wait_visibility(marker, self.config.timeouts.load_page())
            .await?;
        Ok(())
    }

    pub async fn open_get_started(&self) -> E2eResult<()> {
        self.open("getstarted", &Self::get_started_locator()).await
    }

    pub async fn open_workspaces(&self) -> E2eResult<()> {
        self.open("workspaces", &Self::workspaces_list_locator()).await
    }

    /// Create a workspace from the get-started sample for `stack`
    pub async fn start_workspace_from_stack(&self, stack: &str) -> E2eResult<()> {
        info!("Creating workspace from '{}' sample", stack);
        self.open_get_started().await?;
        self.driver_helper
            .wait_and_click(&Self::sample_locator(stack), self.config.timeouts.default_wait())
            .await
    }

    pub async fn stop_workspace_by_ui(&self, name: &str) -> E2eResult<()> {
        info!("Stopping workspace '{}'", name);
        self.open_workspaces().await?;
        let timeout = self.config.timeouts.default_wait();
        self.driver_helper
            .wait_visibility(&Self::workspace_row_locator(name), timeout)
            .await?;
        self.driver_helper
            .wait_and_click(&Self::stop_button_locator(name), timeout)
            .await?;
        self.driver_helper
            .wait_visibility(&Self::status_locator(name, "STOPPED"), self.config.timeouts.start_workspace())
            .await?;
        Ok(())
    }

    pub async fn delete_workspace_by_ui(&self, name: &str) -> E2eResult<()> {
        info!("Deleting workspace '{}'", name);
        self.open_workspaces().await?;
        let timeout = self.config.timeouts.default_wait();
        self.driver_helper
            .wait_and_click(&Self::checkbox_locator(name), timeout)
            .await?;
        self.driver_helper
            .wait_and_click(&Self::delete_button_locator(), timeout)
            .await?;
        self.driver_helper
            .wait_and_click(&Self::confirm_button_locator(), timeout)
            .await?;
        self.driver_helper
            .wait_disappearance(&Self::workspace_row_locator(name), self.config.timeouts.load_page())
            .await
    }
}
