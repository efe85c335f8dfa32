//! IDE shell: loader, panels and status bar

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::Locator;

pub struct Ide {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl Ide {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn preloader_locator() -> Locator {
        Locator::css(".theia-preload")
    }

    pub fn top_panel_locator() -> Locator {
        Locator::id("theia-top-panel")
    }

    pub fn status_bar_locator() -> Locator {
        Locator::id("theia-statusBar")
    }

    pub async fn wait_preloader_absent(&self, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::preloader_locator(), timeout)
            .await
    }

    /// Wait until the workspace has started and the IDE shell is usable
    pub async fn wait_workspace_and_ide(&self) -> E2eResult<()> {
        info!("Waiting for workspace start and IDE load");
        self.driver_helper
            .wait_visibility(&Self::top_panel_locator(), self.config.timeouts.start_workspace())
            .await?;
        self.wait_ide().await
    }

    pub async fn wait_ide(&self) -> E2eResult<()> {
        debug!("Ide::wait_ide");
        let timeout = self.config.timeouts.load_page();
        self.wait_preloader_absent(timeout).await?;
        self.driver_helper
            .wait_visibility(&Self::status_bar_locator(), timeout)
            .await?;
        Ok(())
    }
}
