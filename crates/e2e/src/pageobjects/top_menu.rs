use std::sync::Arc;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct TopMenu {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl TopMenu {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn menu_locator(menu: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id='theia:menubar']//div[contains(@class, 'p-MenuBar-itemLabel') and text()={}]",
            xpath_literal(menu)
        ))
    }

    pub fn item_locator(item: &str) -> Locator {
        Locator::xpath(format!(
            "//ul[contains(@class, 'p-Menu-content')]//li[@data-type='command']//div[text()={}]",
            xpath_literal(item)
        ))
    }

    pub async fn wait_menu_bar(&self) -> E2eResult<()> {
        self.driver_helper
            .wait_visibility(&Locator::id("theia:menubar"), self.config.timeouts.load_page())
            .await?;
        Ok(())
    }

    /// Open `menu` and pick `item` from it
    pub async fn select_option(&self, menu: &str, item: &str) -> E2eResult<()> {
        debug!("TopMenu::select_option {} > {}", menu, item);
        let timeout = self.config.timeouts.default_wait();
        self.driver_helper.wait_and_click(&Self::menu_locator(menu), timeout).await?;
        self.driver_helper.wait_and_click(&Self::item_locator(item), timeout).await
    }
}
