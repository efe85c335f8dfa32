//! IDE notification toasts

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

pub struct Notification {
    driver_helper: Arc<DriverHelper>,
}

impl Notification {
    pub fn new(driver_helper: Arc<DriverHelper>) -> Self {
        Self { driver_helper }
    }

    /// A notification whose message contains `text`
    pub fn message_locator(text: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@class='theia-notification-message']//span[contains(., {})]",
            xpath_literal(text)
        ))
    }

    /// Action button of the notification containing `text`
    pub fn button_locator(text: &str, button: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@class='theia-notification-list-item' and .//span[contains(., {})]]//button[text()={}]",
            xpath_literal(text),
            xpath_literal(button)
        ))
    }

    pub async fn wait_notification(&self, text: &str, timeout: Duration) -> E2eResult<()> {
        debug!("Notification::wait_notification '{}'", text);
        self.driver_helper
            .wait_visibility(&Self::message_locator(text), timeout)
            .await?;
        Ok(())
    }

    pub async fn is_notification_present(&self, text: &str) -> E2eResult<bool> {
        self.driver_helper.is_visible(&Self::message_locator(text)).await
    }

    pub async fn wait_notification_disappearance(&self, text: &str, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::message_locator(text), timeout)
            .await
    }

    /// Click `button` on the notification containing `text` and wait for it to go away
    pub async fn click_button(&self, text: &str, button: &str, timeout: Duration) -> E2eResult<()> {
        debug!("Notification::click_button '{}' on '{}'", button, text);
        self.driver_helper
            .wait_and_click(&Self::button_locator(text, button), timeout)
            .await?;
        self.wait_notification_disappearance(text, timeout).await
    }
}
