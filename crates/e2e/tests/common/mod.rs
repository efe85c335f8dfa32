//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use che_e2e::driver::fake::ClickEffect;
use che_e2e::error::{E2eError, E2eResult};
use che_e2e::pageobjects::{QuickOpenContainer, TopMenu};
use che_e2e::{Driver, E2eConfig, FakeDriver, ScenarioRunner, SessionFactory};

/// Hands out the same fake session every time
pub struct FakeSessions {
    pub driver: Arc<FakeDriver>,
    opened: AtomicUsize,
}

impl FakeSessions {
    pub fn new(driver: Arc<FakeDriver>) -> Arc<Self> {
        Arc::new(Self {
            driver,
            opened: AtomicUsize::new(0),
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeSessions {
    async fn open(&self) -> E2eResult<Arc<dyn Driver>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let driver: Arc<dyn Driver> = self.driver.clone();
        Ok(driver)
    }
}

/// A WebDriver endpoint that is not there
pub struct BrokenSessions;

#[async_trait]
impl SessionFactory for BrokenSessions {
    async fn open(&self) -> E2eResult<Arc<dyn Driver>> {
        Err(E2eError::Driver("connection refused".to_string()))
    }
}

pub fn config(output_dir: &Path) -> E2eConfig {
    let mut config = E2eConfig::default();
    config.base_url = "https://che.example.com".to_string();
    config.runner.output_dir = output_dir.to_path_buf();
    config
}

pub fn runner(driver: &Arc<FakeDriver>, config: E2eConfig) -> (ScenarioRunner, Arc<FakeSessions>) {
    let sessions = FakeSessions::new(driver.clone());
    let runner = ScenarioRunner::new(Arc::new(config), sessions.clone());
    (runner, sessions)
}

/// Make Terminal > Run Task... > `task` clickable; picking the task closes the palette
pub fn script_task_menu(driver: &FakeDriver, task: &str) {
    driver.show(TopMenu::menu_locator("Terminal"), "Terminal");
    driver.show(TopMenu::item_locator("Run Task..."), "Run Task...");
    driver.show(QuickOpenContainer::container_locator(), "");
    driver.show(QuickOpenContainer::item_locator(task), task);
    driver.on_click(
        QuickOpenContainer::item_locator(task),
        ClickEffect::Hide(QuickOpenContainer::container_locator()),
    );
}
