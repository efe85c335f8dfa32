//! In-memory driver
//!
//! Models the page as a list of elements keyed by the exact [`Locator`] page
//! objects use to find them. Tests seed elements, schedule late appearances and
//! attach click effects, then inspect the recorded [`DriverAction`] log.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use super::{Driver, ElementRef};
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

/// One recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverAction {
    Navigate(String),
    Click(Locator),
    SendKeys(Locator, String),
    ExecuteScript(String),
    Screenshot,
    Close,
}

/// What a click on a given locator changes on the page
#[derive(Debug, Clone)]
pub enum ClickEffect {
    Show(Locator, String),
    Hide(Locator),
    Navigate(String),
}

#[derive(Debug)]
struct FakeElement {
    id: String,
    locator: Locator,
    text: String,
    visible_from: Instant,
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    elements: Vec<FakeElement>,
    click_effects: Vec<(Locator, ClickEffect)>,
    actions: Vec<DriverAction>,
    next_id: u64,
    closed: bool,
}

impl PageState {
    fn insert(&mut self, locator: Locator, text: String, visible_from: Instant) {
        self.next_id += 1;
        self.elements.push(FakeElement {
            id: format!("fake-{}", self.next_id),
            locator,
            text,
            visible_from,
        });
    }

    fn element(&self, element: &ElementRef) -> E2eResult<&FakeElement> {
        self.elements
            .iter()
            .find(|e| e.id == element.0)
            .ok_or_else(|| E2eError::StaleElement(element.0.clone()))
    }

    fn ensure_open(&self) -> E2eResult<()> {
        if self.closed {
            Err(E2eError::Driver("session is closed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeDriver {
    state: Mutex<PageState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible element now
    pub fn show(&self, locator: Locator, text: impl Into<String>) {
        let now = Instant::now();
        self.state.lock().insert(locator, text.into(), now);
    }

    /// Add an element that becomes visible after `delay`
    pub fn show_after(&self, locator: Locator, text: impl Into<String>, delay: Duration) {
        let at = Instant::now() + delay;
        self.state.lock().insert(locator, text.into(), at);
    }

    /// Remove every element matching `locator`
    pub fn hide(&self, locator: &Locator) {
        self.state.lock().elements.retain(|e| &e.locator != locator);
    }

    pub fn set_text(&self, locator: &Locator, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.state.lock();
        for element in state.elements.iter_mut().filter(|e| &e.locator == locator) {
            element.text = text.clone();
        }
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.state.lock().url = url.into();
    }

    /// Apply `effect` every time an element matching `target` is clicked
    pub fn on_click(&self, target: Locator, effect: ClickEffect) {
        self.state.lock().click_effects.push((target, effect));
    }

    pub fn actions(&self) -> Vec<DriverAction> {
        self.state.lock().actions.clone()
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                DriverAction::Click(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    /// Concatenation of everything typed into elements matching `locator`
    pub fn typed_text(&self, locator: &Locator) -> String {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                DriverAction::SendKeys(l, text) if &l == locator => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.url = url.to_string();
        state.actions.push(DriverAction::Navigate(url.to_string()));
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.url.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let state = self.state.lock();
        state.ensure_open()?;
        let now = Instant::now();
        Ok(state
            .elements
            .iter()
            .filter(|e| &e.locator == locator && e.visible_from <= now)
            .map(|e| ElementRef(e.id.clone()))
            .collect())
    }

    async fn click(&self, element: &ElementRef) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        let locator = state.element(element)?.locator.clone();
        state.actions.push(DriverAction::Click(locator.clone()));

        let effects: Vec<ClickEffect> = state
            .click_effects
            .iter()
            .filter(|(target, _)| target == &locator)
            .map(|(_, effect)| effect.clone())
            .collect();
        let now = Instant::now();
        for effect in effects {
            match effect {
                ClickEffect::Show(l, text) => state.insert(l, text, now),
                ClickEffect::Hide(l) => state.elements.retain(|e| e.locator != l),
                ClickEffect::Navigate(url) => state.url = url,
            }
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        let locator = state.element(element)?.locator.clone();
        state.actions.push(DriverAction::SendKeys(locator, text.to_string()));
        Ok(())
    }

    async fn element_text(&self, element: &ElementRef) -> E2eResult<String> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.element(element)?.text.clone())
    }

    async fn is_displayed(&self, element: &ElementRef) -> E2eResult<bool> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.element(element)?.visible_from <= Instant::now())
    }

    async fn execute_script(&self, script: &str, _args: Vec<Value>) -> E2eResult<Value> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.actions.push(DriverAction::ExecuteScript(script.to_string()));
        Ok(Value::Null)
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.actions.push(DriverAction::Screenshot);
        // PNG signature only
        Ok(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
    }

    async fn close(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            state.actions.push(DriverAction::Close);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delayed_element_appears() {
        let driver = FakeDriver::new();
        let locator = Locator::css(".late");
        driver.show_after(locator.clone(), "hi", Duration::from_secs(5));

        assert!(driver.find_elements(&locator).await.unwrap().is_empty());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(driver.find_elements(&locator).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_click_effects_and_log() {
        let driver = FakeDriver::new();
        let button = Locator::css("button");
        let dialog = Locator::css(".dialog");
        driver.show(button.clone(), "Open");
        driver.on_click(button.clone(), ClickEffect::Show(dialog.clone(), "Hello".into()));

        let el = driver.find_elements(&button).await.unwrap().remove(0);
        driver.click(&el).await.unwrap();

        let found = driver.find_elements(&dialog).await.unwrap();
        assert_eq!(driver.element_text(&found[0]).await.unwrap(), "Hello");
        assert_eq!(driver.clicks(), vec![button]);
    }

    #[tokio::test]
    async fn test_closed_session_rejects_calls() {
        let driver = FakeDriver::new();
        driver.close().await.unwrap();
        driver.close().await.unwrap();
        assert!(driver.is_closed());
        assert!(matches!(driver.navigate("http://x").await, Err(E2eError::Driver(_))));
        assert_eq!(driver.actions(), vec![DriverAction::Close]);
    }
}
