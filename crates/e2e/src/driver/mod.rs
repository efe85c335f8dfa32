//! Browser driver abstraction
//!
//! Page objects never talk to a browser directly; they go through [`Driver`],
//! which is implemented by the W3C WebDriver client and by the in-memory
//! [`FakeDriver`] used in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::error::E2eResult;
use crate::locator::Locator;

pub mod fake;
pub mod helper;
pub mod webdriver;

pub use fake::FakeDriver;
pub use helper::DriverHelper;
pub use webdriver::WebDriverSession;

/// Opaque reference to an element of the current page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

/// Primitive browser operations
#[async_trait]
pub trait Driver: Send + Sync {
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    /// All elements currently matching `locator`; empty when nothing matches
    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>>;

    async fn click(&self, element: &ElementRef) -> E2eResult<()>;

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()>;

    async fn element_text(&self, element: &ElementRef) -> E2eResult<String>;

    async fn is_displayed(&self, element: &ElementRef) -> E2eResult<bool>;

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> E2eResult<Value>;

    /// PNG bytes of the current viewport
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    /// Release the browser session. Calling it twice is not an error.
    async fn close(&self) -> E2eResult<()>;
}

/// Opens one browser session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> E2eResult<Arc<dyn Driver>>;
}
