//! Che E2E Test Framework
//!
//! This crate drives the Eclipse Che cloud IDE through a browser to check
//! whole user journeys:
//! - Talks to a W3C WebDriver endpoint (chromedriver, geckodriver, selenium)
//! - Wraps each IDE surface in a page object built on a polling driver helper
//! - Composes page objects into reusable library helpers
//! - Runs scenarios as explicit suites of tests and records the results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (che-e2e)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioRunner                                             │
//! │    ├── SessionFactory::open() -> Arc<dyn Driver>            │
//! │    ├── wiring::e2e_container(driver, config) -> Container   │
//! │    ├── run_scenario(scenario) -> ScenarioResult             │
//! │    └── screenshooter::capture() on failure                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                   │
//! │    └── suites: [Suite]                                      │
//! │          ├── setup: Option<Step>                            │
//! │          ├── tests: [TestCase { steps: [Step] }]            │
//! │          └── teardown: Option<Step>                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  library::*      CodeExecution, LanguageServer, ...         │
//! │  pageobjects::*  Editor, Terminal, Dashboard, ...           │
//! │  driver          DriverHelper -> Driver (WebDriver | Fake)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod container;
pub mod driver;
pub mod error;
pub mod keys;
pub mod library;
pub mod locator;
pub mod pageobjects;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod screenshooter;
pub mod wiring;
pub mod workspace;

pub use config::E2eConfig;
pub use container::Container;
pub use driver::{Driver, DriverHelper, FakeDriver, SessionFactory, WebDriverSession};
pub use error::{E2eError, E2eResult};
pub use locator::Locator;
pub use report::{RunSummary, TestStatus};
pub use runner::ScenarioRunner;
pub use scenario::{Scenario, ScenarioContext, Suite, TestCase};
pub use workspace::WorkspaceHandle;
