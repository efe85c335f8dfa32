//! Runner configuration
//!
//! Values come from (lowest to highest precedence) built-in defaults, an optional
//! TOML file, `CHE_E2E_*` environment variables and finally CLI flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

/// Top-level E2E configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// URL of the Che server under test
    pub base_url: String,

    /// URL of the WebDriver endpoint (chromedriver, selenium)
    pub webdriver_url: String,

    /// Browser session configuration
    pub browser: BrowserConfig,

    /// Timeouts used by page objects and the runner
    pub timeouts: Timeouts,

    /// Runner behaviour
    pub runner: RunnerSettings,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: "http://che-eclipse-che.192.168.99.100.nip.io".to_string(),
            webdriver_url: "http://127.0.0.1:9515".to_string(),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default(),
            runner: RunnerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub name: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            name: "chrome".to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

/// All timeouts are in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Bound for ordinary element waits
    pub default_ms: u64,

    /// Interval between polls of a wait condition
    pub polling_ms: u64,

    pub load_page_ms: u64,

    pub start_workspace_ms: u64,

    /// Time the language server may take before suggestions appear
    pub language_server_ms: u64,

    pub task_ms: u64,

    /// Bound for one whole test case
    pub test_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: 20_000,
            polling_ms: 500,
            load_page_ms: 120_000,
            start_workspace_ms: 240_000,
            language_server_ms: 180_000,
            task_ms: 240_000,
            test_ms: 1_200_000,
        }
    }
}

impl Timeouts {
    pub fn default_wait(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    pub fn polling(&self) -> Duration {
        Duration::from_millis(self.polling_ms)
    }

    pub fn load_page(&self) -> Duration {
        Duration::from_millis(self.load_page_ms)
    }

    pub fn start_workspace(&self) -> Duration {
        Duration::from_millis(self.start_workspace_ms)
    }

    pub fn language_server(&self) -> Duration {
        Duration::from_millis(self.language_server_ms)
    }

    pub fn task(&self) -> Duration {
        Duration::from_millis(self.task_ms)
    }

    pub fn test(&self) -> Duration {
        Duration::from_millis(self.test_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Output directory for results and screenshots
    pub output_dir: PathBuf,

    /// Stop a suite after its first failing test
    pub bail: bool,

    /// Capture a browser screenshot when a test fails
    pub screenshot_on_failure: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test-results"),
            bail: false,
            screenshot_on_failure: true,
        }
    }
}

impl E2eConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `CHE_E2E_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHE_E2E_BASE_URL") {
            self.base_url = url;
        }
        if let Some(url) = lookup("CHE_E2E_WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Some(value) = lookup("CHE_E2E_HEADLESS") {
            self.browser.headless = parse_env("CHE_E2E_HEADLESS", &value)?;
        }
        if let Some(value) = lookup("CHE_E2E_DEFAULT_TIMEOUT_MS") {
            self.timeouts.default_ms = parse_env("CHE_E2E_DEFAULT_TIMEOUT_MS", &value)?;
        }
        if let Some(dir) = lookup("CHE_E2E_OUTPUT_DIR") {
            self.runner.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard/", self.base_url())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> E2eResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| E2eError::Config(format!("invalid value for {}: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = E2eConfig::from_toml(
            r#"
base_url = "https://che.example.com/"

[timeouts]
polling_ms = 250

[runner]
bail = true
"#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://che.example.com");
        assert_eq!(config.timeouts.polling_ms, 250);
        assert_eq!(config.timeouts.default_ms, 20_000);
        assert!(config.runner.bail);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CHE_E2E_BASE_URL", "https://other.example.com"),
            ("CHE_E2E_HEADLESS", "false"),
            ("CHE_E2E_DEFAULT_TIMEOUT_MS", "5000"),
        ]
        .into_iter()
        .collect();

        let mut config = E2eConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "https://other.example.com");
        assert!(!config.browser.headless);
        assert_eq!(config.timeouts.default_wait(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_env_value_is_rejected() {
        let mut config = E2eConfig::default();
        let err = config
            .apply_env(|key| (key == "CHE_E2E_HEADLESS").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, E2eError::Config(_)));
    }

    #[test]
    fn test_dashboard_url() {
        let config = E2eConfig {
            base_url: "https://che.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.dashboard_url(), "https://che.example.com/dashboard/");
    }
}
