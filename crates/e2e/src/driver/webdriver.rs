//! W3C WebDriver client (chromedriver, geckodriver, selenium)

use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Driver, ElementRef, SessionFactory};
use crate::config::{BrowserConfig, E2eConfig};
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

/// Key under which WebDriver serialises element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// A live browser session on a WebDriver endpoint
pub struct WebDriverSession {
    client: reqwest::Client,
    session_url: String,
    page_load: Duration,
    closed: AtomicBool,
}

impl WebDriverSession {
    /// Create a new browser session
    pub async fn start(config: &E2eConfig) -> E2eResult<Self> {
        let endpoint = config.webdriver_url.trim_end_matches('/').to_string();
        let page_load = config.timeouts.load_page();

        let client = reqwest::Client::builder()
            .timeout(page_load + Duration::from_secs(30))
            .build()?;

        info!("Opening {} session on {}", config.browser.name, endpoint);

        let body = json!({
            "capabilities": {
                "alwaysMatch": capabilities(&config.browser, page_load),
            }
        });
        let response = client
            .post(format!("{}/session", endpoint))
            .json(&body)
            .send()
            .await?;
        let value = decode(response).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| E2eError::Driver(format!("no sessionId in new session response: {}", value)))?;

        debug!("WebDriver session {} created", session_id);

        Ok(Self {
            client,
            session_url: format!("{}/session/{}", endpoint, session_id),
            page_load,
            closed: AtomicBool::new(false),
        })
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> E2eResult<Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(E2eError::Driver("session is closed".to_string()));
        }

        let url = if path.is_empty() {
            self.session_url.clone()
        } else {
            format!("{}/{}", self.session_url, path)
        };
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        decode(response).await.map_err(|e| match e {
            E2eError::Timeout { what, .. } => E2eError::timeout(what, self.page_load),
            other => other,
        })
    }

    fn element_path(element: &ElementRef, suffix: &str) -> String {
        format!("element/{}/{}", element.0, suffix)
    }
}

fn capabilities(browser: &BrowserConfig, page_load: Duration) -> Value {
    let window = format!("--window-size={},{}", browser.window_width, browser.window_height);
    let mut caps = json!({
        "browserName": browser.name,
        "timeouts": { "pageLoad": page_load.as_millis() as u64, "implicit": 0 },
    });

    match browser.name.as_str() {
        "firefox" => {
            let mut args = vec![
                format!("--width={}", browser.window_width),
                format!("--height={}", browser.window_height),
            ];
            if browser.headless {
                args.push("-headless".to_string());
            }
            caps["moz:firefoxOptions"] = json!({ "args": args });
        }
        _ => {
            let mut args = vec![window, "--disable-web-security".to_string(), "--no-sandbox".to_string()];
            if browser.headless {
                args.push("--headless".to_string());
            }
            caps["goog:chromeOptions"] = json!({ "args": args });
        }
    }
    caps
}

/// Unwrap the `value` envelope, mapping W3C error codes onto [`E2eError`]
async fn decode(response: reqwest::Response) -> E2eResult<Value> {
    let status = response.status();
    let wire: WireResponse = response.json().await?;

    if status.is_success() {
        return Ok(wire.value);
    }

    match serde_json::from_value::<WireError>(wire.value.clone()) {
        Ok(err) => Err(map_wire_error(&err.error, err.message)),
        Err(_) => Err(E2eError::Driver(format!("HTTP {}: {}", status, wire.value))),
    }
}

fn map_wire_error(code: &str, message: String) -> E2eError {
    match code {
        "no such element" => E2eError::ElementNotFound(message),
        "stale element reference" => E2eError::StaleElement(message),
        "timeout" | "script timeout" => E2eError::Timeout { what: message, timeout_ms: 0 },
        _ => E2eError::Driver(format!("{}: {}", code, message)),
    }
}

fn element_ref(value: &Value) -> E2eResult<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| E2eError::Driver(format!("not an element reference: {}", value)))
}

#[async_trait]
impl Driver for WebDriverSession {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        self.command(Method::POST, "url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let value = self.command(Method::GET, "url", None).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| E2eError::Driver(format!("unexpected url response: {}", value)))
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementRef>> {
        let body = json!({ "using": locator.strategy().as_str(), "value": locator.value() });
        let value = self.command(Method::POST, "elements", Some(body)).await?;
        match value.as_array() {
            Some(items) => items.iter().map(element_ref).collect(),
            None => Err(E2eError::Driver(format!("unexpected elements response: {}", value))),
        }
    }

    async fn click(&self, element: &ElementRef) -> E2eResult<()> {
        let path = Self::element_path(element, "click");
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> E2eResult<()> {
        let path = Self::element_path(element, "value");
        self.command(Method::POST, &path, Some(json!({ "text": text }))).await?;
        Ok(())
    }

    async fn element_text(&self, element: &ElementRef) -> E2eResult<String> {
        let path = Self::element_path(element, "text");
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_displayed(&self, element: &ElementRef) -> E2eResult<bool> {
        let path = Self::element_path(element, "displayed");
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> E2eResult<Value> {
        let body = json!({ "script": script, "args": args });
        self.command(Method::POST, "execute/sync", Some(body)).await
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let value = self.command(Method::GET, "screenshot", None).await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| E2eError::Driver("screenshot response is not a string".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| E2eError::Driver(format!("invalid screenshot encoding: {}", e)))
    }

    async fn close(&self) -> E2eResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Closing WebDriver session");
        let response = self.client.delete(&self.session_url).send().await?;
        if let Err(e) = decode(response).await {
            warn!("Session delete returned an error: {}", e);
        }
        Ok(())
    }
}

/// Opens a fresh WebDriver session for every scenario
pub struct WebDriverSessions {
    config: Arc<E2eConfig>,
}

impl WebDriverSessions {
    pub fn new(config: Arc<E2eConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for WebDriverSessions {
    async fn open(&self) -> E2eResult<Arc<dyn Driver>> {
        let session = WebDriverSession::start(&self.config).await?;
        Ok(Arc::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_wire_error() {
        assert!(matches!(
            map_wire_error("no such element", "css=.x".into()),
            E2eError::ElementNotFound(_)
        ));
        assert!(matches!(
            map_wire_error("stale element reference", String::new()),
            E2eError::StaleElement(_)
        ));
        assert!(matches!(
            map_wire_error("invalid session id", String::new()),
            E2eError::Driver(_)
        ));
    }

    #[test]
    fn test_element_ref_parsing() {
        let value = json!({ ELEMENT_KEY: "abc-123" });
        assert_eq!(element_ref(&value).unwrap(), ElementRef("abc-123".into()));
        assert!(element_ref(&json!({ "ELEMENT": "x" })).is_err());
    }

    #[test]
    fn test_headless_chrome_capabilities() {
        let browser = BrowserConfig::default();
        let caps = capabilities(&browser, Duration::from_secs(120));
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless"));
        assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
        assert_eq!(caps["timeouts"]["pageLoad"], 120_000);
    }

    #[test]
    fn test_firefox_capabilities() {
        let browser = BrowserConfig {
            name: "firefox".to_string(),
            headless: false,
            ..Default::default()
        };
        let caps = capabilities(&browser, Duration::from_secs(1));
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "-headless"));
        assert!(caps.get("goog:chromeOptions").is_none());
    }
}
