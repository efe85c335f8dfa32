//! Monaco editor tabs

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::{E2eError, E2eResult};
use crate::keys;
use crate::locator::{xpath_literal, Locator};

/// Height of one editor line in pixels
const LINE_HEIGHT_PX: u32 = 19;

pub struct Editor {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl Editor {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn tab_locator(tab: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@id='theia-main-content-panel']//li[contains(@class, 'p-TabBar-tab')]//div[text()={}]",
            xpath_literal(tab)
        ))
    }

    pub fn focused_tab_locator(tab: &str) -> Locator {
        Locator::xpath(format!(
            "//li[contains(@class, 'p-mod-current') and contains(@class, 'theia-mod-active')]//div[text()={}]",
            xpath_literal(tab)
        ))
    }

    pub fn editor_locator(tab: &str) -> Locator {
        Locator::xpath(format!(
            "//div[contains(@data-uri, {})]//div[contains(@class, 'monaco-editor')]",
            xpath_literal(tab)
        ))
    }

    /// Hidden textarea receiving keyboard input for `tab`
    pub fn input_locator(tab: &str) -> Locator {
        Locator::xpath(format!("//div[contains(@data-uri, {})]//textarea", xpath_literal(tab)))
    }

    pub fn suggestion_widget_locator() -> Locator {
        Locator::css("div.monaco-editor .suggest-widget.visible")
    }

    pub fn suggestion_locator(text: &str) -> Locator {
        Locator::xpath(format!(
            "//div[@widgetid='editor.widget.suggestWidget']//span[contains(@class, 'monaco-highlighted-label') and contains(., {})]",
            xpath_literal(text)
        ))
    }

    pub fn error_in_line_locator(line: u32) -> Locator {
        let top = line.saturating_sub(1) * LINE_HEIGHT_PX;
        Locator::xpath(format!(
            "//div[contains(@style, 'top:{}px')]//div[contains(@class, 'squiggly-error')]",
            top
        ))
    }

    pub async fn wait_editor_available(&self, tab: &str, timeout: Duration) -> E2eResult<()> {
        debug!("Editor::wait_editor_available '{}'", tab);
        self.driver_helper
            .wait_visibility(&Self::editor_locator(tab), timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_tab(&self, tab: &str, timeout: Duration) -> E2eResult<()> {
        self.driver_helper.wait_visibility(&Self::tab_locator(tab), timeout).await?;
        Ok(())
    }

    pub async fn wait_tab_focused(&self, tab: &str, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_visibility(&Self::focused_tab_locator(tab), timeout)
            .await?;
        Ok(())
    }

    pub async fn select_tab(&self, tab: &str) -> E2eResult<()> {
        debug!("Editor::select_tab '{}'", tab);
        let timeout = self.config.timeouts.default_wait();
        self.driver_helper.wait_and_click(&Self::tab_locator(tab), timeout).await?;
        self.wait_tab_focused(tab, timeout).await
    }

    /// Send raw keys (text or chords) to the editor of `tab`
    pub async fn perform_key_combination(&self, tab: &str, text: &str) -> E2eResult<()> {
        self.driver_helper
            .type_text(&Self::input_locator(tab), text, self.config.timeouts.default_wait())
            .await
    }

    /// Place the cursor at 1-based `line` and `column`
    pub async fn move_cursor_to_line_and_char(&self, tab: &str, line: u32, column: u32) -> E2eResult<()> {
        if line == 0 || column == 0 {
            return Err(E2eError::UnexpectedUiState(format!(
                "editor positions are 1-based, got {}:{}",
                line, column
            )));
        }
        debug!("Editor::move_cursor_to_line_and_char '{}' {}:{}", tab, line, column);

        self.select_tab(tab).await?;
        self.perform_key_combination(tab, &keys::chord(&[keys::CONTROL, keys::HOME]))
            .await?;

        let mut moves = keys::repeat(keys::ARROW_DOWN, (line - 1) as usize);
        moves.push_str(&keys::repeat(keys::ARROW_RIGHT, (column - 1) as usize));
        if !moves.is_empty() {
            self.perform_key_combination(tab, &moves).await?;
        }
        Ok(())
    }

    pub async fn press_control_space(&self, tab: &str) -> E2eResult<()> {
        self.perform_key_combination(tab, &keys::chord(&[keys::CONTROL, keys::SPACE]))
            .await
    }

    pub async fn press_escape(&self, tab: &str) -> E2eResult<()> {
        self.perform_key_combination(tab, &keys::ESCAPE.to_string()).await
    }

    pub async fn wait_suggestion_container(&self, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_visibility(&Self::suggestion_widget_locator(), timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_suggestion_container_closed(&self) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::suggestion_widget_locator(), self.config.timeouts.default_wait())
            .await
    }

    pub async fn wait_suggestion(&self, tab: &str, suggestion: &str, timeout: Duration) -> E2eResult<()> {
        debug!("Editor::wait_suggestion '{}' in '{}'", suggestion, tab);
        self.driver_helper
            .wait_visibility(&Self::suggestion_locator(suggestion), timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_error_in_line(&self, line: u32, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_visibility(&Self::error_in_line_locator(line), timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_error_in_line_disappearance(&self, line: u32, timeout: Duration) -> E2eResult<()> {
        self.driver_helper
            .wait_disappearance(&Self::error_in_line_locator(line), timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::FakeDriver;

    fn seeded(tab: &str) -> (Arc<FakeDriver>, Editor) {
        let driver = Arc::new(FakeDriver::new());
        driver.show(Editor::tab_locator(tab), tab);
        driver.show(Editor::focused_tab_locator(tab), tab);
        driver.show(Editor::input_locator(tab), "");
        let config = Arc::new(E2eConfig::default());
        let helper = Arc::new(DriverHelper::new(driver.clone(), &config.timeouts));
        (driver, Editor::new(helper, config))
    }

    #[test]
    fn test_error_line_offset() {
        assert!(Editor::error_in_line_locator(1).value().contains("top:0px"));
        assert!(Editor::error_in_line_locator(23).value().contains("top:418px"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_cursor_sends_home_then_arrows() {
        let (driver, editor) = seeded("Program.cs");
        editor.move_cursor_to_line_and_char("Program.cs", 3, 2).await.unwrap();

        let typed = driver.typed_text(&Editor::input_locator("Program.cs"));
        let expected = format!(
            "{}{}{}{}",
            keys::chord(&[keys::CONTROL, keys::HOME]),
            keys::ARROW_DOWN,
            keys::ARROW_DOWN,
            keys::ARROW_RIGHT
        );
        assert_eq!(typed, expected);
        assert_eq!(driver.clicks(), vec![Editor::tab_locator("Program.cs")]);
    }

    #[tokio::test]
    async fn test_zero_position_is_rejected() {
        let (_driver, editor) = seeded("Program.cs");
        let err = editor.move_cursor_to_line_and_char("Program.cs", 0, 1).await.unwrap_err();
        assert!(matches!(err, E2eError::UnexpectedUiState(_)));
    }
}
