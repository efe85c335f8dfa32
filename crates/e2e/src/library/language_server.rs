//! Language-server checks run against an open editor tab

use std::sync::Arc;
use tracing::info;

use crate::config::E2eConfig;
use crate::error::E2eResult;
use crate::keys;
use crate::pageobjects::Editor;
use crate::scenario::TestCase;

pub struct LanguageServer {
    editor: Arc<Editor>,
    config: Arc<E2eConfig>,
}

impl LanguageServer {
    pub fn new(editor: Arc<Editor>, config: Arc<E2eConfig>) -> Self {
        Self { editor, config }
    }

    /// Completion at `line:column` offers `suggestion`; the widget is closed afterwards
    pub async fn suggestion_invoking(&self, tab: &str, line: u32, column: u32, suggestion: &str) -> E2eResult<()> {
        info!("Checking suggestion '{}' at {}:{}", suggestion, line, column);
        let timeout = self.config.timeouts.language_server();
        self.editor.move_cursor_to_line_and_char(tab, line, column).await?;
        self.editor.press_control_space(tab).await?;
        self.editor.wait_suggestion_container(timeout).await?;
        self.editor.wait_suggestion(tab, suggestion, timeout).await?;
        self.editor.press_escape(tab).await?;
        self.editor.wait_suggestion_container_closed().await
    }

    /// Typing `text` at the start of `line` is flagged as an error, and deleting it clears the flag
    pub async fn error_highlighting(&self, tab: &str, text: &str, line: u32) -> E2eResult<()> {
        info!("Checking error highlighting in line {}", line);
        let timeout = self.config.timeouts.language_server();
        self.editor.move_cursor_to_line_and_char(tab, line, 1).await?;
        self.editor.perform_key_combination(tab, text).await?;
        self.editor.wait_error_in_line(line, timeout).await?;

        let erase = keys::repeat(keys::BACK_SPACE, text.chars().count());
        self.editor.perform_key_combination(tab, &erase).await?;
        self.editor.wait_error_in_line_disappearance(line, timeout).await
    }

    pub async fn autocomplete(&self, tab: &str, line: u32, column: u32, expected: &str) -> E2eResult<()> {
        info!("Checking autocomplete '{}' at {}:{}", expected, line, column);
        self.editor.move_cursor_to_line_and_char(tab, line, column).await?;
        self.editor.press_control_space(tab).await?;
        self.editor
            .wait_suggestion(tab, expected, self.config.timeouts.language_server())
            .await?;
        self.editor.press_escape(tab).await
    }

    /// `key_combination` at `line:column` opens `expected_tab`
    pub async fn code_navigation_go_to(
        &self,
        tab: &str,
        line: u32,
        column: u32,
        expected_tab: &str,
        key_combination: &str,
    ) -> E2eResult<()> {
        info!("Checking navigation from {}:{} to '{}'", line, column, expected_tab);
        self.editor.move_cursor_to_line_and_char(tab, line, column).await?;
        self.editor.perform_key_combination(tab, key_combination).await?;
        self.editor
            .wait_editor_available(expected_tab, self.config.timeouts.language_server())
            .await?;
        self.editor
            .wait_tab_focused(expected_tab, self.config.timeouts.default_wait())
            .await
    }
}

pub fn suggestion_invoking(tab: &str, line: u32, column: u32, suggestion: &str) -> TestCase {
    let tab = tab.to_string();
    let suggestion = suggestion.to_string();
    TestCase::new("Suggestion invoking", move |ctx| {
        let tab = tab.clone();
        let suggestion = suggestion.clone();
        async move {
            let helper = ctx.get::<LanguageServer>()?;
            helper.suggestion_invoking(&tab, line, column, &suggestion).await
        }
    })
}

pub fn error_highlighting(tab: &str, text: &str, line: u32) -> TestCase {
    let tab = tab.to_string();
    let text = text.to_string();
    TestCase::new("Error highlighting", move |ctx| {
        let tab = tab.clone();
        let text = text.clone();
        async move {
            let helper = ctx.get::<LanguageServer>()?;
            helper.error_highlighting(&tab, &text, line).await
        }
    })
}

pub fn autocomplete(tab: &str, line: u32, column: u32, expected: &str) -> TestCase {
    let tab = tab.to_string();
    let expected = expected.to_string();
    TestCase::new("Autocomplete", move |ctx| {
        let tab = tab.clone();
        let expected = expected.clone();
        async move {
            let helper = ctx.get::<LanguageServer>()?;
            helper.autocomplete(&tab, line, column, &expected).await
        }
    })
}

pub fn code_navigation_go_to(
    tab: &str,
    line: u32,
    column: u32,
    expected_tab: &str,
    key_combination: &str,
) -> TestCase {
    let tab = tab.to_string();
    let expected_tab = expected_tab.to_string();
    let key_combination = key_combination.to_string();
    TestCase::new("Codenavigation", move |ctx| {
        let tab = tab.clone();
        let expected_tab = expected_tab.clone();
        let key_combination = key_combination.clone();
        async move {
            let helper = ctx.get::<LanguageServer>()?;
            helper
                .code_navigation_go_to(&tab, line, column, &expected_tab, &key_combination)
                .await
        }
    })
}
