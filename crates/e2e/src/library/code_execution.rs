//! Running workspace tasks and checking their outcome

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::E2eConfig;
use crate::error::E2eResult;
use crate::pageobjects::{DialogWindow, Notification, QuickOpenContainer, Terminal, TopMenu};
use crate::scenario::TestCase;

/// Notification shown when a task finishes successfully
pub const TASK_EXIT_SUCCESS: &str = "has exited with code 0.";

pub struct CodeExecution {
    top_menu: Arc<TopMenu>,
    quick_open: Arc<QuickOpenContainer>,
    terminal: Arc<Terminal>,
    notification: Arc<Notification>,
    dialog_window: Arc<DialogWindow>,
    config: Arc<E2eConfig>,
}

impl CodeExecution {
    pub fn new(
        top_menu: Arc<TopMenu>,
        quick_open: Arc<QuickOpenContainer>,
        terminal: Arc<Terminal>,
        notification: Arc<Notification>,
        dialog_window: Arc<DialogWindow>,
        config: Arc<E2eConfig>,
    ) -> Self {
        Self {
            top_menu,
            quick_open,
            terminal,
            notification,
            dialog_window,
            config,
        }
    }

    /// Pick `task` from Terminal > Run Task...
    pub async fn start_task(&self, task: &str) -> E2eResult<()> {
        info!("Starting task '{}'", task);
        self.top_menu.select_option("Terminal", "Run Task...").await?;
        self.quick_open.click_on_container_item(task).await
    }

    /// Run `task` and wait for its successful-exit notification
    pub async fn run_task(&self, task: &str, timeout: Duration) -> E2eResult<()> {
        self.run_task_with_notification(task, TASK_EXIT_SUCCESS, timeout).await
    }

    pub async fn run_task_with_notification(&self, task: &str, expected: &str, timeout: Duration) -> E2eResult<()> {
        self.start_task(task).await?;
        self.notification.wait_notification(expected, timeout).await
    }

    /// Run `task` and wait until its terminal prints `expected`
    pub async fn run_task_expecting(&self, task: &str, expected: &str, timeout: Duration) -> E2eResult<()> {
        self.start_task(task).await?;
        self.terminal
            .wait_tab(task, self.config.timeouts.default_wait())
            .await?;
        self.terminal.wait_text(task, expected, timeout).await?;
        Ok(())
    }

    /// Run `task`, wait for the dialog announcing `expected` and follow its link
    pub async fn run_task_with_dialog_shell_and_open_link(
        &self,
        task: &str,
        expected: &str,
        timeout: Duration,
    ) -> E2eResult<()> {
        self.start_task(task).await?;
        self.dialog_window.wait_dialog_and_open_link(expected, timeout).await
    }

    pub async fn close_terminal(&self, task: &str) -> E2eResult<()> {
        self.terminal.close_tab(task).await
    }
}

pub fn run_task(task: &str, timeout: Duration) -> TestCase {
    let task = task.to_string();
    TestCase::new(format!("Run task '{}'", task), move |ctx| {
        let task = task.clone();
        async move {
            let helper = ctx.get::<CodeExecution>()?;
            helper.run_task(&task, timeout).await
        }
    })
}

pub fn run_task_expecting(task: &str, expected: &str, timeout: Duration) -> TestCase {
    let task = task.to_string();
    let expected = expected.to_string();
    TestCase::new(format!("Run task '{}' expecting '{}'", task, expected), move |ctx| {
        let task = task.clone();
        let expected = expected.clone();
        async move {
            let helper = ctx.get::<CodeExecution>()?;
            helper.run_task_expecting(&task, &expected, timeout).await
        }
    })
}

pub fn run_task_with_dialog_shell_and_open_link(task: &str, expected: &str, timeout: Duration) -> TestCase {
    let task = task.to_string();
    let expected = expected.to_string();
    TestCase::new(format!("Run task '{}' and open link", task), move |ctx| {
        let task = task.clone();
        let expected = expected.clone();
        async move {
            let helper = ctx.get::<CodeExecution>()?;
            helper
                .run_task_with_dialog_shell_and_open_link(&task, &expected, timeout)
                .await
        }
    })
}

pub fn close_terminal(task: &str) -> TestCase {
    let task = task.to_string();
    TestCase::new(format!("Close the '{}' terminal", task), move |ctx| {
        let task = task.clone();
        async move {
            let helper = ctx.get::<CodeExecution>()?;
            helper.close_terminal(&task).await
        }
    })
}
