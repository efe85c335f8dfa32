//! Library helpers driven through the standard wiring

mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use che_e2e::driver::fake::{ClickEffect, DriverAction};
use che_e2e::keys;
use che_e2e::library::{workspace_handling, CodeExecution, LanguageServer, WorkspaceHandling};
use che_e2e::pageobjects::{Dashboard, DialogWindow, Editor, Terminal};
use che_e2e::wiring::e2e_container;
use che_e2e::{Container, E2eConfig, E2eError, FakeDriver, Scenario, Suite, TestStatus};

use common::{config, runner, script_task_menu};

const TAB: &str = "Program.cs";

fn container(driver: &Arc<FakeDriver>) -> Container {
    let mut config = E2eConfig::default();
    config.base_url = "https://che.example.com".to_string();
    e2e_container(driver.clone(), Arc::new(config))
}

/// An open, focused editor tab
fn script_editor(driver: &FakeDriver, tab: &str) {
    driver.show(Editor::tab_locator(tab), tab);
    driver.show(Editor::focused_tab_locator(tab), tab);
    driver.show(Editor::editor_locator(tab), "");
    driver.show(Editor::input_locator(tab), "");
}

/// Dashboard workspaces list holding `name`; stopping and deleting it work
fn script_workspaces(driver: &FakeDriver, name: &str) {
    driver.show(Dashboard::workspaces_list_locator(), "");
    driver.show(Dashboard::workspace_row_locator(name), name);
    driver.show(Dashboard::stop_button_locator(name), "");
    driver.show(Dashboard::checkbox_locator(name), "");
    driver.show(Dashboard::delete_button_locator(), "Delete");
    driver.show(Dashboard::confirm_button_locator(), "Delete");
    driver.on_click(
        Dashboard::stop_button_locator(name),
        ClickEffect::Show(Dashboard::status_locator(name, "STOPPED"), "STOPPED".to_string()),
    );
    driver.on_click(
        Dashboard::confirm_button_locator(),
        ClickEffect::Hide(Dashboard::workspace_row_locator(name)),
    );
}

#[tokio::test(start_paused = true)]
async fn test_autocomplete_moves_cursor_then_invokes_completion() {
    let driver = Arc::new(FakeDriver::new());
    script_editor(&driver, TAB);
    driver.show(Editor::suggestion_locator("WriteLine"), "WriteLine");

    let helper = container(&driver).get::<LanguageServer>().unwrap();
    helper.autocomplete(TAB, 22, 27, "WriteLine").await.unwrap();

    let mut expected = keys::chord(&[keys::CONTROL, keys::HOME]);
    expected.push_str(&keys::repeat(keys::ARROW_DOWN, 21));
    expected.push_str(&keys::repeat(keys::ARROW_RIGHT, 26));
    expected.push_str(&keys::chord(&[keys::CONTROL, keys::SPACE]));
    expected.push(keys::ESCAPE);
    assert_eq!(driver.typed_text(&Editor::input_locator(TAB)), expected);
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_never_offered_times_out() {
    let driver = Arc::new(FakeDriver::new());
    script_editor(&driver, TAB);
    driver.show(Editor::suggestion_widget_locator(), "");

    let container = container(&driver);
    let bound = container.get::<E2eConfig>().unwrap().timeouts.language_server();
    let helper = container.get::<LanguageServer>().unwrap();

    let start = Instant::now();
    let err = helper.suggestion_invoking(TAB, 22, 33, "test").await.unwrap_err();

    assert!(matches!(err, E2eError::Timeout { .. }), "{}", err);
    assert!(start.elapsed() >= bound);
}

#[tokio::test(start_paused = true)]
async fn test_error_highlighting_types_and_erases() {
    let driver = Arc::new(FakeDriver::new());
    script_editor(&driver, TAB);
    driver.show_after(Editor::error_in_line_locator(23), "", Duration::from_secs(3));

    // The marker goes away once the text is deleted
    let marker_driver = driver.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(10)).await;
        marker_driver.hide(&Editor::error_in_line_locator(23));
    });

    let helper = container(&driver).get::<LanguageServer>().unwrap();
    helper.error_highlighting(TAB, "error_text;", 23).await.unwrap();

    let typed = driver.typed_text(&Editor::input_locator(TAB));
    assert!(typed.contains("error_text;"));
    assert!(typed.ends_with(&keys::repeat(keys::BACK_SPACE, "error_text;".len())));
}

#[tokio::test(start_paused = true)]
async fn test_code_navigation_opens_target_tab() {
    let driver = Arc::new(FakeDriver::new());
    script_editor(&driver, TAB);
    driver.show_after(Editor::editor_locator("Console.cs"), "", Duration::from_secs(2));
    driver.show_after(Editor::focused_tab_locator("Console.cs"), "Console.cs", Duration::from_secs(2));

    let helper = container(&driver).get::<LanguageServer>().unwrap();
    let go_to = keys::chord(&[keys::CONTROL, keys::F11]);
    helper
        .code_navigation_go_to(TAB, 22, 27, "Console.cs", &go_to)
        .await
        .unwrap();

    assert!(driver.typed_text(&Editor::input_locator(TAB)).ends_with(&go_to));
}

#[tokio::test(start_paused = true)]
async fn test_run_task_expecting_polls_terminal_output() {
    let driver = Arc::new(FakeDriver::new());
    script_task_menu(&driver, "run");
    driver.show(Terminal::tab_locator("run"), "");
    driver.show(Terminal::output_locator(), "Restoring packages...");

    let output_driver = driver.clone();
    tokio::spawn(async move {
        sleep(Duration::from_secs(8)).await;
        output_driver.set_text(
            &Terminal::output_locator(),
            "Restoring packages...\nA process is now listening on port 5000.",
        );
    });

    let helper = container(&driver).get::<CodeExecution>().unwrap();
    let start = Instant::now();
    helper
        .run_task_expecting("run", "A process is now listening on port 5000.", Duration::from_secs(30))
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_secs(8));
    assert!(driver.clicks().contains(&Terminal::tab_locator("run")));
}

#[tokio::test(start_paused = true)]
async fn test_run_task_expecting_times_out_when_output_never_matches() {
    let driver = Arc::new(FakeDriver::new());
    script_task_menu(&driver, "build");
    driver.show(Terminal::tab_locator("build"), "");
    driver.show(Terminal::output_locator(), "Restoring packages...\nerror CS1002: ; expected");

    let helper = container(&driver).get::<CodeExecution>().unwrap();
    let start = Instant::now();
    let err = helper
        .run_task_expecting("build", "Build succeeded.", Duration::from_secs(30))
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, E2eError::Timeout { timeout_ms: 30_000, .. }), "{}", err);
    assert!(elapsed >= Duration::from_secs(30), "failed early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(31), "failed late: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_run_task_with_dialog_follows_link() {
    let driver = Arc::new(FakeDriver::new());
    script_task_menu(&driver, "run");
    driver.show_after(
        DialogWindow::content_locator(),
        "Process 'run' is now listening on port 5000. A process is now listening on port 5000.",
        Duration::from_secs(5),
    );
    driver.show(DialogWindow::dialog_locator(), "");
    driver.show(DialogWindow::button_locator("Open Link"), "Open Link");
    driver.on_click(
        DialogWindow::button_locator("Open Link"),
        ClickEffect::Hide(DialogWindow::dialog_locator()),
    );

    let helper = container(&driver).get::<CodeExecution>().unwrap();
    helper
        .run_task_with_dialog_shell_and_open_link("run", "A process is now listening on port 5000.", Duration::from_secs(30))
        .await
        .unwrap();

    assert!(driver.clicks().contains(&DialogWindow::button_locator("Open Link")));
}

#[tokio::test(start_paused = true)]
async fn test_stop_and_remove_resolved_workspace() {
    let out = tempfile::tempdir().unwrap();
    let driver = Arc::new(FakeDriver::new());
    driver.set_url("https://che.example.com/dashboard/#/ide/admin/wksp-1a2b");
    script_workspaces(&driver, "wksp-1a2b");
    let (runner, _) = runner(&driver, config(out.path()));

    let scenario = Scenario::new("cleanup").suite(
        Suite::new("Stopping and deleting the workspace")
            .setup("Resolve workspace name", workspace_handling::remember_workspace_name)
            .test(workspace_handling::stop_workspace())
            .test(workspace_handling::remove_workspace()),
    );

    let result = runner.run_scenario(&scenario).await;
    let suite = &result.suites[0];

    assert!(result.success, "{:?}", suite);
    assert_eq!(suite.tests.len(), 2);
    assert!(driver.clicks().contains(&Dashboard::stop_button_locator("wksp-1a2b")));
    assert!(driver.clicks().contains(&Dashboard::confirm_button_locator()));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_without_resolved_workspace_fails_fast() {
    let out = tempfile::tempdir().unwrap();
    let driver = Arc::new(FakeDriver::new());
    script_workspaces(&driver, "wksp-1a2b");
    let mut config = config(out.path());
    config.runner.screenshot_on_failure = false;
    let (runner, _) = runner(&driver, config);

    let scenario = Scenario::new("cleanup").suite(
        Suite::new("Stopping and deleting the workspace")
            .test(workspace_handling::stop_workspace())
            .test(workspace_handling::remove_workspace()),
    );

    let start = Instant::now();
    let result = runner.run_scenario(&scenario).await;

    assert_eq!(start.elapsed(), Duration::ZERO);
    for test in &result.suites[0].tests {
        assert_eq!(test.status, TestStatus::Failed);
        assert!(test.error.as_deref().unwrap().starts_with("Workspace name is not resolved"));
    }
    // Nothing was sent to the dashboard
    assert_eq!(driver.actions(), vec![DriverAction::Close]);
}

#[tokio::test(start_paused = true)]
async fn test_resolve_workspace_name_from_current_url() {
    let driver = Arc::new(FakeDriver::new());
    driver.set_url("https://che.example.com/admin/dotnet-web-simple-x1y2");

    let helper = container(&driver).get::<WorkspaceHandling>().unwrap();
    let handle = helper.resolve_workspace_name().await.unwrap();

    assert_eq!(handle.name(), "dotnet-web-simple-x1y2");
}
