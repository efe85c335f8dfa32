use std::time::Duration;

use crate::keys;
use crate::library::{code_execution, language_server};
use crate::pageobjects::Editor;
use crate::scenario::{Scenario, TestCase};
use crate::scenarios::DevfileJourney;

const STACK: &str = ".NET Core";
const SAMPLE: &str = "dotnet-web-simple";
const TAB: &str = "Program.cs";
const CODE_NAVIGATION_TAB: &str = "Console.cs";

const UPDATE_DEPENDENCIES_TASK: &str = "update dependencies";
const BUILD_TASK: &str = "build";
const RUN_TASK: &str = "run";
const RUN_TASK_EXPECTED: &str = "A process is now listening on port 5000.";

pub fn dotnet_core() -> Scenario {
    DevfileJourney::new(STACK, SAMPLE)
        .open_file(SAMPLE, TAB)
        .prepare(prepare_editor_for_ls_tests())
        .task(code_execution::run_task(UPDATE_DEPENDENCIES_TASK, Duration::from_secs(120)))
        .task(code_execution::close_terminal(UPDATE_DEPENDENCIES_TASK))
        .task(code_execution::run_task(BUILD_TASK, Duration::from_secs(30)))
        .task(code_execution::close_terminal(BUILD_TASK))
        .task(code_execution::run_task_with_dialog_shell_and_open_link(
            RUN_TASK,
            RUN_TASK_EXPECTED,
            Duration::from_secs(30),
        ))
        .language_server(language_server::suggestion_invoking(TAB, 22, 33, "test"))
        .language_server(language_server::error_highlighting(TAB, "error_text;", 23))
        .language_server(language_server::autocomplete(TAB, 22, 27, "WriteLine"))
        .language_server(language_server::code_navigation_go_to(
            TAB,
            22,
            27,
            CODE_NAVIGATION_TAB,
            &keys::chord(&[keys::CONTROL, keys::F11]),
        ))
        .into_scenario()
        .tag("dotnet")
}

/// Add a field and a call using it so the language-server checks have something to find
fn prepare_editor_for_ls_tests() -> TestCase {
    TestCase::new("Prepare file for LS tests", |ctx| async move {
        let editor = ctx.get::<Editor>()?;
        editor.move_cursor_to_line_and_char(TAB, 18, 6).await?;
        editor
            .perform_key_combination(TAB, "\nprivate static String test = \"test\";")
            .await?;
        editor.move_cursor_to_line_and_char(TAB, 21, 10).await?;
        editor
            .perform_key_combination(TAB, "\nConsole.WriteLine(test);\n")
            .await
    })
}
