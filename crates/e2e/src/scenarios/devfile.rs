//! The journey shared by devfile stacks: create the workspace, open a file,
//! run tasks, check the language server, then stop and remove the workspace

use crate::library::{project_and_file, workspace_handling};
use crate::scenario::{Scenario, Suite, TestCase};

pub struct DevfileJourney {
    stack: String,
    sample: String,
    root_folder: Option<String>,
    folder_path: String,
    tab: String,
    prepare: Vec<TestCase>,
    tasks: Vec<TestCase>,
    language_server: Vec<TestCase>,
}

impl DevfileJourney {
    /// Journey for `stack`, whose sample project is `sample`
    pub fn new(stack: impl Into<String>, sample: impl Into<String>) -> Self {
        let sample = sample.into();
        Self {
            stack: stack.into(),
            folder_path: sample.clone(),
            sample,
            root_folder: None,
            tab: String::new(),
            prepare: Vec::new(),
            tasks: Vec::new(),
            language_server: Vec::new(),
        }
    }

    /// Folder expected directly under the project once it is imported
    pub fn root_folder(mut self, folder: impl Into<String>) -> Self {
        self.root_folder = Some(folder.into());
        self
    }

    /// File opened in the editor, `folder_path` being relative to `/projects`
    pub fn open_file(mut self, folder_path: impl Into<String>, tab: impl Into<String>) -> Self {
        self.folder_path = folder_path.into();
        self.tab = tab.into();
        self
    }

    pub fn prepare(mut self, test: TestCase) -> Self {
        self.prepare.push(test);
        self
    }

    pub fn task(mut self, test: TestCase) -> Self {
        self.tasks.push(test);
        self
    }

    pub fn language_server(mut self, test: TestCase) -> Self {
        self.language_server.push(test);
        self
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn into_scenario(self) -> Scenario {
        let readiness = match &self.root_folder {
            Some(folder) => project_and_file::wait_workspace_readiness(&self.sample, folder),
            None => project_and_file::wait_workspace_readiness_no_subfolder(&self.sample),
        };

        let mut scenario = Scenario::new(format!("{} test", self.stack))
            .description(format!(
                "Create a {} workspace from the '{}' sample, build and run it, check the language server, then clean up",
                self.stack, self.sample
            ))
            .tag("devfile")
            .suite(
                Suite::new(format!("Create {} workspace", self.stack))
                    .test(workspace_handling::create_and_open_workspace(&self.stack))
                    .test(readiness),
            );

        if !self.tab.is_empty() {
            scenario = scenario.suite(
                Suite::new("Test opening file")
                    .test(project_and_file::open_file(&self.folder_path, &self.tab))
                    .tests(self.prepare),
            );
        }
        if !self.tasks.is_empty() {
            scenario = scenario.suite(Suite::new("Validation of workspace build and run").tests(self.tasks));
        }
        if !self.language_server.is_empty() {
            scenario = scenario.suite(Suite::new("Language server validation").tests(self.language_server));
        }

        scenario.suite(
            Suite::new("Stopping and deleting the workspace")
                .setup("Resolve workspace name", workspace_handling::remember_workspace_name)
                .test(workspace_handling::stop_workspace())
                .test(workspace_handling::remove_workspace()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> TestCase {
        TestCase::new(name, |_| async { Ok(()) })
    }

    #[test]
    fn test_minimal_journey_creates_and_cleans_up() {
        let scenario = DevfileJourney::new("Go", "golang-echo-example").into_scenario();
        let suites: Vec<&str> = scenario.suites().iter().map(|s| s.name()).collect();
        assert_eq!(suites, vec!["Create Go workspace", "Stopping and deleting the workspace"]);
        assert_eq!(scenario.name(), "Go test");
        assert!(scenario.has_tag("devfile"));
    }

    #[test]
    fn test_cleanup_suite_resolves_name_first() {
        let scenario = DevfileJourney::new("Go", "golang-echo-example").into_scenario();
        let cleanup = scenario.suites().last().unwrap();
        assert_eq!(cleanup.setup_step().unwrap().name(), "Resolve workspace name");
        let tests: Vec<&str> = cleanup.test_cases().iter().map(|t| t.name()).collect();
        assert_eq!(tests, vec!["Stop workspace", "Remove workspace"]);
    }

    #[test]
    fn test_full_journey_suite_order() {
        let scenario = DevfileJourney::new("Java Maven", "console-java-simple")
            .root_folder("src")
            .open_file("console-java-simple/src/main/java/org/eclipse/che/examples", "HelloWorld.java")
            .prepare(noop("Prepare"))
            .task(noop("Build"))
            .language_server(noop("Autocomplete"))
            .into_scenario();

        let suites: Vec<&str> = scenario.suites().iter().map(|s| s.name()).collect();
        assert_eq!(
            suites,
            vec![
                "Create Java Maven workspace",
                "Test opening file",
                "Validation of workspace build and run",
                "Language server validation",
                "Stopping and deleting the workspace",
            ]
        );
        assert_eq!(scenario.suites()[1].test_cases().len(), 2);
    }
}
