//! Run results and their JSON output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::E2eResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

/// Result of executing one step of a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Outcome of a suite setup or teardown hook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

impl TestResult {
    pub fn skipped(name: &str, reason: String) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Skipped,
            duration_ms: 0,
            steps: Vec::new(),
            error: Some(reason),
            screenshot: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub setup: Option<HookResult>,
    pub tests: Vec<TestResult>,
    pub teardown: Option<HookResult>,
}

impl SuiteResult {
    /// A suite passes only if its hooks succeeded and every test passed
    pub fn success(&self) -> bool {
        let hooks_ok = [&self.setup, &self.teardown]
            .iter()
            .all(|hook| hook.as_ref().map_or(true, |h| h.success));
        hooks_ok && self.tests.iter().all(|t| t.status == TestStatus::Passed)
    }

    /// Setup and teardown hooks that failed, tagged with their kind
    pub fn failed_hooks(&self) -> impl Iterator<Item = (&'static str, &HookResult)> + '_ {
        [("setup", &self.setup), ("teardown", &self.teardown)]
            .into_iter()
            .filter_map(|(kind, hook)| hook.as_ref().filter(|h| !h.success).map(|h| (kind, h)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub suites: Vec<SuiteResult>,
    /// Error that prevented the scenario from running at all
    pub error: Option<String>,
}

/// Where and why a test did not pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub scenario: String,
    pub suite: String,
    pub test: String,
    pub status: TestStatus,
    pub error: String,
}

/// Result of running all selected scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    /// Failed tests plus failed suite hooks
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioResult>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, duration_ms: u64, scenarios: Vec<ScenarioResult>) -> Self {
        let suites = || scenarios.iter().flat_map(|s| &s.suites);
        let tests = || suites().flat_map(|s| &s.tests);
        let count = |status: TestStatus| tests().filter(|t| t.status == status).count();
        let failed_hooks: usize = suites().map(|s| s.failed_hooks().count()).sum();

        Self {
            started_at,
            total: tests().count(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed) + failed_hooks,
            skipped: count(TestStatus::Skipped),
            duration_ms,
            scenarios,
        }
    }

    pub fn success(&self) -> bool {
        self.scenarios.iter().all(|s| s.success)
    }

    /// Every test that did not pass and every failed hook, with its location.
    /// A hook is reported under the test name `<setup: name>` or `<teardown: name>`.
    pub fn failures(&self) -> Vec<FailureReport> {
        let mut failures = Vec::new();
        for scenario in &self.scenarios {
            for suite in &scenario.suites {
                for test in suite.tests.iter().filter(|t| t.status != TestStatus::Passed) {
                    failures.push(FailureReport {
                        scenario: scenario.name.clone(),
                        suite: suite.name.clone(),
                        test: test.name.clone(),
                        status: test.status,
                        error: test.error.clone().unwrap_or_else(|| "unknown error".to_string()),
                    });
                }
                for (kind, hook) in suite.failed_hooks() {
                    failures.push(FailureReport {
                        scenario: scenario.name.clone(),
                        suite: suite.name.clone(),
                        test: format!("<{}: {}>", kind, hook.name),
                        status: TestStatus::Failed,
                        error: hook.error.clone().unwrap_or_else(|| "unknown error".to_string()),
                    });
                }
            }
        }
        failures
    }

    /// Write the summary as `test-results.json` under `output_dir`
    pub fn write(&self, output_dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(name: &str, status: TestStatus) -> TestResult {
        TestResult {
            name: name.to_string(),
            status,
            duration_ms: 1,
            steps: Vec::new(),
            error: (status != TestStatus::Passed).then(|| format!("{} broke", name)),
            screenshot: None,
        }
    }

    fn summary() -> RunSummary {
        let suite = SuiteResult {
            name: "Validation of workspace build and run".to_string(),
            setup: None,
            tests: vec![
                test("build", TestStatus::Passed),
                test("run", TestStatus::Failed),
                test("open link", TestStatus::Skipped),
            ],
            teardown: None,
        };
        let scenario = ScenarioResult {
            name: ".NET Core test".to_string(),
            success: suite.success(),
            duration_ms: 3,
            suites: vec![suite],
            error: None,
        };
        RunSummary::new(Utc::now(), 3, vec![scenario])
    }

    #[test]
    fn test_counts_and_failures() {
        let summary = summary();
        assert_eq!((summary.total, summary.passed, summary.failed, summary.skipped), (3, 1, 1, 1));
        assert!(!summary.success());

        let failures = summary.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].scenario, ".NET Core test");
        assert_eq!(failures[0].suite, "Validation of workspace build and run");
        assert_eq!(failures[0].test, "run");
        assert_eq!(failures[0].error, "run broke");
    }

    #[test]
    fn test_failed_teardown_counts_as_failure() {
        let suite = SuiteResult {
            name: "Stopping and deleting the workspace".to_string(),
            setup: None,
            tests: vec![test("stop", TestStatus::Passed)],
            teardown: Some(HookResult {
                name: "cleanup".to_string(),
                success: false,
                duration_ms: 1,
                error: Some("workspace still running".to_string()),
            }),
        };
        let scenario = ScenarioResult {
            name: "cleanup".to_string(),
            success: suite.success(),
            duration_ms: 1,
            suites: vec![suite],
            error: None,
        };
        let summary = RunSummary::new(Utc::now(), 1, vec![scenario]);

        assert_eq!((summary.total, summary.passed, summary.failed), (1, 1, 1));
        assert!(!summary.success());
        assert_eq!(
            summary.failures(),
            vec![FailureReport {
                scenario: "cleanup".to_string(),
                suite: "Stopping and deleting the workspace".to_string(),
                test: "<teardown: cleanup>".to_string(),
                status: TestStatus::Failed,
                error: "workspace still running".to_string(),
            }]
        );
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = summary().write(dir.path()).unwrap();

        let written: RunSummary = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.failed, 1);
        assert_eq!(written.scenarios[0].suites[0].tests[1].status, TestStatus::Failed);
    }
}
