//! Scenario runner: opens a browser session per scenario and executes its
//! suites, tests and steps strictly in declaration order

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout_at;
use tracing::{debug, error, info, warn};

use crate::config::E2eConfig;
use crate::driver::{Driver, SessionFactory};
use crate::error::{E2eError, E2eResult};
use crate::report::{HookResult, RunSummary, ScenarioResult, StepResult, SuiteResult, TestResult, TestStatus};
use crate::scenario::{Scenario, ScenarioContext, Step, Suite, TestCase};
use crate::screenshooter;
use crate::wiring;

/// Main E2E scenario runner
pub struct ScenarioRunner {
    config: Arc<E2eConfig>,
    sessions: Arc<dyn SessionFactory>,
}

impl ScenarioRunner {
    pub fn new(config: Arc<E2eConfig>, sessions: Arc<dyn SessionFactory>) -> Self {
        Self { config, sessions }
    }

    /// Run scenarios one after another
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();

        info!("Running {} scenario(s)...", scenarios.len());

        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_scenario(scenario).await);
        }

        let summary = RunSummary::new(started_at, start.elapsed().as_millis() as u64, results);

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} skipped ({} ms)",
            summary.passed, summary.failed, summary.skipped, summary.duration_ms
        );
        for failure in summary.failures() {
            error!("✗ {} › {} › {}: {}", failure.scenario, failure.suite, failure.test, failure.error);
        }

        summary
    }

    /// Run one scenario in its own browser session
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        info!("▶ {}", scenario.name());

        let driver = match self.sessions.open().await {
            Ok(driver) => driver,
            Err(e) => {
                error!("Could not open a browser session for '{}': {}", scenario.name(), e);
                let reason = format!("browser session could not be opened: {}", e);
                let suites = scenario
                    .suites()
                    .iter()
                    .map(|suite| skipped_suite(suite, &reason))
                    .collect();
                return ScenarioResult {
                    name: scenario.name().to_string(),
                    success: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    suites,
                    error: Some(e.to_string()),
                };
            }
        };

        let container = wiring::e2e_container(driver.clone(), self.config.clone());
        let ctx = Arc::new(ScenarioContext::new(scenario.name(), Arc::new(container)));

        let mut suites = Vec::with_capacity(scenario.suites().len());
        for suite in scenario.suites() {
            suites.push(self.run_suite(scenario, suite, &ctx, driver.as_ref()).await);
        }

        // Steps never hold the session, so it is released on every path.
        if let Err(e) = driver.close().await {
            warn!("Failed to close browser session for '{}': {}", scenario.name(), e);
        }

        let success = suites.iter().all(SuiteResult::success);
        ScenarioResult {
            name: scenario.name().to_string(),
            success,
            duration_ms: start.elapsed().as_millis() as u64,
            suites,
            error: None,
        }
    }

    async fn run_suite(
        &self,
        scenario: &Scenario,
        suite: &Suite,
        ctx: &Arc<ScenarioContext>,
        driver: &dyn Driver,
    ) -> SuiteResult {
        debug!("Suite: {}", suite.name());

        let setup = match suite.setup_step() {
            Some(step) => Some(self.run_hook(suite, "setup", step, ctx).await),
            None => None,
        };

        let mut tests = Vec::with_capacity(suite.test_cases().len());
        match setup.as_ref().filter(|hook| !hook.success) {
            Some(failed) => {
                let reason = format!(
                    "suite setup '{}' failed: {}",
                    failed.name,
                    failed.error.as_deref().unwrap_or("unknown error")
                );
                error!("✗ {} › {}", suite.name(), reason);
                tests.extend(suite.test_cases().iter().map(|t| TestResult::skipped(t.name(), reason.clone())));
            }
            None => {
                let mut bailed: Option<String> = None;
                for test in suite.test_cases() {
                    if let Some(failed) = &bailed {
                        let reason = format!("skipped after failure of '{}'", failed);
                        tests.push(TestResult::skipped(test.name(), reason));
                        continue;
                    }

                    let result = self.run_test(scenario, suite, test, ctx, driver).await;
                    if result.status == TestStatus::Failed && self.config.runner.bail {
                        bailed = Some(result.name.clone());
                    }
                    tests.push(result);
                }
            }
        }

        let teardown = match suite.teardown_step() {
            Some(step) => Some(self.run_hook(suite, "teardown", step, ctx).await),
            None => None,
        };

        SuiteResult {
            name: suite.name().to_string(),
            setup,
            tests,
            teardown,
        }
    }

    async fn run_hook(&self, suite: &Suite, kind: &str, step: &Step, ctx: &Arc<ScenarioContext>) -> HookResult {
        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.timeouts.test();
        let result = run_step(step, ctx.clone(), deadline, self.config.timeouts.test_ms).await;

        if let Err(e) = &result {
            error!("✗ {} › {} '{}': {}", suite.name(), kind, step.name(), e);
        }
        HookResult {
            name: step.name().to_string(),
            success: result.is_ok(),
            duration_ms: start.elapsed().as_millis() as u64,
            error: result.err().map(|e| e.to_string()),
        }
    }

    async fn run_test(
        &self,
        scenario: &Scenario,
        suite: &Suite,
        test: &TestCase,
        ctx: &Arc<ScenarioContext>,
        driver: &dyn Driver,
    ) -> TestResult {
        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + self.config.timeouts.test();
        let mut steps = Vec::with_capacity(test.steps().len());
        let mut test_error: Option<String> = None;

        for step in test.steps() {
            let step_start = Instant::now();
            let result = run_step(step, ctx.clone(), deadline, self.config.timeouts.test_ms).await;
            let error = result.err().map(|e| e.to_string());

            steps.push(StepResult {
                name: step.name().to_string(),
                success: error.is_none(),
                duration_ms: step_start.elapsed().as_millis() as u64,
                error: error.clone(),
            });

            if error.is_some() {
                test_error = error;
                break; // Stop on first failure
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let mut screenshot = None;
        let status = match &test_error {
            None => {
                info!("✓ {} › {} ({} ms)", suite.name(), test.name(), duration_ms);
                TestStatus::Passed
            }
            Some(e) => {
                error!("✗ {} › {} - {}", suite.name(), test.name(), e);
                if self.config.runner.screenshot_on_failure {
                    let dir = self.config.runner.output_dir.join("screenshots");
                    screenshot =
                        screenshooter::capture_quietly(driver, &dir, &[scenario.name(), suite.name(), test.name()])
                            .await;
                }
                TestStatus::Failed
            }
        };

        TestResult {
            name: test.name().to_string(),
            status,
            duration_ms,
            steps,
            error: test_error,
            screenshot,
        }
    }
}

/// Run one step, bounded by `deadline`; a panic inside the step becomes an error
async fn run_step(
    step: &Step,
    ctx: Arc<ScenarioContext>,
    deadline: tokio::time::Instant,
    bound_ms: u64,
) -> E2eResult<()> {
    debug!("Step: {}", step.name());
    let guarded = AssertUnwindSafe(step.run(ctx)).catch_unwind();

    match timeout_at(deadline, guarded).await {
        Ok(Ok(result)) => result,
        Ok(Err(panic)) => Err(E2eError::StepPanicked(panic_message(panic.as_ref()))),
        Err(_) => Err(E2eError::Timeout {
            what: format!("step '{}'", step.name()),
            timeout_ms: bound_ms,
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn skipped_suite(suite: &Suite, reason: &str) -> SuiteResult {
    SuiteResult {
        name: suite.name().to_string(),
        setup: None,
        tests: suite
            .test_cases()
            .iter()
            .map(|t| TestResult::skipped(t.name(), reason.to_string()))
            .collect(),
        teardown: None,
    }
}
