//! Scenario model: scenarios hold suites, suites hold tests, tests hold steps
//!
//! Everything is plain data built up front and handed to the runner; nothing is
//! registered globally.

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{E2eError, E2eResult};
use crate::workspace::WorkspaceHandle;

type StepFn = Arc<dyn Fn(Arc<ScenarioContext>) -> BoxFuture<'static, E2eResult<()>> + Send + Sync>;

/// State shared by the steps of one scenario run
pub struct ScenarioContext {
    scenario: String,
    container: Arc<Container>,
    workspace: Mutex<Option<WorkspaceHandle>>,
}

impl ScenarioContext {
    pub fn new(scenario: impl Into<String>, container: Arc<Container>) -> Self {
        Self {
            scenario: scenario.into(),
            container,
            workspace: Mutex::new(None),
        }
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Resolve a page object or helper from the scenario's container
    pub fn get<T: Any + Send + Sync>(&self) -> E2eResult<Arc<T>> {
        self.container.get::<T>()
    }

    pub fn set_workspace(&self, handle: WorkspaceHandle) {
        *self.workspace.lock() = Some(handle);
    }

    /// The workspace resolved earlier in this scenario
    pub fn workspace(&self) -> E2eResult<WorkspaceHandle> {
        self.workspace.lock().clone().ok_or_else(|| {
            E2eError::WorkspaceUnresolved(format!(
                "no workspace name was resolved in scenario '{}'",
                self.scenario
            ))
        })
    }
}

/// A named asynchronous action
#[derive(Clone)]
pub struct Step {
    name: String,
    run: StepFn,
}

impl Step {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<ScenarioContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(move |ctx| f(ctx).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, ctx: Arc<ScenarioContext>) -> BoxFuture<'static, E2eResult<()>> {
        (self.run)(ctx)
    }
}

/// A test: one or more steps run in order, stopping at the first failure
#[derive(Clone)]
pub struct TestCase {
    name: String,
    steps: Vec<Step>,
}

impl TestCase {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<ScenarioContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        let name = name.into();
        Self {
            steps: vec![Step::new(name.clone(), f)],
            name,
        }
    }

    /// Append another step to this test
    pub fn then<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<ScenarioContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        self.steps.push(Step::new(name, f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Tests sharing optional setup and teardown hooks
#[derive(Clone)]
pub struct Suite {
    name: String,
    setup: Option<Step>,
    tests: Vec<TestCase>,
    teardown: Option<Step>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            tests: Vec::new(),
            teardown: None,
        }
    }

    /// Runs before the first test; if it fails no test of the suite runs
    pub fn setup<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<ScenarioContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        self.setup = Some(Step::new(name, f));
        self
    }

    /// Runs after the last test, whatever the outcome
    pub fn teardown<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Arc<ScenarioContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        self.teardown = Some(Step::new(name, f));
        self
    }

    pub fn test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    pub fn tests(mut self, tests: impl IntoIterator<Item = TestCase>) -> Self {
        self.tests.extend(tests);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn setup_step(&self) -> Option<&Step> {
        self.setup.as_ref()
    }

    pub fn teardown_step(&self) -> Option<&Step> {
        self.teardown.as_ref()
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.tests
    }
}

/// One end-to-end user journey
#[derive(Clone)]
pub struct Scenario {
    name: String,
    description: String,
    tags: Vec<String>,
    suites: Vec<Suite>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            suites: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn suite(mut self, suite: Suite) -> Self {
        self.suites.push(suite);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Arc<ScenarioContext> {
        Arc::new(ScenarioContext::new("unit", Arc::new(Container::new())))
    }

    #[tokio::test]
    async fn test_workspace_must_be_resolved() {
        let ctx = ctx();
        assert!(matches!(ctx.workspace(), Err(E2eError::WorkspaceUnresolved(_))));

        ctx.set_workspace(WorkspaceHandle::new("wksp-1").unwrap());
        assert_eq!(ctx.workspace().unwrap().name(), "wksp-1");
    }

    #[tokio::test]
    async fn test_step_runs_closure() {
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        let step = Step::new("count", move |_ctx| {
            let counter = counter.clone();
            async move {
                *counter.lock() += 1;
                Ok(())
            }
        });

        step.run(ctx()).await.unwrap();
        step.run(ctx()).await.unwrap();
        assert_eq!(*hits.lock(), 2);
    }

    #[test]
    fn test_builder_keeps_declaration_order() {
        let scenario = Scenario::new("journey").tag("smoke").suite(
            Suite::new("suite")
                .test(TestCase::new("first", |_| async { Ok(()) }))
                .test(TestCase::new("second", |_| async { Ok(()) }).then("second, part two", |_| async { Ok(()) })),
        );

        let names: Vec<&str> = scenario.suites()[0].test_cases().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(scenario.suites()[0].test_cases()[1].steps().len(), 2);
        assert_eq!(scenario.test_count(), 2);
        assert!(scenario.has_tag("smoke"));
    }
}
