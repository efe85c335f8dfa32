//! Workspace lifecycle through the dashboard UI

use std::sync::Arc;
use tracing::info;

use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::pageobjects::{Dashboard, Ide};
use crate::scenario::{ScenarioContext, TestCase};
use crate::workspace::{WorkspaceHandle, WorkspaceNameResolver};

pub struct WorkspaceHandling {
    dashboard: Arc<Dashboard>,
    ide: Arc<Ide>,
    driver_helper: Arc<DriverHelper>,
    resolver: Arc<dyn WorkspaceNameResolver>,
}

impl WorkspaceHandling {
    pub fn new(
        dashboard: Arc<Dashboard>,
        ide: Arc<Ide>,
        driver_helper: Arc<DriverHelper>,
        resolver: Arc<dyn WorkspaceNameResolver>,
    ) -> Self {
        Self {
            dashboard,
            ide,
            driver_helper,
            resolver,
        }
    }

    pub async fn create_and_open_workspace(&self, stack: &str) -> E2eResult<()> {
        self.dashboard.start_workspace_from_stack(stack).await?;
        self.ide.wait_workspace_and_ide().await
    }

    /// Read the name of the workspace currently open in the browser
    pub async fn resolve_workspace_name(&self) -> E2eResult<WorkspaceHandle> {
        let handle = self.resolver.resolve(&self.driver_helper).await?;
        info!("Workspace under test: {}", handle);
        Ok(handle)
    }

    pub async fn stop_workspace(&self, workspace: &WorkspaceHandle) -> E2eResult<()> {
        self.dashboard.stop_workspace_by_ui(workspace.name()).await
    }

    pub async fn remove_workspace(&self, workspace: &WorkspaceHandle) -> E2eResult<()> {
        self.dashboard.delete_workspace_by_ui(workspace.name()).await
    }
}

pub fn create_and_open_workspace(stack: &str) -> TestCase {
    let stack = stack.to_string();
    TestCase::new(format!("Create and open workspace from '{}' sample", stack), move |ctx| {
        let stack = stack.clone();
        async move {
            let helper = ctx.get::<WorkspaceHandling>()?;
            helper.create_and_open_workspace(&stack).await
        }
    })
}

/// Suite hook storing the workspace name in the scenario context
pub async fn remember_workspace_name(ctx: Arc<ScenarioContext>) -> E2eResult<()> {
    let helper = ctx.get::<WorkspaceHandling>()?;
    let handle = helper.resolve_workspace_name().await?;
    ctx.set_workspace(handle);
    Ok(())
}

pub fn stop_workspace() -> TestCase {
    TestCase::new("Stop workspace", |ctx| async move {
        let workspace = ctx.workspace()?;
        let helper = ctx.get::<WorkspaceHandling>()?;
        helper.stop_workspace(&workspace).await
    })
}

pub fn remove_workspace() -> TestCase {
    TestCase::new("Remove workspace", |ctx| async move {
        let workspace = ctx.workspace()?;
        let helper = ctx.get::<WorkspaceHandling>()?;
        helper.remove_workspace(&workspace).await
    })
}
