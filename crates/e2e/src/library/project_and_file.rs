use std::sync::Arc;
use tracing::info;

use crate::config::E2eConfig;
use crate::error::E2eResult;
use crate::pageobjects::{Editor, Ide, ProjectTree};
use crate::scenario::TestCase;

pub struct ProjectAndFile {
    ide: Arc<Ide>,
    project_tree: Arc<ProjectTree>,
    editor: Arc<Editor>,
    config: Arc<E2eConfig>,
}

impl ProjectAndFile {
    pub fn new(ide: Arc<Ide>, project_tree: Arc<ProjectTree>, editor: Arc<Editor>, config: Arc<E2eConfig>) -> Self {
        Self {
            ide,
            project_tree,
            editor,
            config,
        }
    }

    /// IDE loaded and `sample` imported, with `root_folder` shown when given
    pub async fn wait_workspace_readiness(&self, sample: &str, root_folder: Option<&str>) -> E2eResult<()> {
        info!("Waiting for project '{}' to be imported", sample);
        self.ide.wait_ide().await?;
        self.project_tree.open_project_tree_container().await?;
        self.project_tree.wait_project_imported(sample, root_folder).await
    }

    pub async fn open_file(&self, folder_path: &str, tab: &str) -> E2eResult<()> {
        info!("Opening '{}/{}'", folder_path, tab);
        self.project_tree.expand_path_and_open_file(folder_path, tab).await?;
        self.editor
            .wait_editor_available(tab, self.config.timeouts.load_page())
            .await?;
        self.editor
            .wait_tab_focused(tab, self.config.timeouts.default_wait())
            .await
    }
}

pub fn wait_workspace_readiness(sample: &str, root_folder: &str) -> TestCase {
    let sample = sample.to_string();
    let root_folder = root_folder.to_string();
    TestCase::new("Wait for workspace readiness", move |ctx| {
        let sample = sample.clone();
        let root_folder = root_folder.clone();
        async move {
            let helper = ctx.get::<ProjectAndFile>()?;
            helper.wait_workspace_readiness(&sample, Some(&root_folder)).await
        }
    })
}

pub fn wait_workspace_readiness_no_subfolder(sample: &str) -> TestCase {
    let sample = sample.to_string();
    TestCase::new("Wait for workspace readiness", move |ctx| {
        let sample = sample.clone();
        async move {
            let helper = ctx.get::<ProjectAndFile>()?;
            helper.wait_workspace_readiness(&sample, None).await
        }
    })
}

pub fn open_file(folder_path: &str, tab: &str) -> TestCase {
    let folder_path = folder_path.to_string();
    let tab = tab.to_string();
    TestCase::new("Expand project and open file in editor", move |ctx| {
        let folder_path = folder_path.clone();
        let tab = tab.clone();
        async move {
            let helper = ctx.get::<ProjectAndFile>()?;
            helper.open_file(&folder_path, &tab).await
        }
    })
}
