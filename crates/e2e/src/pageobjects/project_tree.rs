//! Explorer view in the left side panel

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::E2eConfig;
use crate::driver::DriverHelper;
use crate::error::E2eResult;
use crate::locator::{xpath_literal, Locator};

/// Root under which projects are mounted in the workspace
const PROJECTS_ROOT: &str = "/projects";

pub struct ProjectTree {
    driver_helper: Arc<DriverHelper>,
    config: Arc<E2eConfig>,
}

impl ProjectTree {
    pub fn new(driver_helper: Arc<DriverHelper>, config: Arc<E2eConfig>) -> Self {
        Self { driver_helper, config }
    }

    pub fn explorer_icon_locator() -> Locator {
        Locator::xpath("//div[@id='theia-left-content-panel']//ul[contains(@class, 'p-TabBar-content')]//li[@title='Explorer']")
    }

    pub fn tree_container_locator() -> Locator {
        Locator::css("#theia-left-side-panel .theia-TreeContainer")
    }

    /// Tree node for a path relative to the projects root
    pub fn item_locator(path: &str) -> Locator {
        let id = format!("{}:{}/{}", PROJECTS_ROOT, PROJECTS_ROOT, path.trim_matches('/'));
        Locator::xpath(format!("//div[@id={}]", xpath_literal(&id)))
    }

    pub async fn open_project_tree_container(&self) -> E2eResult<()> {
        debug!("ProjectTree::open_project_tree_container");
        let timeout = self.config.timeouts.default_wait();
        if self.driver_helper.is_visible(&Self::tree_container_locator()).await? {
            return Ok(());
        }
        self.driver_helper
            .wait_and_click(&Self::explorer_icon_locator(), timeout)
            .await?;
        self.driver_helper
            .wait_visibility(&Self::tree_container_locator(), timeout)
            .await?;
        Ok(())
    }

    pub async fn wait_item(&self, path: &str, timeout: Duration) -> E2eResult<()> {
        self.driver_helper.wait_visibility(&Self::item_locator(path), timeout).await?;
        Ok(())
    }

    /// Expand `path` unless its `child` is already shown
    async fn expand(&self, path: &str, child: &str) -> E2eResult<()> {
        if self.driver_helper.is_visible(&Self::item_locator(child)).await? {
            return Ok(());
        }
        self.driver_helper
            .wait_and_click(&Self::item_locator(path), self.config.timeouts.default_wait())
            .await?;
        self.wait_item(child, self.config.timeouts.default_wait()).await
    }

    /// Wait for the sample project (and, if given, its root folder) to be imported
    pub async fn wait_project_imported(&self, project: &str, root_folder: Option<&str>) -> E2eResult<()> {
        debug!("ProjectTree::wait_project_imported '{}'", project);
        self.wait_item(project, self.config.timeouts.load_page()).await?;
        if let Some(folder) = root_folder {
            self.expand(project, &format!("{}/{}", project, folder)).await?;
        }
        Ok(())
    }

    /// Expand every folder of `folder_path`, then open `file` from it
    pub async fn expand_path_and_open_file(&self, folder_path: &str, file: &str) -> E2eResult<()> {
        debug!("ProjectTree::expand_path_and_open_file '{}/{}'", folder_path, file);
        let mut current = String::new();
        let segments: Vec<&str> = folder_path.split('/').filter(|s| !s.is_empty()).collect();

        for (i, segment) in segments.iter().enumerate() {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            let child = match segments.get(i + 1) {
                Some(next) => format!("{}/{}", current, next),
                None => format!("{}/{}", current, file),
            };
            self.expand(&current, &child).await?;
        }

        let file_path = if current.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", current, file)
        };
        self.driver_helper
            .wait_and_click(&Self::item_locator(&file_path), self.config.timeouts.default_wait())
            .await
    }
}
