//! Standard container wiring for one browser session

use std::sync::Arc;

use crate::config::E2eConfig;
use crate::container::Container;
use crate::driver::{Driver, DriverHelper};
use crate::library::{CodeExecution, LanguageServer, ProjectAndFile, WorkspaceHandling};
use crate::pageobjects::{
    Dashboard, DialogWindow, Editor, Ide, Notification, ProjectTree, QuickOpenContainer, Terminal, TopMenu,
};
use crate::workspace::UrlWorkspaceNameResolver;

/// Bind every page object and library helper to `driver`
pub fn e2e_container(driver: Arc<dyn Driver>, config: Arc<E2eConfig>) -> Container {
    let mut container = Container::new();

    container
        .register_arc(config)
        .register(move |c| Ok(DriverHelper::new(driver.clone(), &c.get::<E2eConfig>()?.timeouts)));

    // Page objects
    container
        .register(|c| Ok(Notification::new(c.get()?)))
        .register(|c| Ok(Editor::new(c.get()?, c.get()?)))
        .register(|c| Ok(Terminal::new(c.get()?, c.get()?)))
        .register(|c| Ok(TopMenu::new(c.get()?, c.get()?)))
        .register(|c| Ok(QuickOpenContainer::new(c.get()?, c.get()?)))
        .register(|c| Ok(ProjectTree::new(c.get()?, c.get()?)))
        .register(|c| Ok(DialogWindow::new(c.get()?, c.get()?)))
        .register(|c| Ok(Ide::new(c.get()?, c.get()?)))
        .register(|c| Ok(Dashboard::new(c.get()?, c.get()?)));

    // Library helpers
    container
        .register(|c| {
            Ok(CodeExecution::new(
                c.get()?,
                c.get()?,
                c.get()?,
                c.get()?,
                c.get()?,
                c.get()?,
            ))
        })
        .register(|c| Ok(LanguageServer::new(c.get()?, c.get()?)))
        .register(|c| Ok(ProjectAndFile::new(c.get()?, c.get()?, c.get()?, c.get()?)))
        .register(|c| {
            Ok(WorkspaceHandling::new(
                c.get()?,
                c.get()?,
                c.get()?,
                Arc::new(UrlWorkspaceNameResolver),
            ))
        });

    container
}
