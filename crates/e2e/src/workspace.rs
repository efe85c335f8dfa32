//! Runtime identification of the workspace under test

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::fmt;

use crate::driver::DriverHelper;
use crate::error::{E2eError, E2eResult};

/// Name of a running workspace, resolved from the browser during a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceHandle {
    name: String,
}

impl WorkspaceHandle {
    pub fn new(name: impl Into<String>) -> E2eResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(E2eError::WorkspaceUnresolved("empty workspace name".to_string()));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WorkspaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How the workspace name is read from the running environment
#[async_trait]
pub trait WorkspaceNameResolver: Send + Sync {
    async fn resolve(&self, driver_helper: &DriverHelper) -> E2eResult<WorkspaceHandle>;
}

/// Takes the last segment of the IDE route in the current URL
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlWorkspaceNameResolver;

#[async_trait]
impl WorkspaceNameResolver for UrlWorkspaceNameResolver {
    async fn resolve(&self, driver_helper: &DriverHelper) -> E2eResult<WorkspaceHandle> {
        let url = driver_helper.current_url().await?;
        name_from_url(&url)
    }
}

/// The hash route is used when the dashboard routes client-side (`#/ide/ns/name`),
/// the path otherwise (`/ns/name`).
pub fn name_from_url(url: &str) -> E2eResult<WorkspaceHandle> {
    let parsed = Url::parse(url)
        .map_err(|e| E2eError::WorkspaceUnresolved(format!("invalid URL '{}': {}", url, e)))?;

    let route = match parsed.fragment() {
        Some(fragment) if fragment.starts_with('/') => fragment.split('?').next().unwrap_or_default(),
        _ => parsed.path(),
    };

    let name = route
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .ok_or_else(|| E2eError::WorkspaceUnresolved(format!("no workspace name in '{}'", url)))?;

    WorkspaceHandle::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://che.example.com/admin/dotnet-web-simple-x1y2", "dotnet-web-simple-x1y2"; "path route")]
    #[test_case("https://che.example.com/dashboard/#/ide/admin/wksp-1a2b", "wksp-1a2b"; "hash route")]
    #[test_case("https://che.example.com/admin/wksp-1/?clean=true", "wksp-1"; "trailing slash and query")]
    #[test_case("https://che.example.com/dashboard/#/ide/admin/wksp-9?tab=logs", "wksp-9"; "hash route with query")]
    fn test_name_from_url(url: &str, expected: &str) {
        assert_eq!(name_from_url(url).unwrap().name(), expected);
    }

    #[test_case("https://che.example.com/"; "no path")]
    #[test_case("not a url"; "unparseable")]
    fn test_unresolvable_url(url: &str) {
        assert!(matches!(name_from_url(url), Err(E2eError::WorkspaceUnresolved(_))));
    }

    #[test]
    fn test_empty_handle_rejected() {
        assert!(WorkspaceHandle::new("  ").is_err());
    }
}
