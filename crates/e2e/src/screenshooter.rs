//! Browser screenshots for failed tests

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::driver::Driver;
use crate::error::E2eResult;

/// File-system safe name built from the parts identifying a test
pub fn screenshot_name(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|part| {
            part.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.png", joined)
}

/// Capture the current viewport into `dir`
pub async fn capture(driver: &dyn Driver, dir: &Path, parts: &[&str]) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(screenshot_name(parts));
    let png = driver.screenshot().await?;
    std::fs::write(&path, png)?;
    debug!("Screenshot stored at {}", path.display());
    Ok(path)
}

/// Like [`capture`], but a failure to capture is only logged
pub async fn capture_quietly(driver: &dyn Driver, dir: &Path, parts: &[&str]) -> Option<PathBuf> {
    match capture(driver, dir, parts).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Failed to capture screenshot: {}", e);
            None
        }
    }
}
