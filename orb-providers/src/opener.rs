// SPDX-License-Identifier: AGPL-3.0-or-later
//! Hand files to the desktop's default application

use orb_core::{OrbError, OrbResult};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Launch the platform opener for `path` without waiting for the application
pub async fn open_path(path: &Path) -> OrbResult<()> {
    if tokio::fs::symlink_metadata(path).await.is_err() {
        return Err(OrbError::NotFound(path.display().to_string()));
    }

    debug!("Opening {}", path.display());
    let status = opener_command(path).status().await?;
    if status.success() {
        Ok(())
    } else {
        Err(OrbError::Other(format!("opener exited with {status} for {}", path.display())))
    }
}
