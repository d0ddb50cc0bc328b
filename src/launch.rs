use std::{fs, io, process::Command};

use tracing::info;

use crate::{
    error::{LauncherError, Result},
    paths::Layout,
};

/// Starts the installed executable with the configured working directory.
/// The frontend closes itself once this returns Ok.
pub fn launch(layout: &Layout) -> Result<()> {
    launch_with(layout, |cmd| cmd.spawn().map(|_| ()))
}

pub fn launch_with(
    layout: &Layout,
    spawn: impl FnOnce(&mut Command) -> io::Result<()>,
) -> Result<()> {
    if !layout.executable.exists() {
        return Err(LauncherError::NotInstalled {
            path: layout.executable.clone(),
        });
    }

    fs::create_dir_all(&layout.working_dir).map_err(|err| {
        LauncherError::install(format!("create {}", layout.working_dir.display()), err)
    })?;

    let mut cmd = Command::new(&layout.executable);
    cmd.current_dir(&layout.working_dir);
    spawn(&mut cmd).map_err(|source| LauncherError::Launch {
        path: layout.executable.clone(),
        source,
    })?;

    info!(exe = %layout.executable.display(), "application launched");
    Ok(())
}
