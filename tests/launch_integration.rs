#[path = "../src/config.rs"]
mod config;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/launch.rs"]
mod launch;
#[path = "../src/paths.rs"]
mod paths;

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use error::LauncherError;
use paths::Layout;

fn layout_for(root: &Path) -> Layout {
    let install_root = root.join("install");
    Layout {
        version_file: root.join("version.txt"),
        archive_path: root.join("release-download.zip"),
        executable: install_root.join("game-release").join("game.exe"),
        install_root,
        working_dir: root.join("run"),
    }
}

#[test]
fn missing_executable_is_not_installed() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = layout_for(tmp.path());

    let spawned = Mutex::new(false);
    let err = launch::launch_with(&layout, |_cmd| {
        *spawned.lock().unwrap() = true;
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, LauncherError::NotInstalled { path } if path == layout.executable));
    assert!(!*spawned.lock().unwrap(), "spawn must not run");
    assert!(!layout.working_dir.exists(), "no side effects on failure");
}

#[test]
fn launch_creates_working_dir_and_spawns_the_executable() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = layout_for(tmp.path());
    fs::create_dir_all(layout.executable.parent().unwrap()).unwrap();
    fs::write(&layout.executable, "binary").unwrap();

    let seen = Mutex::new(None::<(PathBuf, PathBuf)>);
    launch::launch_with(&layout, |cmd| {
        *seen.lock().unwrap() = Some((
            PathBuf::from(cmd.get_program()),
            cmd.get_current_dir().unwrap().to_path_buf(),
        ));
        Ok(())
    })
    .unwrap();

    let (program, cwd) = seen.lock().unwrap().take().unwrap();
    assert_eq!(program, layout.executable);
    assert_eq!(cwd, layout.working_dir);
    assert!(layout.working_dir.is_dir());
}

#[test]
fn spawn_failure_surfaces_as_launch_error() {
    let tmp = tempfile::tempdir().unwrap();
    let layout = layout_for(tmp.path());
    fs::create_dir_all(layout.executable.parent().unwrap()).unwrap();
    fs::write(&layout.executable, "binary").unwrap();

    let err = launch::launch_with(&layout, |_cmd| {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    })
    .unwrap_err();

    assert!(matches!(err, LauncherError::Launch { .. }));
}
