use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config;

const VERSION_FILE_NAME: &str = "version.txt";
const ARCHIVE_FILE_NAME: &str = "release-download.zip";
const INSTALL_DIR_NAME: &str = "install";
const WORKING_DIR_NAME: &str = "run";

/// Every filesystem location the launcher touches, derived from one root.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Marker file recording the installed version.
    pub version_file: PathBuf,
    /// Fixed destination for the in-flight release download.
    pub archive_path: PathBuf,
    /// Directory the release archive is unpacked into.
    pub install_root: PathBuf,
    /// The application binary, at a fixed relative path inside the install root.
    pub executable: PathBuf,
    /// Working directory the application is started with.
    pub working_dir: PathBuf,
}

impl Layout {
    pub fn new(root: &Path) -> Layout {
        let install_root = root.join(INSTALL_DIR_NAME);
        Layout {
            version_file: root.join(VERSION_FILE_NAME),
            archive_path: root.join(ARCHIVE_FILE_NAME),
            executable: install_root.join(config::EXECUTABLE_REL),
            install_root,
            working_dir: root.join(WORKING_DIR_NAME),
        }
    }
}

pub fn root_dir() -> Result<PathBuf> {
    if let Ok(dev_root) = std::env::var("GANTRY_ROOT") {
        return Ok(PathBuf::from(dev_root));
    }
    let exe = std::env::current_exe().context("current_exe")?;
    Ok(exe.parent().context("exe has no parent")?.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn root_dir_prefers_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var("GANTRY_ROOT").ok();

        std::env::set_var("GANTRY_ROOT", "/tmp/gantry-root");
        let root = root_dir().unwrap();
        assert_eq!(root, PathBuf::from("/tmp/gantry-root"));

        if let Some(v) = prior {
            std::env::set_var("GANTRY_ROOT", v);
        } else {
            std::env::remove_var("GANTRY_ROOT");
        }
    }

    #[test]
    fn layout_is_rooted() {
        let root = PathBuf::from("/opt/launcher");
        let layout = Layout::new(&root);
        assert_eq!(layout.version_file, root.join("version.txt"));
        assert_eq!(layout.archive_path, root.join("release-download.zip"));
        assert_eq!(layout.install_root, root.join("install"));
        assert_eq!(layout.working_dir, root.join("run"));
        assert!(layout.executable.starts_with(&layout.install_root));
    }
}
