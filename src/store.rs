use anyhow::{bail, Context};
use std::{
    fs, io,
    path::{Component, Path},
    time::Duration,
};
use tracing::debug;

use crate::{
    error::{LauncherError, Result},
    paths::Layout,
    version::Version,
};

const MARKER_WRITE_ATTEMPTS: usize = 5;

/// Filesystem half of the updater: the version marker, the downloaded
/// archive, and the install tree. The update controller is the only writer.
#[derive(Debug, Clone)]
pub struct LocalStore {
    layout: Layout,
}

impl LocalStore {
    pub fn new(layout: Layout) -> LocalStore {
        LocalStore { layout }
    }

    pub fn archive_path(&self) -> &Path {
        &self.layout.archive_path
    }

    /// Distinguishes "never installed" from a recorded `0.0.0`; only the
    /// former takes the first-install path.
    pub fn has_version_marker(&self) -> bool {
        self.layout.version_file.exists()
    }

    /// A missing marker reads as the zero version; so does one whose content
    /// no longer parses (see `Version::parse`).
    pub fn read_installed_version(&self) -> Result<Version> {
        if !self.has_version_marker() {
            return Ok(Version::ZERO);
        }
        let text = fs::read_to_string(&self.layout.version_file).map_err(|err| {
            LauncherError::install(
                format!("read {}", self.layout.version_file.display()),
                err,
            )
        })?;
        Ok(Version::parse(&text))
    }

    /// Replaces the marker with the canonical version string. Must only be
    /// called once the tree the marker describes is actually on disk.
    pub fn write_installed_version(&self, version: Version) -> Result<()> {
        write_replacing(
            &self.layout.version_file,
            version.to_string().as_bytes(),
            MARKER_WRITE_ATTEMPTS,
        )
        .map_err(|err| {
            LauncherError::install(
                format!("write {}", self.layout.version_file.display()),
                err,
            )
        })
    }

    pub fn ensure_install_root(&self) -> Result<()> {
        fs::create_dir_all(&self.layout.install_root).map_err(|err| {
            LauncherError::install(
                format!("create {}", self.layout.install_root.display()),
                err,
            )
        })
    }

    /// Unpacks the downloaded archive into the install root, replacing
    /// existing files entry by entry.
    pub fn extract_archive(&self) -> Result<()> {
        extract_zip(&self.layout.archive_path, &self.layout.install_root).map_err(|err| {
            LauncherError::install(
                format!("extract {}", self.layout.archive_path.display()),
                err,
            )
        })
    }

    pub fn remove_archive(&self) -> Result<()> {
        fs::remove_file(&self.layout.archive_path).map_err(|err| {
            LauncherError::install(
                format!("remove {}", self.layout.archive_path.display()),
                err,
            )
        })
    }
}

fn extract_zip(archive: &Path, dest_root: &Path) -> anyhow::Result<()> {
    let file = fs::File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file).context("read zip")?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let name = entry.name().to_owned();
        let rel = Path::new(&name);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("invalid path in release archive: {name}");
        }

        let out_path = dest_root.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let mut out_file = fs::File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out_file)
            .with_context(|| format!("write {}", out_path.display()))?;
    }

    debug!(entries = zip.len(), dest = %dest_root.display(), "archive extracted");
    Ok(())
}

/// Marker writes go through a temp file and a rename so a crash mid-write
/// never leaves a half-written marker behind.
fn write_replacing(dest: &Path, bytes: &[u8], attempts: usize) -> anyhow::Result<()> {
    let mut delay = Duration::from_millis(100);
    let mut last_err = None;
    for i in 0..attempts {
        match write_via_rename(dest, bytes) {
            Ok(()) => return Ok(()),
            Err(err) => last_err = Some(err),
        }
        if i + 1 < attempts {
            std::thread::sleep(delay);
            delay = std::cmp::min(delay * 2, Duration::from_secs(2));
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("write {} failed", dest.display())))
}

fn write_via_rename(dest: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let parent = dest.parent().context("marker has no parent directory")?;
    let name = dest
        .file_name()
        .context("marker has no file name")?
        .to_string_lossy();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or(Duration::from_millis(0))
        .as_nanos();
    let tmp = parent.join(format!("{name}.tmp-{nonce}"));

    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    if dest.exists() {
        fs::remove_file(dest).with_context(|| format!("remove {}", dest.display()))?;
    }
    fs::rename(&tmp, dest)
        .with_context(|| format!("rename {} -> {}", tmp.display(), dest.display()))?;
    Ok(())
}
