use std::{fs, io, path::Path, time::Duration};

use tracing::info;

use crate::{
    config,
    error::{LauncherError, Result},
};

/// Where releases come from. The update controller only sees this boundary,
/// so tests substitute an in-memory source.
pub trait ReleaseSource {
    /// Latest published version, as canonical `major.minor.patch` text.
    fn fetch_latest_version(&self) -> Result<String>;

    /// Streams the release archive to `dest`, replacing whatever is there.
    /// Long-running; never called on the presentation thread.
    fn fetch_archive(&self, dest: &Path) -> Result<()>;
}

/// The production source: one URL publishing the version as plain text, one
/// publishing the release zip.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    version_url: String,
    archive_url: String,
}

impl HttpSource {
    pub fn from_config() -> Result<HttpSource> {
        HttpSource::new(config::VERSION_URL, config::ARCHIVE_URL)
    }

    pub fn new(version_url: &str, archive_url: &str) -> Result<HttpSource> {
        // No overall request timeout: the archive download legitimately runs
        // for minutes on slow links. Connecting still has to be prompt.
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("{} Launcher", config::PRODUCT_NAME))
            .connect_timeout(Duration::from_secs(10))
            .timeout(None)
            .build()
            .map_err(|err| LauncherError::network("build http client", err))?;
        Ok(HttpSource {
            client,
            version_url: version_url.to_string(),
            archive_url: archive_url.to_string(),
        })
    }
}

impl ReleaseSource for HttpSource {
    fn fetch_latest_version(&self) -> Result<String> {
        let text = self
            .client
            .get(&self.version_url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|err| LauncherError::network(format!("fetch {}", self.version_url), err))?;
        Ok(text.trim().to_string())
    }

    fn fetch_archive(&self, dest: &Path) -> Result<()> {
        info!(url = %self.archive_url, dest = %dest.display(), "downloading release archive");
        let mut resp = self
            .client
            .get(&self.archive_url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| {
                LauncherError::network(format!("download {}", self.archive_url), err)
            })?;
        let mut file = fs::File::create(dest)
            .map_err(|err| LauncherError::install(format!("create {}", dest.display()), err))?;
        io::copy(&mut resp, &mut file).map_err(|err| {
            LauncherError::network(format!("stream {} to {}", self.archive_url, dest.display()), err)
        })?;
        Ok(())
    }
}
