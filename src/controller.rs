use std::{
    sync::{mpsc, Arc, Mutex, MutexGuard},
    thread,
};

use tracing::{info, warn};

use crate::{
    error::{LauncherError, Result},
    remote::ReleaseSource,
    store::LocalStore,
    version::Version,
};

/// What the frontend observes. `CheckingAndUpdating` covers the whole
/// sequence from the version round-trip through extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    CheckingAndUpdating,
    Failed,
}

/// Terminal result of one accepted update check.
#[derive(Debug)]
pub enum CheckOutcome {
    UpToDate(Version),
    Installed(Version),
}

/// Sent once per accepted request, strictly after the status transition it
/// reports has been applied.
#[derive(Debug)]
pub enum UpdateEvent {
    Finished(std::result::Result<CheckOutcome, LauncherError>),
}

struct Shared {
    status: Mutex<Status>,
    current_version: Mutex<Version>,
}

/// Owns the update status and is the only writer of the marker file and the
/// install tree. The frontend holds it on the presentation thread; the
/// check/install sequence runs on a worker thread.
pub struct UpdateController<S> {
    shared: Arc<Shared>,
    store: LocalStore,
    source: Arc<S>,
    events: mpsc::Sender<UpdateEvent>,
}

impl<S: ReleaseSource + Send + Sync + 'static> UpdateController<S> {
    pub fn new(store: LocalStore, source: S) -> Result<(Self, mpsc::Receiver<UpdateEvent>)> {
        let installed = store.read_installed_version()?;
        let (events, rx) = mpsc::channel();
        let controller = UpdateController {
            shared: Arc::new(Shared {
                status: Mutex::new(Status::Ready),
                current_version: Mutex::new(installed),
            }),
            store,
            source: Arc::new(source),
            events,
        };
        Ok((controller, rx))
    }

    pub fn status(&self) -> Status {
        *lock(&self.shared.status)
    }

    pub fn current_version(&self) -> Version {
        *lock(&self.shared.current_version)
    }

    /// At most one check/install sequence runs at a time: a request made
    /// while one is in flight is coalesced into it and reports `false`.
    pub fn request_update_check(&self) -> bool {
        {
            let mut status = lock(&self.shared.status);
            if *status == Status::CheckingAndUpdating {
                return false;
            }
            *status = Status::CheckingAndUpdating;
        }

        info!("checking for updates");
        let shared = Arc::clone(&self.shared);
        let store = self.store.clone();
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        thread::spawn(move || {
            let result = run_check(&store, source.as_ref());
            match &result {
                Ok(CheckOutcome::UpToDate(v)) => {
                    info!(version = %v, "already up to date");
                    *lock(&shared.status) = Status::Ready;
                }
                Ok(CheckOutcome::Installed(v)) => {
                    info!(version = %v, "install complete");
                    *lock(&shared.current_version) = *v;
                    *lock(&shared.status) = Status::Ready;
                }
                Err(err) => {
                    warn!(error = %err, "update check failed");
                    *lock(&shared.status) = Status::Failed;
                }
            }
            let _ = events.send(UpdateEvent::Finished(result));
        });
        true
    }
}

/// One full pass of the update sequence, synchronously. The controller runs
/// this on its worker thread; tests call it directly.
pub fn run_check<S: ReleaseSource>(
    store: &LocalStore,
    source: &S,
) -> std::result::Result<CheckOutcome, LauncherError> {
    if !store.has_version_marker() {
        // First run: the zero marker lands before any network traffic; the
        // real version only lands after extraction succeeds.
        store.write_installed_version(Version::ZERO)?;
        let target = Version::parse(&source.fetch_latest_version()?);
        install(store, source, target)?;
        return Ok(CheckOutcome::Installed(target));
    }

    let installed = store.read_installed_version()?;
    let latest = Version::parse(&source.fetch_latest_version()?);
    if !latest.differs_from(&installed) {
        return Ok(CheckOutcome::UpToDate(installed));
    }
    install(store, source, latest)?;
    Ok(CheckOutcome::Installed(latest))
}

fn install<S: ReleaseSource>(store: &LocalStore, source: &S, target: Version) -> Result<()> {
    info!(version = %target, "installing");
    store.ensure_install_root()?;
    // A failed download may leave a partial archive at the fixed path; the
    // next attempt simply overwrites it.
    source.fetch_archive(store.archive_path())?;
    store.extract_archive()?;
    store.remove_archive()?;
    // Marker moves last: a crash anywhere above leaves it pointing at the
    // previous fully-installed version.
    store.write_installed_version(target)?;
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
