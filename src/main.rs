mod config;
mod console;
mod controller;
mod error;
mod launch;
mod logging;
mod paths;
mod remote;
mod store;
mod version;

use anyhow::Result;

fn main() -> Result<()> {
    let root = paths::root_dir()?;
    logging::init(&root)?;
    tracing::info!(app = config::NAME, root = %root.display(), "launcher starting");

    let layout = paths::Layout::new(&root);
    let store = store::LocalStore::new(layout.clone());
    let source = remote::HttpSource::from_config()?;
    let (controller, events) = controller::UpdateController::new(store, source)?;

    console::run(&controller, &events, &layout)
}
