use std::io::{self, BufRead, Write};
use std::sync::mpsc::Receiver;

use anyhow::Result;

use crate::{
    config,
    controller::{CheckOutcome, Status, UpdateController, UpdateEvent},
    launch,
    paths::Layout,
    remote::ReleaseSource,
};

/// Console stand-in for a launcher window: renders status and the installed
/// version, and forwards the two user intents. Carries no state of its own.
pub fn run<S: ReleaseSource + Send + Sync + 'static>(
    controller: &UpdateController<S>,
    events: &Receiver<UpdateEvent>,
    layout: &Layout,
) -> Result<()> {
    println!("{} Launcher", config::PRODUCT_NAME);
    println!("commands: update, launch, quit");

    let stdin = io::stdin();
    loop {
        prompt(controller)?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        match line.trim() {
            "u" | "update" => run_update(controller, events),
            "l" | "launch" | "play" => {
                if controller.status() != Status::Ready {
                    println!("launch is only available when the launcher is ready");
                    continue;
                }
                match launch::launch(layout) {
                    // Hand-off complete: the launcher window closes.
                    Ok(()) => return Ok(()),
                    Err(err) => println!("{:#}", anyhow::Error::from(err)),
                }
            }
            "q" | "quit" | "exit" => return Ok(()),
            "" => {}
            other => println!("unknown command: {other}"),
        }
    }
}

fn run_update<S: ReleaseSource + Send + Sync + 'static>(
    controller: &UpdateController<S>,
    events: &Receiver<UpdateEvent>,
) {
    if !controller.request_update_check() {
        println!("an update check is already running");
        return;
    }
    println!("checking for updates...");
    match events.recv() {
        Ok(UpdateEvent::Finished(Ok(CheckOutcome::UpToDate(v)))) => {
            println!("up to date ({v})");
        }
        Ok(UpdateEvent::Finished(Ok(CheckOutcome::Installed(v)))) => {
            println!("installed version {v}");
        }
        Ok(UpdateEvent::Finished(Err(err))) => {
            println!("{:#}", anyhow::Error::from(err));
            println!("retry with: update");
        }
        Err(_) => {}
    }
}

fn prompt<S: ReleaseSource + Send + Sync + 'static>(
    controller: &UpdateController<S>,
) -> Result<()> {
    let status = match controller.status() {
        Status::Ready => "ready",
        Status::CheckingAndUpdating => "updating",
        Status::Failed => "failed",
    };
    print!("[v{} | {}] > ", controller.current_version(), status);
    io::stdout().flush()?;
    Ok(())
}
