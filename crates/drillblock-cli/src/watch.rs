//! Interactive regeneration driven by `key=value` lines on stdin.

use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use drillblock::{AppState, Debouncer, MeshStore, RegenerationReport, Settings};
use tracing::{debug, warn};

/// Idle wait when no regeneration is pending.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Regenerate once, then after every burst of edits. Returns at end of input.
pub fn run(settings: Settings) -> Result<()> {
    let mut state = AppState::new(settings);
    let mut display = MeshStore::new();
    let mut debouncer = Debouncer::default();

    print_report(&state.regenerate(&mut display));

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let wait = debouncer.remaining(Instant::now()).unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match state.apply_edit(line) {
                    Ok(()) => {
                        debug!(edit = line, "parameter edit");
                        debouncer.schedule(Instant::now());
                    }
                    Err(e) => warn!("{e}"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if debouncer.poll(Instant::now()) {
                    print_report(&state.regenerate(&mut display));
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                if debouncer.is_pending() {
                    debouncer.cancel();
                    print_report(&state.regenerate(&mut display));
                }
                break;
            }
        }
    }

    state.scene.clear(&mut display);
    Ok(())
}

fn print_report(report: &RegenerationReport) {
    println!(
        "generation {}: {} block(s), {} cutters, {} triangles in {} ms",
        report.generation, report.blocks, report.cutters, report.triangles, report.elapsed_ms
    );
}
