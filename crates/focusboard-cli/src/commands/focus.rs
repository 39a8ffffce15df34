//! Focus timer commands.
//!
//! `focus run` keeps the process alive for the length of one session: a
//! single-threaded runtime processes ticks and Ctrl-C one at a time, then
//! the session is stopped and folded into today's total.

use std::io::{IsTerminal, Write};

use clap::Subcommand;
use focusboard_core::{format_hms, Dashboard, StoreBackend};
use tokio::sync::mpsc;

use super::{open_dashboard, print_json, CliResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Run a focus session until Ctrl-C
    Run {
        /// Stop automatically after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Print today's focus state as JSON
    Status,
}

pub fn run(action: FocusAction) -> CliResult {
    let mut dash = open_dashboard();

    match action {
        FocusAction::Run { seconds } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_session(&mut dash, seconds))
        }
        FocusAction::Status => print_json(&dash.snapshot().focus),
    }
}

async fn run_session(dash: &mut Dashboard<StoreBackend>, limit: Option<u64>) -> CliResult {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let started = dash.start_focus_ticking(tx)?;
    print_json(&started)?;

    let show_progress = std::io::stderr().is_terminal();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if limit != Some(0) {
        loop {
            tokio::select! {
                tick = rx.recv() => {
                    let Some(tick) = tick else { break };
                    let Some(elapsed) = dash.on_tick(tick) else { continue };
                    if show_progress {
                        eprint!("\r{}", format_hms(elapsed));
                        let _ = std::io::stderr().flush();
                    }
                    if limit.is_some_and(|max| elapsed >= max) {
                        break;
                    }
                }
                _ = &mut ctrl_c => break,
            }
        }
    }
    if show_progress {
        eprintln!();
    }

    for event in dash.stop_focus() {
        print_json(&event)?;
    }
    Ok(())
}
