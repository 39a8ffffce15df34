pub mod config;
pub mod focus;
pub mod site;
pub mod stats;
pub mod task;
pub mod tip;

use focusboard_core::{Config, Dashboard, Event, Rejection, StoreBackend, SystemClock};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the dashboard on the default store and config.
pub fn open_dashboard() -> Dashboard<StoreBackend> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration");
        Config::default()
    });
    Dashboard::open(StoreBackend::open_default(), SystemClock, config)
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the event of a mutation, or a note when it was skipped.
pub fn report(outcome: Result<Event, Rejection>) -> CliResult {
    match outcome {
        Ok(event) => print_json(&event),
        Err(rejection) => {
            eprintln!("skipped: {rejection}");
            Ok(())
        }
    }
}
