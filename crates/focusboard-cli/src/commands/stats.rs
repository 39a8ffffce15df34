use focusboard_core::{FocusSnapshot, TaskSummary};
use serde::Serialize;

use super::{open_dashboard, print_json, CliResult};

#[derive(Serialize)]
struct TodayStats {
    tasks: TaskSummary,
    focus: FocusSnapshot,
}

pub fn run() -> CliResult {
    let snapshot = open_dashboard().snapshot();
    print_json(&TodayStats {
        tasks: snapshot.summary,
        focus: snapshot.focus,
    })
}
