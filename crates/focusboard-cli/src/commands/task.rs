//! Task management commands for CLI.

use clap::Subcommand;
use focusboard_core::Priority;

use super::{open_dashboard, print_json, report, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// high, medium or low (default from config)
        #[arg(long, short)]
        priority: Option<Priority>,
        /// Estimated minutes (default from config)
        #[arg(long, short)]
        estimate: Option<u32>,
    },
    /// List tasks in display order
    List,
    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let mut dash = open_dashboard();

    match action {
        TaskAction::Add {
            text,
            priority,
            estimate,
        } => report(dash.add_task(&text, priority, estimate)),
        TaskAction::List => print_json(&dash.tasks()),
        TaskAction::Toggle { id } => report(dash.toggle_task(&id)),
        TaskAction::Delete { id } => report(dash.delete_task(&id)),
    }
}
