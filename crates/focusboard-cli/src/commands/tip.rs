use super::{open_dashboard, print_json, CliResult};

pub fn run() -> CliResult {
    let dash = open_dashboard();
    print_json(&serde_json::json!({ "tip": dash.daily_tip() }))
}
