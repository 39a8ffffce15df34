use clap::Subcommand;

use super::{open_dashboard, print_json, report, CliResult};

#[derive(Subcommand)]
pub enum SiteAction {
    /// Add a domain to the watchlist
    Add {
        /// Domain, e.g. example.com
        domain: String,
    },
    /// Remove a domain from the watchlist
    Remove {
        /// Domain
        domain: String,
    },
    /// List watched domains
    List,
}

pub fn run(action: SiteAction) -> CliResult {
    let mut dash = open_dashboard();

    match action {
        SiteAction::Add { domain } => report(dash.add_blocked_site(&domain)),
        SiteAction::Remove { domain } => report(dash.remove_blocked_site(&domain)),
        SiteAction::List => print_json(&dash.blocked_sites()),
    }
}
