use clap::Subcommand;
use recess_core::storage::{load_sites, save_json, SITES_KEY};
use recess_core::Database;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum SitesAction {
    /// List reward sites
    List,
    /// Add a reward site
    Add {
        /// Domain, e.g. "news.ycombinator.com"
        site: String,
    },
    /// Remove a reward site
    Remove {
        site: String,
    },
    /// Remove every reward site
    Clear,
}

pub fn run(action: SitesAction) -> CliResult {
    let db = Database::open()?;
    let mut sites = load_sites(&db);

    match action {
        SitesAction::List => {}
        SitesAction::Add { site } => {
            let site = site.trim().to_string();
            if site.is_empty() {
                return Err("site must not be empty".into());
            }
            if !sites.contains(&site) {
                sites.push(site);
            }
        }
        SitesAction::Remove { site } => {
            let before = sites.len();
            sites.retain(|s| s != &site);
            if sites.len() == before {
                return Err(format!("no such site: {site}").into());
            }
        }
        SitesAction::Clear => sites.clear(),
    }

    save_json(&db, SITES_KEY, &sites)?;
    print_json(&sites)
}
