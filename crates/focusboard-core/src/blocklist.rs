//! Distraction watchlist.
//!
//! A passive record of domains to stay away from during focus time. Nothing
//! is enforced. Domains are trimmed, kept unique, and listed in the order
//! they were added.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Rejection;
use crate::events::Event;
use crate::storage::{read_json, write_json, KeyValueStore, BLOCKED_SITES_KEY};

pub struct BlockedSites<S> {
    store: S,
    sites: Vec<String>,
}

impl<S: KeyValueStore> BlockedSites<S> {
    /// Load the persisted list, or start from `defaults` when none exists.
    pub fn load(store: S, defaults: &[String]) -> Self {
        let sites = match read_json::<_, Vec<String>>(&store, BLOCKED_SITES_KEY) {
            Some(sites) => sites,
            None => {
                let mut seeded: Vec<String> = Vec::with_capacity(defaults.len());
                for domain in defaults.iter().map(|d| d.trim()) {
                    if !domain.is_empty() && !seeded.iter().any(|s| s == domain) {
                        seeded.push(domain.to_string());
                    }
                }
                seeded
            }
        };
        Self { store, sites }
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn contains(&self, domain: &str) -> bool {
        let domain = domain.trim();
        self.sites.iter().any(|s| s == domain)
    }

    pub fn add(&mut self, domain: &str, now: DateTime<Utc>) -> Result<Event, Rejection> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(Rejection::EmptyDomain);
        }
        if self.contains(domain) {
            debug!(domain, "site already on watchlist");
            return Err(Rejection::DuplicateSite(domain.to_string()));
        }
        self.sites.push(domain.to_string());
        self.persist();
        Ok(Event::BlockedSiteAdded {
            domain: domain.to_string(),
            at: now,
        })
    }

    pub fn remove(&mut self, domain: &str, now: DateTime<Utc>) -> Result<Event, Rejection> {
        let domain = domain.trim();
        let index = self
            .sites
            .iter()
            .position(|s| s == domain)
            .ok_or_else(|| Rejection::SiteNotFound(domain.to_string()))?;
        self.sites.remove(index);
        self.persist();
        Ok(Event::BlockedSiteRemoved {
            domain: domain.to_string(),
            at: now,
        })
    }

    fn persist(&self) {
        write_json(&self.store, BLOCKED_SITES_KEY, &self.sites);
    }
}
