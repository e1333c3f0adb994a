// src/crawl/policy.rs
// =============================================================================
// Which discovered links a recursive crawl is allowed to follow.
//
// The choice is explicit instead of whatever a fetch library would do by
// default: staying on the seed's host unless told otherwise.
// =============================================================================

use clap::ValueEnum;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Only links whose host equals the seed's host
    #[default]
    SameHost,
    /// Links on the seed's domain or any of its subdomains ("www." ignored)
    SameDomain,
    /// Any http(s) link, including other sites
    All,
}

impl LinkPolicy {
    /// Returns true if a crawl seeded at `seed` should follow `link`.
    pub fn allows(&self, seed: &Url, link: &Url) -> bool {
        if link.scheme() != "http" && link.scheme() != "https" {
            return false;
        }

        let (Some(seed_host), Some(link_host)) = (seed.host_str(), link.host_str()) else {
            return false;
        };

        match self {
            LinkPolicy::SameHost => seed_host == link_host,
            LinkPolicy::SameDomain => {
                let seed_host = strip_www(seed_host);
                let link_host = strip_www(link_host);
                link_host == seed_host
                    || link_host
                        .strip_suffix(seed_host)
                        .map_or(false, |prefix| prefix.ends_with('.'))
            }
            LinkPolicy::All => true,
        }
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
