//! Per-host robots.txt cache
//!
//! A `RobotsCache` is built once per run and handed to the engine. Each host's
//! rules are retrieved lazily on its first permission query and kept for the
//! rest of the run, including the degraded policy chosen when retrieval fails,
//! so an unreachable rules file costs one request and one warning per host.

use crate::config::CrawlerConfig;
use crate::robots::{RobotsError, RobotsPolicy};
use crate::url::host_key;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use url::Url;

/// Cached policy for one host
#[derive(Debug, Clone)]
struct CachedRobots {
    policy: RobotsPolicy,
    /// True when the policy stands in for a rules file that could not be retrieved
    degraded: bool,
}

/// Lazily populated per-host permission cache
pub struct RobotsCache {
    client: Client,
    scheme: String,
    fail_open: bool,
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to retrieve rules files
    /// * `scheme` - Scheme of the robots.txt URL (`https` in production)
    /// * `fail_open` - Policy cached when retrieval fails: allow-all if true, deny-all otherwise
    pub fn new(client: Client, scheme: impl Into<String>, fail_open: bool) -> Self {
        Self {
            client,
            scheme: scheme.into(),
            fail_open,
            entries: HashMap::new(),
        }
    }

    /// Creates an empty cache from the crawler configuration
    pub fn from_config(client: Client, config: &CrawlerConfig) -> Self {
        Self::new(client, config.robots_scheme.clone(), config.robots_fail_open)
    }

    /// Checks whether `url` may be fetched by the crawler identified by `user_agent`
    ///
    /// The rules for the URL's host are retrieved on first use and cached.
    /// URLs without a usable host are denied.
    pub async fn can_fetch(&mut self, url: &str, user_agent: &str) -> bool {
        let parsed = match Url::parse(url.trim()) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        let key = match host_key(&parsed) {
            Some(key) => key,
            None => return false,
        };

        if !self.entries.contains_key(&key) {
            let entry = self.retrieve(&key).await;
            self.entries.insert(key.clone(), entry);
        }

        self.entries
            .get(&key)
            .map(|entry| entry.policy.is_allowed(parsed.as_str(), user_agent))
            .unwrap_or(false)
    }

    /// Number of hosts with a cached policy
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the host's policy is a degraded stand-in for an unavailable rules file
    pub fn is_degraded(&self, host_key: &str) -> bool {
        self.entries
            .get(host_key)
            .map(|entry| entry.degraded)
            .unwrap_or(false)
    }

    /// Retrieves and converts one host's rules, applying the degradation policy on failure
    async fn retrieve(&self, key: &str) -> CachedRobots {
        match self.fetch_policy(key).await {
            Ok(policy) => {
                tracing::debug!("Cached robots.txt policy for {}", key);
                CachedRobots {
                    policy,
                    degraded: false,
                }
            }
            Err(e) => {
                let policy = if self.fail_open {
                    RobotsPolicy::AllowAll
                } else {
                    RobotsPolicy::DenyAll
                };
                tracing::warn!(
                    "Failed to read robots.txt for {}: {}; {} this host for the rest of the run",
                    key,
                    e,
                    if self.fail_open { "allowing" } else { "denying" }
                );
                CachedRobots {
                    policy,
                    degraded: true,
                }
            }
        }
    }

    /// Fetches `{scheme}://{host}/robots.txt` and maps the response to a policy
    ///
    /// | Response | Policy |
    /// |----------|--------|
    /// | 2xx | Parsed rules |
    /// | 401, 403 | Deny all |
    /// | Other 4xx | Allow all |
    /// | 5xx, transport error | `Err` |
    async fn fetch_policy(&self, key: &str) -> Result<RobotsPolicy, RobotsError> {
        let robots_url = format!("{}://{}/robots.txt", self.scheme, key);

        let response = self
            .client
            .get(&robots_url)
            .send()
            .await
            .map_err(|source| RobotsError::Transport {
                url: robots_url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|source| RobotsError::Transport {
                    url: robots_url.clone(),
                    source,
                })?;
            return Ok(RobotsPolicy::from_content(&body));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(RobotsPolicy::DenyAll);
        }

        if status.is_client_error() {
            return Ok(RobotsPolicy::AllowAll);
        }

        Err(RobotsError::Status {
            url: robots_url,
            status: status.as_u16(),
        })
    }
}
