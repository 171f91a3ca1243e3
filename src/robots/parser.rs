//! Robots.txt rule evaluation
//!
//! Wraps the robotstxt crate's matcher behind a policy type that also
//! represents the blanket allow/deny outcomes of an unavailable rules file.

use robotstxt::DefaultMatcher;

/// Permission rules for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// Everything may be fetched (no rules file, or fail-open degradation)
    AllowAll,
    /// Nothing may be fetched (access to the rules file refused, or fail-closed)
    DenyAll,
    /// Raw robots.txt content evaluated on each query
    Rules(String),
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    ///
    /// Empty content allows everything.
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            Self::AllowAll
        } else {
            Self::Rules(content.to_string())
        }
    }

    /// Checks if a URL is allowed for the given robots product token
    ///
    /// # Arguments
    ///
    /// * `url` - The URL (absolute, or just its path) to check
    /// * `user_agent` - The product token matched against `User-agent` lines
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}
