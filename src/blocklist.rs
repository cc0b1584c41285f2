//! Domain-category blocklist.
//!
//! Each known host carries a set of category labels. A URL is blocked when
//! its host carries at least one NG category, unless the host ends with one of
//! the always-allowed suffixes.

use crate::error::{Error, Result};
use crate::resource::read_json_resource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use url::{Host, Url};

/// Categories that block a host.
pub const DEFAULT_NG_CATEGORIES: &[&str] = &[
    "adult",
    "shopping",
    "cryptojacking",
    "games",
    "redirector",
    "strict_redirector",
    "vpn",
    "strong_redirector",
    "social_networks",
    "ddos",
    "gambling",
    "publicite",
    "bitcoin",
    "dating",
    "phishing",
    "filehosting",
    "agressif",
    "chat",
    "mixed adult",
    "celebrity",
    "financial",
    "manga",
    "remote-control",
    "webmail",
    "malware",
    "doh",
    "warez",
    "custom",
];

/// Host suffixes that are never blocked.
pub const DEFAULT_EXCEPTION_SUFFIXES: &[&str] = &[".5ch.net", "wikipedia.org"];

/// Which categories block and which hosts are exempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocklistPolicy {
    pub ng_categories: BTreeSet<String>,
    pub exception_suffixes: Vec<String>,
}

impl Default for BlocklistPolicy {
    fn default() -> Self {
        Self {
            ng_categories: DEFAULT_NG_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            exception_suffixes: DEFAULT_EXCEPTION_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl BlocklistPolicy {
    /// Replaces the NG category set.
    pub fn with_ng_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ng_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an always-allowed host suffix.
    pub fn with_exception_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exception_suffixes.push(suffix.into());
        self
    }

    fn is_exempt(&self, host: &str) -> bool {
        self.exception_suffixes.iter().any(|s| host.ends_with(s.as_str()))
    }
}

/// Immutable host → categories map.
///
/// Hosts are kept in their lowercase ASCII (punycode) form, so `例え.jp` and
/// `xn--r8jz45g.jp` name the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainBlocklist {
    hosts: HashMap<String, BTreeSet<String>>,
}

impl DomainBlocklist {
    /// Builds a blocklist from `(host, categories)` pairs; repeated hosts merge.
    pub fn from_entries<I, H, C, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (H, C)>,
        H: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut hosts: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (host, categories) in entries {
            let host: String = host.into();
            hosts
                .entry(canonical_host(&host))
                .or_default()
                .extend(categories.into_iter().map(Into::into));
        }
        Self { hosts }
    }

    /// Loads a (optionally gzip-compressed) JSON object `{host: [category, ...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw: HashMap<String, Vec<String>> = read_json_resource(path)?;
        let blocklist = Self::from_entries(raw);
        tracing::debug!(path = %path.display(), hosts = blocklist.len(), "loaded domain blocklist");
        Ok(blocklist)
    }

    /// Number of hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns true if no host is listed.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Categories of `host`, if listed.
    pub fn categories(&self, host: &str) -> Option<&BTreeSet<String>> {
        self.hosts.get(&canonical_host(host))
    }
}

/// Lowercase ASCII form of a host name; internationalized labels become punycode.
fn canonical_host(host: &str) -> String {
    match Host::parse(host) {
        Ok(Host::Domain(domain)) => domain,
        _ => host.to_ascii_lowercase(),
    }
}

/// Extracts the host name of `url`, in lowercase ASCII form.
pub fn hostname(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::MalformedUrl(format!("no host in {url}")))
}

/// Checks URLs against a blocklist under a policy.
#[derive(Debug, Clone, Copy)]
pub struct DomainBlocklistChecker<'a> {
    blocklist: &'a DomainBlocklist,
    policy: &'a BlocklistPolicy,
}

impl<'a> DomainBlocklistChecker<'a> {
    pub fn new(blocklist: &'a DomainBlocklist, policy: &'a BlocklistPolicy) -> Self {
        Self { blocklist, policy }
    }

    /// Returns true if `url` is allowed.
    ///
    /// Fails with [`Error::MalformedUrl`] when no host can be extracted.
    pub fn check(&self, url: &str) -> Result<bool> {
        let host = hostname(url)?;
        Ok(self.check_host(&host))
    }

    /// Returns true if `host` is allowed.
    pub fn check_host(&self, host: &str) -> bool {
        let host = canonical_host(host);
        if self.policy.is_exempt(&host) {
            return true;
        }
        match self.blocklist.categories(&host) {
            Some(categories) => categories.is_disjoint(&self.policy.ng_categories),
            None => true,
        }
    }
}
