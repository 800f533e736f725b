//! The post-generation hook: stamp the upstream commit into the
//! generated README.
//!
//! Runs once, after every file is written. Any failure here — network,
//! timeout, an unexpected response shape, a README without the anchor —
//! is cosmetic: [`finalize`] reports a single warning and the run still
//! counts as successful. Nothing in this module may abort scaffolding.

use std::fs;
use std::path::Path;
use std::time::Duration;

use console::style;
use serde::Deserialize;
use thiserror::Error;

/// The README substring the commit reference is spliced in front of.
const README_ANCHOR: &str = " using";

const DEFAULT_API_BASE: &str = "https://api.github.com";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Why the commit stamp did not land. Never escapes [`finalize`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network failure or timeout, or a non-success HTTP status.
    #[error("commit lookup failed: {0}")]
    Request(String),

    /// Response body was not a non-empty list of commit objects.
    #[error("unexpected commit response: {0}")]
    Response(String),

    /// README missing, unreadable, or without the anchor text.
    #[error("README patch failed: {0}")]
    Patch(String),
}

/// Commit lookup against the GitHub commits API. The base URL is
/// injectable so tests can point it at an unroutable endpoint.
#[derive(Debug, Clone)]
pub struct CommitLookup {
    api_base: String,
    timeout: Duration,
}

impl Default for CommitLookup {
    fn default() -> Self {
        CommitLookup {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: LOOKUP_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Commit {
    sha: String,
}

impl CommitLookup {
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        CommitLookup {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    /// The identifying hash of the newest commit on `upstream`, on the
    /// requested branch if one was given. A single bounded attempt; no
    /// retries.
    pub fn latest_sha(&self, upstream: &str, branch: Option<&str>) -> Result<String, LookupError> {
        let mut url = format!("{}/repos/{}/commits", self.api_base, upstream);
        if let Some(branch) = branch {
            url.push_str("?sha=");
            url.push_str(branch);
        }

        let response = ureq::get(&url)
            .timeout(self.timeout)
            .set("User-Agent", "lath")
            .call()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        // newest first; only the head commit matters
        let commits: Vec<Commit> = response
            .into_json()
            .map_err(|e| LookupError::Response(e.to_string()))?;
        commits
            .into_iter()
            .next()
            .map(|commit| commit.sha)
            .ok_or_else(|| LookupError::Response("empty commit list".to_string()))
    }
}

/// Splice `@[<short>](https://github.com/<upstream>/tree/<sha>)` in
/// front of the first `" using"` in the generated README. At most one
/// substitution per run.
pub fn stamp_readme(dest: &Path, upstream: &str, sha: &str) -> Result<(), LookupError> {
    let readme = dest.join("README.md");
    let text = fs::read_to_string(&readme)
        .map_err(|e| LookupError::Patch(format!("{}: {}", readme.display(), e)))?;

    if !text.contains(README_ANCHOR) {
        return Err(LookupError::Patch(format!(
            "anchor `{}` not found in {}",
            README_ANCHOR,
            readme.display()
        )));
    }

    let short = sha.get(..7).unwrap_or(sha);
    let link = format!(
        "@[{}](https://github.com/{}/tree/{}){}",
        short, upstream, sha, README_ANCHOR
    );
    let patched = text.replacen(README_ANCHOR, &link, 1);
    fs::write(&readme, patched)
        .map_err(|e| LookupError::Patch(format!("{}: {}", readme.display(), e)))?;
    Ok(())
}

/// Run the hook: look up the upstream head and stamp the README.
///
/// Returns whether the stamp landed. On any failure it prints exactly
/// one warning line and leaves the generated project untouched; the
/// error never propagates.
pub fn finalize(lookup: &CommitLookup, dest: &Path, upstream: &str, branch: Option<&str>) -> bool {
    let result = lookup
        .latest_sha(upstream, branch)
        .and_then(|sha| stamp_readme(dest, upstream, &sha));

    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!("commit stamp skipped: {}", err);
            eprintln!(
                "{} Failed to append commit SHA on README.md",
                style("warning").yellow()
            );
            false
        }
    }
}
