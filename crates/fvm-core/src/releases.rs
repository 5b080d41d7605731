use fvm_backend::SourceFetcher;
use log::debug;
use semver::Version as SemVer;
use std::cmp::Ordering;

use crate::error::EngineError;

/// Remote release tags, newest first.
pub async fn list_releases(fetcher: &dyn SourceFetcher) -> Result<Vec<String>, EngineError> {
    let tags = fetcher
        .list_remote_tags()
        .await
        .map_err(|error| EngineError::fetch_failed("release tags", error))?;
    debug!("{} reported {} remote tag(s)", fetcher.name(), tags.len());
    Ok(sort_releases(tags))
}

/// Deduplicate and order tags by semantic version, newest first. Tags that do
/// not parse as a version go last, alphabetically.
#[must_use]
pub fn sort_releases(mut tags: Vec<String>) -> Vec<String> {
    tags.sort();
    tags.dedup();

    let mut keyed: Vec<(Option<SemVer>, String)> = tags
        .into_iter()
        .map(|tag| (parse_release(&tag), tag))
        .collect();
    keyed.sort_by(|(a_version, a_tag), (b_version, b_tag)| match (a_version, b_version) {
        (Some(a), Some(b)) => b.cmp(a).then_with(|| a_tag.cmp(b_tag)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_tag.cmp(b_tag),
    });
    keyed.into_iter().map(|(_, tag)| tag).collect()
}

fn parse_release(tag: &str) -> Option<SemVer> {
    let version = tag.strip_prefix('v').unwrap_or(tag);
    if let Ok(parsed) = SemVer::parse(version) {
        return Some(parsed);
    }

    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(suffix_idx);
    let mut parts = core.split('.');
    let major = parts.next()?.parse::<u64>().ok()?;
    let minor = parts.next().map(str::parse::<u64>).transpose().ok()?;
    let patch = parts.next().map(str::parse::<u64>).transpose().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let normalized = match (minor, patch) {
        (None, None) => format!("{major}.0.0{suffix}"),
        (Some(minor), None) => format!("{major}.{minor}.0{suffix}"),
        (Some(minor), Some(patch)) => format!("{major}.{minor}.{patch}{suffix}"),
        (None, Some(_)) => return None,
    };
    SemVer::parse(&normalized).ok()
}
