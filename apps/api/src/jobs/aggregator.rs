//! Multi-board search: query each source in order, skip the ones that fail,
//! then dedupe, filter and rank what came back.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::jobs::matching::keyword_match;
use crate::jobs::sources::{JobQuery, JobSource};
use crate::jobs::text::posted_sort_key;
use crate::models::job::JobListing;
use crate::models::profile::UserProfile;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Exact employment type, e.g. `Full-time` or `Internship`.
    pub employment_type: Option<String>,
    pub remote_only: bool,
    /// Listings must mention this word in title, description or skills.
    pub required_keyword: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub count: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub jobs: Vec<JobListing>,
    pub sources: Vec<SourceReport>,
    /// Unique listings before filtering and truncation.
    pub total_found: usize,
}

pub fn per_source_limit(limit: usize, sources: usize) -> usize {
    (limit / sources.max(1)).max(1)
}

/// Runs `query` against every source sequentially. A failing source is
/// reported and skipped; the search as a whole never fails.
pub async fn aggregate_search(
    sources: &[Arc<dyn JobSource>],
    query: &JobQuery,
    filters: &SearchFilters,
    profile: Option<&UserProfile>,
) -> SearchOutcome {
    let source_query = JobQuery {
        limit: per_source_limit(query.limit, sources.len()),
        ..query.clone()
    };

    let mut collected = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());

    for source in sources {
        match source.search(&source_query).await {
            Ok(listings) => {
                info!("{}: {} listings", source.name(), listings.len());
                reports.push(SourceReport {
                    source: source.name().to_string(),
                    status: SourceStatus::Ok,
                    count: listings.len(),
                    error: None,
                });
                collected.extend(listings);
            }
            Err(e) => {
                warn!("{} search failed: {e}", source.name());
                reports.push(SourceReport {
                    source: source.name().to_string(),
                    status: SourceStatus::Failed,
                    count: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let unique = dedupe(collected);
    let total_found = unique.len();
    let jobs = rank(apply_filters(unique, filters), profile, query.limit);

    SearchOutcome {
        jobs,
        sources: reports,
        total_found,
    }
}

/// Keeps the first listing seen for each title + company pair.
pub fn dedupe(listings: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

pub fn apply_filters(listings: Vec<JobListing>, filters: &SearchFilters) -> Vec<JobListing> {
    let employment_type = filters
        .employment_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let keyword = filters
        .required_keyword
        .as_deref()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty());

    listings
        .into_iter()
        .filter(|job| employment_type.map_or(true, |t| job.employment_type.eq_ignore_ascii_case(t)))
        .filter(|job| !filters.remote_only || job.remote_type.is_some())
        .filter(|job| {
            keyword.as_deref().map_or(true, |k| {
                job.title.to_lowercase().contains(k)
                    || job.description.to_lowercase().contains(k)
                    || job.skills.iter().any(|s| s.to_lowercase() == k)
            })
        })
        .collect()
}

/// Orders by profile match score when a profile with skills is given (newest
/// first among equal scores), otherwise newest first. Truncates to `limit`.
pub fn rank(
    mut listings: Vec<JobListing>,
    profile: Option<&UserProfile>,
    limit: usize,
) -> Vec<JobListing> {
    let profile = profile.filter(|p| !p.skills.is_empty());

    match profile {
        Some(profile) => {
            for job in &mut listings {
                job.match_score = Some(keyword_match(profile, job).score);
            }
            listings.sort_by(|a, b| {
                b.match_score
                    .cmp(&a.match_score)
                    .then_with(|| posted_sort_key(&a.posted_date).cmp(&posted_sort_key(&b.posted_date)))
            });
        }
        None => listings.sort_by_key(|job| posted_sort_key(&job.posted_date)),
    }

    listings.truncate(limit);
    listings
}
