//! Job boards as `JobSource`s.
//!
//! Every board is fetched the same way (desktop User-Agent, politeness delay,
//! plain GET) and differs only in its search URL and card parser.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::jobs::parsers::{parse_glassdoor, parse_indeed, parse_linkedin};
use crate::models::job::JobListing;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Boards never return more than this many cards per page.
const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("site answered with status {0}")]
    Status(u16),

    #[error("page contained no recognizable job cards")]
    NoListings,
}

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        AppError::Scrape(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Indeed,
    LinkedIn,
    Glassdoor,
}

impl SourceKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "indeed" => Some(SourceKind::Indeed),
            "linkedin" => Some(SourceKind::LinkedIn),
            "glassdoor" => Some(SourceKind::Glassdoor),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Indeed => "indeed",
            SourceKind::LinkedIn => "linkedin",
            SourceKind::Glassdoor => "glassdoor",
        }
    }

    /// Search page URL for `query`, newest postings first where the board allows it.
    pub fn search_url(self, query: &JobQuery) -> String {
        let keywords = urlencoding::encode(query.keywords.trim());
        let location = urlencoding::encode(query.location.trim());
        match self {
            SourceKind::Indeed => format!(
                "https://www.indeed.com/jobs?q={keywords}&l={location}&sort=date&limit={}",
                query.limit.clamp(1, MAX_PAGE_SIZE)
            ),
            SourceKind::LinkedIn => format!(
                "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search?keywords={keywords}&location={location}&sortBy=DD&start=0"
            ),
            SourceKind::Glassdoor => {
                let mut url = format!(
                    "https://www.glassdoor.com/Job/jobs.htm?sc.keyword={keywords}&jobType=all&fromAge=1&includeNoSalaryJobs=true&radius=25"
                );
                if !query.location.trim().is_empty() {
                    url.push_str(&format!("&locKeyword={location}"));
                }
                url
            }
        }
    }

    pub fn parse(self, html: &str, query: &JobQuery) -> Vec<JobListing> {
        match self {
            SourceKind::Indeed => parse_indeed(html, query),
            SourceKind::LinkedIn => parse_linkedin(html, query),
            SourceKind::Glassdoor => parse_glassdoor(html, query),
        }
    }
}

/// What a single board is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub keywords: String,
    pub location: String,
    pub limit: usize,
}

#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &JobQuery) -> Result<Vec<JobListing>, ScrapeError>;
}

/// Builds the shared scraping client.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(DESKTOP_USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GETs a page and returns its body; non-2xx answers are errors.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, ScrapeError> {
    debug!("GET {url}");
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// A job board scraped over HTTP.
pub struct HttpJobSource {
    kind: SourceKind,
    client: Client,
    delay: Duration,
}

impl HttpJobSource {
    pub fn new(kind: SourceKind, client: Client, delay: Duration) -> Self {
        Self {
            kind,
            client,
            delay,
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    async fn search(&self, query: &JobQuery) -> Result<Vec<JobListing>, ScrapeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let html = fetch_html(&self.client, &self.kind.search_url(query)).await?;
        let mut listings = self.kind.parse(&html, query);
        if listings.is_empty() {
            return Err(ScrapeError::NoListings);
        }
        listings.truncate(query.limit);

        info!("{}: parsed {} listings", self.kind.name(), listings.len());
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> JobQuery {
        JobQuery {
            keywords: "rust engineer".to_string(),
            location: "New York, NY".to_string(),
            limit: 80,
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(SourceKind::from_name(" LinkedIn "), Some(SourceKind::LinkedIn));
        assert_eq!(SourceKind::from_name("monster"), None);
    }

    #[test]
    fn test_indeed_url_encodes_and_caps_limit() {
        let url = SourceKind::Indeed.search_url(&query());
        assert_eq!(
            url,
            "https://www.indeed.com/jobs?q=rust%20engineer&l=New%20York%2C%20NY&sort=date&limit=50"
        );
    }

    #[test]
    fn test_glassdoor_url_omits_blank_location() {
        let mut q = query();
        q.location = "  ".to_string();
        let url = SourceKind::Glassdoor.search_url(&q);
        assert!(url.contains("sc.keyword=rust%20engineer"));
        assert!(!url.contains("locKeyword"));
    }

    #[test]
    fn test_scrape_error_maps_to_bad_gateway() {
        use axum::response::IntoResponse;
        let err: AppError = ScrapeError::Status(403).into();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_GATEWAY
        );
    }
}
