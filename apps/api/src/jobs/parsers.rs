//! Job-card parsers, one per board. Each is a pure function over the search
//! page HTML so it can be exercised against saved fixtures.
//!
//! Boards rename their CSS classes often, so every field is looked up through
//! a short list of selectors tried in order. Cards without a title are
//! dropped; other missing fields get neutral placeholders rather than
//! invented values.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use uuid::Uuid;

use crate::jobs::sources::JobQuery;
use crate::jobs::text::{
    detect_employment_type, detect_remote, extract_listing_skills, normalize_posted_date,
    squash_whitespace,
};
use crate::models::job::JobListing;

const UNKNOWN_COMPANY: &str = "Company not listed";
const NOT_SPECIFIED: &str = "Not specified";

/// Fields read off a single card before heuristics run.
#[derive(Debug, Default)]
struct RawCard {
    title: String,
    company: String,
    location: String,
    description: String,
    salary: String,
    posted: String,
    url: String,
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Cards matched by the first selector that matches anything.
fn select_cards<'a>(document: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for selector in selectors.iter().filter_map(|s| parse_selector(s)) {
        let cards: Vec<_> = document.select(&selector).collect();
        if !cards.is_empty() {
            return cards;
        }
    }
    Vec::new()
}

fn first_match<'a>(card: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| parse_selector(s))
        .find_map(|selector| card.select(&selector).next())
}

fn element_text(element: ElementRef<'_>) -> String {
    squash_whitespace(&element.text().collect::<String>())
}

fn first_text(card: ElementRef<'_>, selectors: &[&str]) -> String {
    first_match(card, selectors)
        .map(element_text)
        .unwrap_or_default()
}

/// Resolves site-relative links against `origin`.
fn absolute_url(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        href.to_string()
    }
}

/// The card's own `href` (anchor cards) or the first link inside it.
fn card_link(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    card.value()
        .attr("href")
        .or_else(|| first_match(card, selectors).and_then(|a| a.value().attr("href")))
        .map(str::to_string)
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn listing_id(source: &str, title: &str, company: &str) -> String {
    let key = format!("{source}:{}:{}", title.to_lowercase(), company.to_lowercase());
    format!("{source}_{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).simple())
}

fn into_listing(raw: RawCard, source: &str, query: &JobQuery) -> Option<JobListing> {
    if raw.title.is_empty() {
        return None;
    }

    let company = or_default(raw.company, UNKNOWN_COMPANY);
    let location = if raw.location.is_empty() {
        or_default(query.location.trim().to_string(), NOT_SPECIFIED)
    } else {
        raw.location
    };

    Some(JobListing {
        id: listing_id(source, &raw.title, &company),
        employment_type: detect_employment_type(&raw.title, &raw.description).to_string(),
        remote_type: detect_remote(&raw.description, &location),
        skills: extract_listing_skills(&format!("{} {}", raw.title, raw.description)),
        posted_date: normalize_posted_date(&raw.posted),
        salary_range: or_default(raw.salary, NOT_SPECIFIED),
        title: raw.title,
        company,
        location,
        description: raw.description,
        url: raw.url,
        source: source.to_string(),
        scraped_at: Utc::now(),
        match_score: None,
        match_analysis: None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Indeed
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_indeed(html: &str, query: &JobQuery) -> Vec<JobListing> {
    let document = Html::parse_document(html);

    select_cards(&document, &["div.job_seen_beacon", "a[data-jk]"])
        .into_iter()
        .filter_map(|card| {
            let title = first_match(card, &["span[title]"])
                .and_then(|span| span.value().attr("title").map(squash_whitespace))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| first_text(card, &["h2.jobTitle"]));

            let raw = RawCard {
                title,
                company: first_text(card, &["span.companyName", "[data-testid=company-name]"]),
                location: first_text(card, &["[data-testid=job-location]", "div.companyLocation"]),
                description: first_text(card, &["div.job-snippet", "ul.jobsearch-jobDescriptionText"]),
                salary: first_text(
                    card,
                    &["span.salary-snippet", "[data-testid=attribute_snippet_testid]"],
                ),
                posted: first_text(card, &["span.date", "[data-testid=myJobsStateDate]"]),
                url: card_link(card, &["a[href]"])
                    .map(|href| absolute_url(&href, "https://www.indeed.com"))
                    .unwrap_or_default(),
            };
            into_listing(raw, "indeed", query)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Glassdoor
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_glassdoor(html: &str, query: &JobQuery) -> Vec<JobListing> {
    let document = Html::parse_document(html);

    select_cards(&document, &["li.react-job-listing", "article.jobContainer"])
        .into_iter()
        .filter_map(|card| {
            let title_link = first_match(card, &["a.jobTitle", "a[data-test=job-title]"]);
            let href = title_link
                .and_then(|a| a.value().attr("href").map(str::to_string))
                .or_else(|| card_link(card, &["a[href]"]));

            let raw = RawCard {
                title: title_link.map(element_text).unwrap_or_default(),
                company: first_text(card, &["span.employerName", "div.jobHeader"]),
                location: first_text(card, &["span.loc", "div.jobLocation"]),
                description: first_text(card, &["[data-test=descSnippet]"]),
                salary: first_text(card, &["span.salaryText", "div.jobSalary"]),
                posted: first_text(card, &["[data-test=job-age]"]),
                url: href
                    .map(|h| absolute_url(&h, "https://www.glassdoor.com"))
                    .unwrap_or_default(),
            };
            into_listing(raw, "glassdoor", query)
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// LinkedIn guest search
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_linkedin(html: &str, query: &JobQuery) -> Vec<JobListing> {
    let document = Html::parse_document(html);

    select_cards(&document, &["div.base-card", "li > div.base-search-card"])
        .into_iter()
        .filter_map(|card| {
            let raw = RawCard {
                title: first_text(card, &["h3.base-search-card__title"]),
                company: first_text(card, &["h4.base-search-card__subtitle"]),
                location: first_text(card, &["span.job-search-card__location"]),
                description: String::new(),
                salary: first_text(card, &["span.job-search-card__salary-info"]),
                posted: first_text(card, &["time[datetime]", "time"]),
                url: card_link(card, &["a.base-card__full-link", "a[href]"])
                    .map(|href| absolute_url(&href, "https://www.linkedin.com"))
                    .unwrap_or_default(),
            };
            into_listing(raw, "linkedin", query)
        })
        .collect()
}
