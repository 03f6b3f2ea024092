use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::sources::{fetch_html, ScrapeError};
use crate::models::profile::UserProfile;

const LIMITED_DATA_NOTE: &str =
    "Limited data due to LinkedIn restrictions. Consider entering the rest of your profile manually.";

#[derive(Debug, Clone, Serialize)]
pub struct LinkedInProfile {
    pub name: String,
    pub headline: String,
    pub url: String,
    pub note: String,
    /// The same data shaped as a partial profile.
    pub profile: UserProfile,
}

/// Accepts only http(s) URLs on linkedin.com or a subdomain of it.
pub fn validate_linkedin_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid URL")))?;
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let is_linkedin = host == "linkedin.com" || host.ends_with(".linkedin.com");
    if !matches!(url.scheme(), "http" | "https") || !is_linkedin {
        return Err(AppError::Validation(
            "Only linkedin.com profile URLs are supported".to_string(),
        ));
    }
    Ok(url)
}

/// Reads the name and headline from a public profile page.
pub fn parse_profile_html(html: &str, url: &str) -> LinkedInProfile {
    let document = Html::parse_document(html);
    let name = first_text(&document, "h1.text-heading-xlarge");
    let headline = first_text(&document, "div.text-body-medium");

    LinkedInProfile {
        profile: UserProfile {
            name: name.clone(),
            title: headline.clone(),
            linkedin_url: url.to_string(),
            ..Default::default()
        },
        name,
        headline,
        url: url.to_string(),
        note: LIMITED_DATA_NOTE.to_string(),
    }
}

fn first_text(document: &Html, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

pub async fn extract_linkedin(client: &Client, url: &Url) -> Result<LinkedInProfile, ScrapeError> {
    let html = fetch_html(client, url.as_str()).await?;
    let profile = parse_profile_html(&html, url.as_str());
    info!(
        "LinkedIn profile fetched (name found: {}, headline found: {})",
        !profile.name.is_empty(),
        !profile.headline.is_empty()
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_other_hosts() {
        assert!(validate_linkedin_url("https://example.com/in/ada").is_err());
        assert!(validate_linkedin_url("https://linkedin.com.evil.io/in/ada").is_err());
        assert!(validate_linkedin_url("ftp://www.linkedin.com/in/ada").is_err());
        assert!(validate_linkedin_url("not a url").is_err());
    }

    #[test]
    fn test_accepts_linkedin_hosts() {
        assert!(validate_linkedin_url("https://www.linkedin.com/in/ada").is_ok());
        assert!(validate_linkedin_url("https://linkedin.com/in/ada").is_ok());
    }

    #[test]
    fn test_parse_profile_html() {
        let html = r#"<html><body>
            <h1 class="text-heading-xlarge inline">  Ada   Lovelace </h1>
            <div class="text-body-medium break-words">Analyst &amp; Engineer</div>
        </body></html>"#;
        let parsed = parse_profile_html(html, "https://www.linkedin.com/in/ada");
        assert_eq!(parsed.name, "Ada Lovelace");
        assert_eq!(parsed.headline, "Analyst & Engineer");
        assert_eq!(parsed.profile.title, "Analyst & Engineer");
        assert!(parsed.note.contains("Limited data"));
    }

    #[test]
    fn test_parse_authwall_page_yields_empty_fields() {
        let parsed = parse_profile_html("<html><title>Sign in</title></html>", "https://linkedin.com/in/x");
        assert!(parsed.name.is_empty());
        assert!(parsed.headline.is_empty());
    }
}
