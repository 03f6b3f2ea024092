//! Portfolio content (LLM, JSON) rendered into a standalone HTML page.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::documents::prompts::{PORTFOLIO_PROMPT, PORTFOLIO_SYSTEM};
use crate::llm_client::prompts::{candidate_block, fill_template, or_placeholder, JSON_ONLY_SUFFIX};
use crate::llm_client::{CompletionOptions, LlmClient, LlmError};
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::models::profile::UserProfile;

const PORTFOLIO_OPTIONS: CompletionOptions = CompletionOptions::new(2000, 0.8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
    pub background: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub card_bg: &'static str,
    pub section_bg: &'static str,
}

pub const COLOR_SCHEMES: &[ColorScheme] = &[
    ColorScheme {
        name: "Blue Gradient (Professional)",
        background: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        primary: "#667eea",
        secondary: "#764ba2",
        accent: "#FFD700",
        text: "#333333",
        card_bg: "#ffffff",
        section_bg: "#f8f9fa",
    },
    ColorScheme {
        name: "Purple Gradient (Creative)",
        background: "linear-gradient(135deg, #8B5CF6 0%, #A855F7 100%)",
        primary: "#8B5CF6",
        secondary: "#A855F7",
        accent: "#F59E0B",
        text: "#2D1B69",
        card_bg: "#FAF5FF",
        section_bg: "#F3E8FF",
    },
    ColorScheme {
        name: "Green Gradient (Tech)",
        background: "linear-gradient(135deg, #10B981 0%, #059669 100%)",
        primary: "#10B981",
        secondary: "#059669",
        accent: "#FBBF24",
        text: "#064E3B",
        card_bg: "#F0FDF4",
        section_bg: "#ECFDF5",
    },
    ColorScheme {
        name: "Orange Gradient (Energy)",
        background: "linear-gradient(135deg, #F97316 0%, #EA580C 100%)",
        primary: "#F97316",
        secondary: "#EA580C",
        accent: "#3B82F6",
        text: "#7C2D12",
        card_bg: "#FFF7ED",
        section_bg: "#FFEDD5",
    },
    ColorScheme {
        name: "Dark Theme (Modern)",
        background: "linear-gradient(135deg, #1F2937 0%, #111827 100%)",
        primary: "#6B7280",
        secondary: "#374151",
        accent: "#10B981",
        text: "#F9FAFB",
        card_bg: "#374151",
        section_bg: "#1F2937",
    },
];

/// Layout name and the CSS appended after the base stylesheet.
pub const LAYOUTS: &[(&str, &str)] = &[
    ("Modern Professional", ""),
    (
        "Creative Designer",
        ".hero { clip-path: polygon(0 0, 100% 0, 85% 100%, 0% 100%); }\n\
         .hero h1 { text-transform: uppercase; letter-spacing: 3px; transform: skew(-5deg); }\n\
         .card { border-left: 8px solid var(--primary); border-radius: 25px 5px 25px 5px; transform: rotate(-1deg); }\n\
         .card:nth-child(even) { transform: rotate(1deg); border-left: none; border-right: 8px solid var(--accent); }",
    ),
    (
        "Tech Developer",
        "body { font-family: Consolas, Monaco, 'Courier New', monospace; }\n\
         .hero h1::before { content: '> '; color: var(--accent); }\n\
         .card { border: 1px solid var(--primary); border-radius: 4px; }\n\
         .section h2::after { content: '_'; color: var(--accent); }",
    ),
    (
        "Business Executive",
        "body { font-family: 'Times New Roman', Georgia, serif; }\n\
         .hero h1 { font-weight: 400; letter-spacing: 1px; }\n\
         .card { border-top: 4px solid var(--secondary); border-radius: 0; }\n\
         .section h2 { border-bottom: 2px solid var(--secondary); display: inline-block; }",
    ),
    (
        "Minimalist Clean",
        "body { background: #ffffff; }\n\
         .hero { background: #ffffff; color: var(--text); }\n\
         .card { box-shadow: none; border: 1px solid #eeeeee; }\n\
         .section { background: #ffffff; }",
    ),
];

pub fn resolve_scheme(name: Option<&str>) -> &'static ColorScheme {
    name.and_then(|n| {
        COLOR_SCHEMES
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(n.trim()))
    })
    .unwrap_or(&COLOR_SCHEMES[0])
}

pub fn resolve_layout(name: Option<&str>) -> (&'static str, &'static str) {
    name.and_then(|n| LAYOUTS.iter().find(|(l, _)| l.eq_ignore_ascii_case(n.trim())))
        .copied()
        .unwrap_or(LAYOUTS[0])
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortfolioProject {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortfolioContent {
    pub headline: String,
    pub about: String,
    pub skills_categories: BTreeMap<String, Vec<String>>,
    pub projects: Vec<PortfolioProject>,
    pub achievements: Vec<String>,
    pub cta: String,
}

impl PortfolioContent {
    /// Content derived from the profile alone.
    pub fn from_profile(profile: &UserProfile, include_projects: bool) -> Self {
        let title = or_placeholder(&profile.title, "Professional");
        let top_skills: Vec<&str> = profile.skills.iter().take(2).map(String::as_str).collect();
        let headline = if top_skills.is_empty() {
            title.to_string()
        } else {
            format!("{title} with expertise in {}", top_skills.join(", "))
        };
        let about = if profile.summary.trim().is_empty() {
            format!("{title} focused on delivering high-quality work.")
        } else {
            profile.summary.trim().to_string()
        };
        let mut skills_categories = BTreeMap::new();
        if !profile.skills.is_empty() {
            skills_categories.insert("Skills".to_string(), profile.skills.clone());
        }
        let projects = if include_projects {
            profile
                .projects
                .iter()
                .map(|p| PortfolioProject {
                    name: p.clone(),
                    ..Default::default()
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            headline,
            about,
            skills_categories,
            projects,
            achievements: profile.certifications.clone(),
            cta: "Let's work together on your next project.".to_string(),
        }
    }
}

pub struct PortfolioRequestOptions<'a> {
    pub layout: Option<&'a str>,
    pub color_scheme: Option<&'a str>,
    pub include_projects: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioOutput {
    pub document: GeneratedDocument,
    pub content: PortfolioContent,
    /// False when the LLM answer could not be parsed and the profile was used instead.
    pub ai_generated: bool,
}

pub async fn generate_portfolio(
    llm: &LlmClient,
    profile: &UserProfile,
    options: PortfolioRequestOptions<'_>,
) -> Result<PortfolioOutput, LlmError> {
    let scheme = resolve_scheme(options.color_scheme);
    let (layout, _) = resolve_layout(options.layout);
    let projects_instruction = if options.include_projects {
        "3-4 realistic project examples based on the candidate's skills"
    } else {
        "No projects: return an empty projects array"
    };

    let system = format!("{PORTFOLIO_SYSTEM}{JSON_ONLY_SUFFIX}");
    let prompt = fill_template(
        PORTFOLIO_PROMPT,
        &[
            ("style", layout),
            ("color_scheme", scheme.name),
            ("projects_instruction", projects_instruction),
            ("candidate", &candidate_block(profile, None)),
        ],
    );

    let (mut content, ai_generated) = match llm
        .chat_json::<PortfolioContent>(&system, &prompt, PORTFOLIO_OPTIONS)
        .await
    {
        Ok(content) => (content, true),
        Err(e) if e.is_unusable_output() => {
            warn!("Portfolio answer unusable, building from profile: {e}");
            (PortfolioContent::from_profile(profile, options.include_projects), false)
        }
        Err(e) => return Err(e),
    };
    if !options.include_projects {
        content.projects.clear();
    }

    let html = render_html(profile, &content, scheme, layout);
    Ok(PortfolioOutput {
        document: GeneratedDocument::new(
            DocumentKind::Portfolio,
            format!("{layout} / {}", scheme.name),
            html,
        ),
        content,
        ai_generated,
    })
}

/// Renders a self-contained page. Every dynamic string goes through `html_escape`.
pub fn render_html(
    profile: &UserProfile,
    content: &PortfolioContent,
    scheme: &ColorScheme,
    layout: &str,
) -> String {
    let (_, layout_css) = resolve_layout(Some(layout));
    let name = html_escape(or_placeholder(&profile.name, "Your Name"));

    let mut skills = String::new();
    for (category, items) in &content.skills_categories {
        let _ = writeln!(
            skills,
            "<div class=\"card\"><h3>{}</h3><p>{}</p></div>",
            html_escape(category),
            html_escape(&items.join(", "))
        );
    }

    let mut projects = String::new();
    for project in &content.projects {
        let _ = writeln!(
            projects,
            "<div class=\"card\"><h3>{}</h3><p>{}</p><p class=\"tech\">{}</p></div>",
            html_escape(&project.name),
            html_escape(&project.description),
            html_escape(&project.tech.join(" · "))
        );
    }

    let achievements: String = content
        .achievements
        .iter()
        .map(|a| format!("<li>{}</li>\n", html_escape(a)))
        .collect();

    let mut contact = String::new();
    if !profile.email.trim().is_empty() {
        let email = html_escape(profile.email.trim());
        let _ = writeln!(contact, "<p>Email: <a href=\"mailto:{email}\">{email}</a></p>");
    }
    if !profile.phone.trim().is_empty() {
        let _ = writeln!(contact, "<p>Phone: {}</p>", html_escape(profile.phone.trim()));
    }
    let linkedin = profile.linkedin_url.trim();
    if !linkedin.is_empty() {
        let shown = html_escape(linkedin);
        match web_link(linkedin) {
            Some(url) => {
                let _ = writeln!(
                    contact,
                    "<p>LinkedIn: <a href=\"{}\">{shown}</a></p>",
                    html_escape(&url)
                );
            }
            None => {
                let _ = writeln!(contact, "<p>LinkedIn: {shown}</p>");
            }
        }
    }

    let projects_section = if projects.is_empty() {
        String::new()
    } else {
        format!("<section id=\"projects\" class=\"section\"><h2>Projects</h2><div class=\"grid\">\n{projects}</div></section>\n")
    };
    let achievements_section = if achievements.is_empty() {
        String::new()
    } else {
        format!("<section id=\"achievements\" class=\"section\"><h2>Achievements</h2><ul>\n{achievements}</ul></section>\n")
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{name} - Portfolio</title>
<style>
:root {{ --primary: {primary}; --secondary: {secondary}; --accent: {accent}; --text: {text}; --card-bg: {card_bg}; --section-bg: {section_bg}; }}
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: 'Segoe UI', -apple-system, sans-serif; line-height: 1.6; color: var(--text); background: {background}; background-attachment: fixed; }}
.hero {{ padding: 6rem 2rem 4rem; text-align: center; color: #ffffff; }}
.hero h1 {{ font-size: 3.5rem; }}
.section {{ max-width: 1100px; margin: 2rem auto; padding: 2.5rem; background: var(--section-bg); border-radius: 16px; }}
.section h2 {{ color: var(--primary); margin-bottom: 1.5rem; }}
.grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 1.5rem; }}
.card {{ background: var(--card-bg); padding: 1.5rem; border-radius: 12px; box-shadow: 0 8px 24px rgba(0,0,0,0.08); }}
.tech {{ color: var(--secondary); font-size: 0.9rem; margin-top: 0.5rem; }}
.cta {{ display: inline-block; margin-top: 1.5rem; padding: 0.8rem 2rem; border-radius: 40px; background: var(--accent); color: #111111; text-decoration: none; }}
{layout_css}
</style>
</head>
<body>
<section id="hero" class="hero">
<h1>{name}</h1>
<p>{headline}</p>
<a href="#contact" class="cta">Get In Touch</a>
</section>
<section id="about" class="section"><h2>About Me</h2><p>{about}</p></section>
<section id="skills" class="section"><h2>Skills &amp; Expertise</h2><div class="grid">
{skills}</div></section>
{projects_section}{achievements_section}<section id="contact" class="section"><h2>Contact</h2>
<p>{cta}</p>
{contact}</section>
</body>
</html>
"##,
        primary = scheme.primary,
        secondary = scheme.secondary,
        accent = scheme.accent,
        text = scheme.text,
        card_bg = scheme.card_bg,
        section_bg = scheme.section_bg,
        background = scheme.background,
        headline = html_escape(&content.headline),
        about = html_escape(&content.about),
        cta = html_escape(&content.cta),
    )
}

/// Only absolute http(s) URLs become links.
fn web_link(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
