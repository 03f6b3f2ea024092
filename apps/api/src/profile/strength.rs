use serde::{Deserialize, Serialize};

use crate::documents::impact::validate_impact;
use crate::models::profile::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStrengthReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

const SECTION_WEIGHTS: &[(&str, f64)] = &[
    ("contact", 0.15),
    ("summary", 0.10),
    ("skills", 0.20),
    ("experience", 0.25),
    ("education", 0.15),
    ("projects", 0.10),
    ("certifications", 0.05),
];

const TARGET_SKILLS: f64 = 10.0;
const TARGET_PROJECTS: f64 = 3.0;
const TARGET_CERTIFICATIONS: f64 = 2.0;
const TARGET_EXPERIENCE_WORDS: f64 = 150.0;
const TARGET_EDUCATION_WORDS: f64 = 10.0;

pub fn profile_strength(profile: &UserProfile) -> ProfileStrengthReport {
    let mut sections = Vec::new();
    let mut weighted_score_sum = 0.0;
    let mut missing_sections = Vec::new();

    for (section_key, weight) in SECTION_WEIGHTS {
        let (score, mut recommendations) = score_section(section_key, profile);
        let score = score.clamp(0.0, 1.0);

        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s > 0.0 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };

        if status == SectionStatus::Missing {
            missing_sections.push(section_key.to_string());
            if recommendations.is_empty() {
                recommendations.push(format!(
                    "Add a {section_key} section to strengthen your profile"
                ));
            }
        }

        weighted_score_sum += score * weight;
        sections.push(SectionHealth {
            section: section_key.to_string(),
            score,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ProfileStrengthReport {
        overall_score,
        sections,
        missing_sections,
    }
}

fn score_section(section: &str, profile: &UserProfile) -> (f64, Vec<String>) {
    let mut recommendations = Vec::new();
    let score = match section {
        "contact" => {
            let fields = [
                ("name", &profile.name),
                ("email", &profile.email),
                ("phone", &profile.phone),
                ("location", &profile.location),
                ("LinkedIn URL", &profile.linkedin_url),
            ];
            let missing: Vec<&str> = fields
                .iter()
                .filter(|(_, v)| v.trim().is_empty())
                .map(|(k, _)| *k)
                .collect();
            if !missing.is_empty() {
                recommendations.push(format!("Add your {}", missing.join(", ")));
            }
            (fields.len() - missing.len()) as f64 / fields.len() as f64
        }
        "summary" => {
            let mut s = 0.0;
            if profile.title.trim().is_empty() {
                recommendations.push("Add a current or target job title".to_string());
            } else {
                s += 0.5;
            }
            if profile.summary.trim().is_empty() {
                recommendations
                    .push("Write a two or three sentence professional summary".to_string());
            } else {
                s += 0.5;
            }
            s
        }
        "skills" => {
            let count = profile.skills.len() as f64;
            if count < TARGET_SKILLS {
                recommendations.push(format!(
                    "List at least {TARGET_SKILLS} skills; you have {count}"
                ));
            }
            count / TARGET_SKILLS
        }
        "experience" => {
            let words = word_count(&profile.experience);
            if words == 0.0 {
                0.0
            } else {
                let quantified = validate_impact(&profile.experience).passed;
                if !quantified {
                    recommendations.push(
                        "Quantify your experience with numbers, percentages or time saved"
                            .to_string(),
                    );
                }
                if words < TARGET_EXPERIENCE_WORDS {
                    recommendations
                        .push("Describe your experience in more detail".to_string());
                }
                (words / TARGET_EXPERIENCE_WORDS).min(1.0) * 0.7
                    + if quantified { 0.3 } else { 0.0 }
            }
        }
        "education" => word_count(&profile.education) / TARGET_EDUCATION_WORDS,
        "projects" => {
            let count = profile.projects.len() as f64;
            if count > 0.0 && count < TARGET_PROJECTS {
                recommendations.push("Showcase at least three projects".to_string());
            }
            count / TARGET_PROJECTS
        }
        "certifications" => profile.certifications.len() as f64 / TARGET_CERTIFICATIONS,
        _ => 0.0,
    };
    (score, recommendations)
}

fn word_count(text: &str) -> f64 {
    text.split_whitespace().count() as f64
}
