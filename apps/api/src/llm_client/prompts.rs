// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use crate::models::profile::UserProfile;

/// System prompt suffix that enforces JSON-only output.
pub const JSON_ONLY_SUFFIX: &str = " Always return valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT include explanations or apologies.";

/// Instruction appended to free-text document prompts so output needs less cleaning.
pub const NO_COMMENTARY_INSTRUCTION: &str = "\
    Return ONLY the document text. Do not add an introduction, a closing note, \
    markdown formatting, or commentary about how the document was written.";

/// Renders the candidate block shared by resume, cover letter, portfolio and interview prompts.
/// `max_skills` caps the skill list for short prompts.
pub fn candidate_block(profile: &UserProfile, max_skills: Option<usize>) -> String {
    let skills: Vec<&str> = profile
        .skills
        .iter()
        .map(String::as_str)
        .take(max_skills.unwrap_or(usize::MAX))
        .collect();

    format!(
        "Name: {}\nTitle: {}\nSkills: {}\nExperience: {}\nEducation: {}",
        or_placeholder(&profile.name, "Candidate"),
        or_placeholder(&profile.title, "Professional"),
        skills.join(", "),
        or_placeholder(&profile.experience, "Professional experience"),
        or_placeholder(&profile.education, "Educational background"),
    )
}

/// Fills `{name}` placeholders in one left-to-right pass. Substituted values are
/// never rescanned, so braces inside user or scraped text stay literal.
/// Unknown placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let key = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|key| !key.contains('{'));
        match key.and_then(|key| values.iter().find(|(k, _)| *k == key).map(|(_, v)| (key, v))) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_block_uses_placeholders() {
        let block = candidate_block(&UserProfile::default(), None);
        assert!(block.contains("Name: Candidate"));
        assert!(block.contains("Title: Professional"));
    }

    #[test]
    fn test_fill_template_single_pass() {
        let prompt = fill_template(
            "Role at {company}. Notes: {notes}. Candidate: {candidate}",
            &[
                ("company", "Acme {candidate}"),
                ("notes", "uses {json} and {"),
                ("candidate", "Ada"),
            ],
        );
        assert_eq!(
            prompt,
            "Role at Acme {candidate}. Notes: uses {json} and {. Candidate: Ada"
        );
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        assert_eq!(
            fill_template("{\"score\": {n}} {missing", &[("n", "1")]),
            "{\"score\": 1} {missing"
        );
    }

    #[test]
    fn test_candidate_block_caps_skills() {
        let profile = UserProfile {
            skills: vec!["Rust".into(), "Go".into(), "SQL".into()],
            ..Default::default()
        };
        let block = candidate_block(&profile, Some(2));
        assert!(block.contains("Skills: Rust, Go\n"));
    }
}
