//! Post-processing for LLM-written documents: removes meta-commentary and
//! markdown so the text can go straight into a letter frame or a PDF.

use crate::profile::parser::EMAIL_RE;

/// Lines starting with one of these are the model talking about its output.
const COMMENTARY_PREFIXES: &[&str] = &[
    "here's an enhanced",
    "here's a professional",
    "here's your",
    "here is your",
    "here is an",
    "i hope this enhanced",
    "i hope this helps",
    "hope this helps",
    "let me know if",
    "feel free to reach out",
    "i've created",
    "i've tailored",
    "i've enhanced",
    "note that this",
    "please note",
    "the enhanced version",
    "this enhanced version",
    "this version incorporates",
    "the following incorporates",
    "generated by ai",
    "enhanced by ai",
    "optimized by ai",
];

/// Closing chatter that has no place inside a resume body.
const RESUME_ONLY_PREFIXES: &[&str] = &[
    "this resume",
    "the resume above",
    "the enhanced resume",
    "this tailored resume",
    "references available",
    "available upon request",
    "thank you for considering",
    "should you require",
    "if you have any questions",
];

const COVER_LETTER_ONLY_PREFIXES: &[&str] = &[
    "this cover letter",
    "this enhanced cover letter",
    "the enhanced cover letter",
    "this letter incorporates",
    "this letter leverages",
];

/// Cleans a generated resume. Lines with e-mail addresses are dropped too,
/// since the rendered header already carries the contact block.
pub fn clean_resume(content: &str) -> String {
    clean(content, RESUME_ONLY_PREFIXES, true)
}

pub fn clean_cover_letter(content: &str) -> String {
    clean(content, COVER_LETTER_ONLY_PREFIXES, false)
}

fn clean(content: &str, extra_prefixes: &[&str], drop_emails: bool) -> String {
    content
        .lines()
        .filter_map(|raw| {
            let line = raw.trim();
            if line.is_empty() || (drop_emails && EMAIL_RE.is_match(line)) {
                return None;
            }
            let lower = line.to_lowercase().replace('\u{2019}', "'");
            if COMMENTARY_PREFIXES
                .iter()
                .chain(extra_prefixes)
                .any(|p| lower.starts_with(p))
            {
                return None;
            }
            let line = strip_markdown(line);
            (line.chars().count() > 3).then_some(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes headings, emphasis and rules; `* ` and `- ` list markers become `• `.
fn strip_markdown(line: &str) -> String {
    if line.chars().all(|c| matches!(c, '-' | '*' | '_' | '=')) {
        return String::new();
    }
    let line = line.trim_start_matches('#').trim_start();
    let (bullet, rest) = match line
        .strip_prefix("* ")
        .or_else(|| line.strip_prefix("- "))
    {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let rest = rest.replace("**", "").replace(['*', '`'], "");
    let rest = rest.trim();
    if bullet {
        format!("• {rest}")
    } else {
        rest.to_string()
    }
}
