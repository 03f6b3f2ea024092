use serde::{Deserialize, Serialize};

/// A candidate profile extracted from an uploaded document or entered by hand.
///
/// Every field defaults to empty so partial LLM output and hand-written request
/// bodies deserialize without ceremony.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub location: String,
    pub summary: String,
    pub linkedin_url: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub projects: Vec<String>,
    pub certifications: Vec<String>,
}

impl UserProfile {
    /// The only field templates cannot do without.
    pub fn has_required_fields(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Trims strings and drops blank or duplicate list items (case-insensitive).
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.phone,
            &mut self.title,
            &mut self.location,
            &mut self.summary,
            &mut self.linkedin_url,
            &mut self.experience,
            &mut self.education,
        ] {
            *field = field.trim().to_string();
        }
        for list in [
            &mut self.skills,
            &mut self.projects,
            &mut self.certifications,
        ] {
            dedup_case_insensitive(list);
        }
        self
    }
}

fn dedup_case_insensitive(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain_mut(|item| {
        *item = item.trim().to_string();
        !item.is_empty() && seen.insert(item.to_lowercase())
    });
}
