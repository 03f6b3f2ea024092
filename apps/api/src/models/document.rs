use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    Portfolio,
}

/// A generated career document. Lives only in the response that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub style: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedDocument {
    pub fn new(kind: DocumentKind, style: impl Into<String>, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            style: style.into(),
            content,
            created_at: Utc::now(),
        }
    }
}
