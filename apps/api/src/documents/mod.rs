// Document generation: resumes, cover letters, portfolio pages and PDF export,
// plus fit analysis against a job description.
// All LLM calls go through llm_client.

pub mod analysis;
pub mod cleaning;
pub mod cover_letter;
pub mod handlers;
pub mod impact;
pub mod pdf;
pub mod portfolio;
pub mod prompts;
pub mod resume;
