//! Mock interview simulator: a fixed-length question set per session, one
//! LLM evaluation per answer, and a report over the evaluations.

pub mod coaching;
pub mod evaluation;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod session;
