// Profile intake: resume text parsing, LinkedIn lookup and strength scoring.

pub mod handlers;
pub mod linkedin;
pub mod parser;
pub mod prompts;
pub mod strength;
