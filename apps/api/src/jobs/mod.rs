pub mod aggregator;
pub mod handlers;
pub mod insights;
pub mod matching;
pub mod parsers;
pub mod prompts;
pub mod salary;
pub mod sources;
pub mod text;
