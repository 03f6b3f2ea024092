// Career planning: long-range strategy, market potential and a learning path.

pub mod handlers;
pub mod planning;
pub mod prompts;
