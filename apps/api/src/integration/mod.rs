//! Keyword integration engine: guided single-bullet edits that weave target keywords
//! into resume text without disturbing any other line.

pub mod apply;
pub mod fallback;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod rewrite;
pub mod session;
pub mod store;
