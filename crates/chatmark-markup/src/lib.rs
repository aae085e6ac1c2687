//! Safe rendering of a small markdown subset.
//!
//! Input is untrusted. HTML metacharacters are escaped first, then exactly four
//! inline constructs (bold, italic, inline code, link) are turned into tags,
//! then newlines become `<br/>`. Nested or overlapping constructs are not
//! handled; this is not a markdown parser.

pub mod engine;
pub mod rules;

pub use engine::{render, MarkupRenderer};
pub use rules::{default_rules, escape_rules, inline_rules, MarkupRule, RuleType};

use thiserror::Error;

/// Error type for building a renderer from rules.
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Invalid regex for rule '{rule}': {error}")]
    InvalidRegex { rule: String, error: String },

    #[error("Empty literal pattern for rule '{0}'")]
    EmptyPattern(String),
}

pub type MarkupResult<T> = std::result::Result<T, MarkupError>;
