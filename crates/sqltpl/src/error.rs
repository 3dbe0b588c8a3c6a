//! Error types for sqltpl

use thiserror::Error;

/// Result type alias for sqltpl operations
pub type TplResult<T> = Result<T, TplError>;

/// Error types for template rendering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TplError {
    /// The template string was empty
    #[error("Empty query template")]
    EmptyTemplate,

    /// A brace was left over after conditional blocks were resolved.
    ///
    /// `position` is the byte offset of the first offending brace in the
    /// placeholder-expanded text.
    #[error("Nested or unbalanced conditional block at byte {position}")]
    NestedCondition { position: usize },

    /// Fewer arguments than placeholders (strict arity only)
    #[error("Missing argument for placeholder #{index}")]
    MissingArgument { index: usize },

    /// Invalid builder configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl TplError {
    /// Create a nesting error pointing at `position`
    pub fn nested(position: usize) -> Self {
        Self::NestedCondition { position }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an empty template error
    pub fn is_empty_template(&self) -> bool {
        matches!(self, Self::EmptyTemplate)
    }

    /// Check if this is a nested/unbalanced block error
    pub fn is_nested_condition(&self) -> bool {
        matches!(self, Self::NestedCondition { .. })
    }

    /// Check if this is a missing argument error
    pub fn is_missing_argument(&self) -> bool {
        matches!(self, Self::MissingArgument { .. })
    }
}
