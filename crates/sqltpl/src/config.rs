use crate::error::{TplError, TplResult};
use crate::template::Arity;

/// Configuration for [`QueryBuilder`](crate::QueryBuilder).
///
/// Defaults match the free [`build_query`](crate::build_query) function:
/// missing arguments bind null and logged SQL is cut at 200 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilderConfig {
    /// Fail when there are fewer arguments than placeholders.
    pub strict_arity: bool,
    /// Truncate rendered SQL in log events. `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            strict_arity: false,
            max_logged_sql_length: Some(200),
        }
    }
}

impl QueryBuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject renders that are short of arguments.
    pub fn with_strict_arity(mut self) -> Self {
        self.strict_arity = true;
        self
    }

    /// Set maximum SQL length in log events.
    pub fn with_max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Log rendered SQL in full.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> TplResult<()> {
        if self.max_logged_sql_length == Some(0) {
            return Err(TplError::config(
                "max_logged_sql_length must be greater than 0 (use no_truncate() to disable)",
            ));
        }
        Ok(())
    }

    pub(crate) fn arity(&self) -> Arity {
        if self.strict_arity {
            Arity::Strict
        } else {
            Arity::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient() {
        let config = QueryBuilderConfig::new();
        assert!(!config.strict_arity);
        assert_eq!(config.max_logged_sql_length, Some(200));
        assert_eq!(config.arity(), Arity::Lenient);
    }

    #[test]
    fn builder_methods_chain() {
        let config = QueryBuilderConfig::new()
            .with_strict_arity()
            .with_max_logged_sql_length(64);
        assert_eq!(config.arity(), Arity::Strict);
        assert_eq!(config.max_logged_sql_length, Some(64));
        assert_eq!(config.no_truncate().max_logged_sql_length, None);
    }

    #[test]
    fn zero_truncation_is_invalid() {
        let config = QueryBuilderConfig::new().with_max_logged_sql_length(0);
        assert!(matches!(config.validate(), Err(TplError::Config(_))));
        assert!(QueryBuilderConfig::new().validate().is_ok());
    }
}
