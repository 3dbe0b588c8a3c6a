use crate::config::QueryBuilderConfig;
use crate::error::TplResult;
use crate::template::{SKIP_SENTINEL, Template};
use crate::trace::RenderEvent;
use crate::value::Arg;

/// Something that turns a template and positional arguments into literal SQL.
///
/// The rendered string is handed to whatever driver executes it; this crate
/// never talks to a database.
pub trait BuildQuery {
    /// Render `template` with `args`.
    fn build_query(&self, template: &str, args: &[Arg]) -> TplResult<String>;

    /// The argument that drops the conditional block it is bound in.
    fn skip(&self) -> Arg {
        Arg::Int(SKIP_SENTINEL)
    }
}

/// Configurable [`BuildQuery`] implementation.
///
/// # Example
/// ```ignore
/// use sqltpl::{args, BuildQuery, QueryBuilder, QueryBuilderConfig};
///
/// let qb = QueryBuilder::with_config(QueryBuilderConfig::new().with_strict_arity())?;
/// let sql = qb.build_query(
///     "UPDATE users SET ?a WHERE user_id = ?d",
///     &args![sqltpl::Arg::map([("name", "Jack")]), 1],
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: QueryBuilderConfig,
}

impl QueryBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a validated configuration.
    pub fn with_config(config: QueryBuilderConfig) -> TplResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &QueryBuilderConfig {
        &self.config
    }

    /// Render an already parsed template.
    pub fn render(&self, template: &Template, args: &[Arg]) -> TplResult<String> {
        let event = self.event(template.as_str(), template.placeholder_count(), args);
        match template.render_with(args, self.config.arity()) {
            Ok(resolved) => {
                event.rendered(&resolved);
                Ok(resolved.sql)
            }
            Err(err) => {
                event.rejected(&err);
                Err(err)
            }
        }
    }

    fn event<'a>(
        &self,
        template: &'a str,
        placeholder_count: usize,
        args: &'a [Arg],
    ) -> RenderEvent<'a> {
        RenderEvent {
            placeholder_count,
            args,
            max_sql_length: self.config.max_logged_sql_length,
            template,
        }
    }
}

impl BuildQuery for QueryBuilder {
    fn build_query(&self, template: &str, args: &[Arg]) -> TplResult<String> {
        let parsed = Template::parse(template)
            .inspect_err(|err| self.event(template, 0, args).rejected(err))?;
        self.render(&parsed, args)
    }
}
