use serde::Deserialize;
use sqltpl::QueryBuilderConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `config_path`.
    ///
    /// A missing file yields built-in defaults unless `explicit` is set.
    pub fn load(config_path: &Path, explicit: bool) -> anyhow::Result<Self> {
        if !explicit && !config_path.exists() {
            return Ok(Self {
                config_path: config_path.to_path_buf(),
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to load config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            file,
        })
    }

    pub fn template(&self, name: &str) -> anyhow::Result<&str> {
        self.file
            .templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown template name: {name} (not in [templates] of {})",
                    self.config_path.display()
                )
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            render: RenderConfig::default(),
            templates: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub strict_arity: bool,
    #[serde(default = "default_max_logged_sql_length")]
    pub max_logged_sql_length: Option<usize>,
}

fn default_max_logged_sql_length() -> Option<usize> {
    Some(200)
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strict_arity: false,
            max_logged_sql_length: default_max_logged_sql_length(),
        }
    }
}

impl RenderConfig {
    pub fn to_builder_config(&self) -> QueryBuilderConfig {
        let mut config = QueryBuilderConfig::new();
        if self.strict_arity {
            config = config.with_strict_arity();
        }
        match self.max_logged_sql_length {
            Some(len) => config.with_max_logged_sql_length(len),
            None => config.no_truncate(),
        }
    }
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        for template in self.templates.values_mut() {
            *template = expand_env_vars(template)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        self.render.to_builder_config().validate()?;

        for (name, template) in &self.templates {
            if name.trim().is_empty() {
                anyhow::bail!("templates keys must not be empty");
            }
            if template.is_empty() {
                anyhow::bail!("template must not be empty: {name}");
            }
        }

        Ok(())
    }
}

/// Expand `${NAME}` references where NAME is `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Any other `${` is kept as is: templates use `{...}` for blocks, so `?${ AND x = ?d}`
/// is a placeholder followed by a block.
fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];

        match env_var_name(after) {
            Some(key) => {
                let v = std::env::var(key)
                    .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
                out.push_str(&v);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('$');
                rest = &rest[pos + 1..];
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// The identifier at the start of `s` if it is directly followed by `}`.
fn env_var_name(s: &str) -> Option<&str> {
    let end = s.find('}')?;
    let key = &s[..end];
    let mut chars = key.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let file = ConfigFile::parse(
            r#"
version = "1"

[render]
strict_arity = true
max_logged_sql_length = 80

[templates]
by_id = "SELECT * FROM users WHERE id = ?d"
"#,
        )
        .unwrap();

        assert!(file.render.strict_arity);
        assert_eq!(file.render.max_logged_sql_length, Some(80));
        assert_eq!(
            file.templates.get("by_id").map(String::as_str),
            Some("SELECT * FROM users WHERE id = ?d")
        );

        let config = file.render.to_builder_config();
        assert!(config.strict_arity);
        assert_eq!(config.max_logged_sql_length, Some(80));
    }

    #[test]
    fn render_section_is_optional() {
        let file = ConfigFile::parse("version = \"1\"\n").unwrap();
        assert!(!file.render.strict_arity);
        assert_eq!(file.render.max_logged_sql_length, Some(200));
        assert!(file.templates.is_empty());
    }

    #[test]
    fn rejects_unknown_version() {
        assert!(ConfigFile::parse("version = \"2\"\n").is_err());
    }

    #[test]
    fn rejects_zero_log_length() {
        let raw = "version = \"1\"\n[render]\nmax_logged_sql_length = 0\n";
        assert!(ConfigFile::parse(raw).is_err());
    }

    #[test]
    fn rejects_empty_template() {
        let raw = "version = \"1\"\n[templates]\nnothing = \"\"\n";
        assert!(ConfigFile::parse(raw).is_err());
    }

    #[test]
    fn expands_env_in_templates() {
        // PATH is set in every test environment.
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("a ${PATH} b").unwrap(), format!("a {path} b"));
        assert!(expand_env_vars("${SQLTPL_SURELY_UNSET_VAR}").is_err());
    }

    #[test]
    fn non_identifier_references_stay_literal() {
        assert_eq!(expand_env_vars("${UNTERMINATED").unwrap(), "${UNTERMINATED");
        assert_eq!(expand_env_vars("${}").unwrap(), "${}");
        assert_eq!(expand_env_vars("$ {PATH}").unwrap(), "$ {PATH}");
        assert_eq!(expand_env_vars("${1X}").unwrap(), "${1X}");
        assert_eq!(expand_env_vars("cost$").unwrap(), "cost$");
    }

    #[test]
    fn dollar_before_block_is_not_an_env_reference() {
        let raw = r#"
version = "1"

[templates]
r = "SELECT x FROM t WHERE c = ?${ AND y = ?d}"
"#;
        let file = ConfigFile::parse(raw).unwrap();
        assert_eq!(
            file.templates.get("r").map(String::as_str),
            Some("SELECT x FROM t WHERE c = ?${ AND y = ?d}")
        );
    }

    #[test]
    fn missing_default_file_uses_defaults() {
        let cfg = ProjectConfig::load(Path::new("does/not/exist/sqltpl.toml"), false).unwrap();
        assert_eq!(cfg.file.version, "1");
        assert!(ProjectConfig::load(Path::new("does/not/exist/sqltpl.toml"), true).is_err());
    }
}
