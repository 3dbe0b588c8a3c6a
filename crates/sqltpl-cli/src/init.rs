use crate::cli::InitArgs;
use crate::config::ConfigFile;
use std::path::Path;

const STARTER_CONFIG: &str = r#"version = "1"

[render]
# Fail when a template has more placeholders than arguments.
strict_arity = false
# Truncate rendered SQL in log output (bytes).
max_logged_sql_length = 200

[templates]
# ?d integer, ?f float, ?a list or mapping, ?# identifiers, ? generic.
# `{...}` blocks are dropped when bound to skip() (`--skip-index N`).
user_by_id = "SELECT ?# FROM users WHERE user_id = ?d{ AND block = ?d}"
update_user = "UPDATE users SET ?a WHERE user_id = ?d"
"#;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("failed to create directory {}: {e}", parent.display())
        })?;
    }

    std::fs::write(path, STARTER_CONFIG)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_config_is_valid() {
        let file = ConfigFile::parse(STARTER_CONFIG).unwrap();
        assert_eq!(file.templates.len(), 2);
        for template in file.templates.values() {
            assert!(sqltpl::Template::parse(template.as_str()).is_ok());
        }
    }

    #[test]
    fn refuses_to_overwrite() {
        let path = std::env::temp_dir().join(format!("sqltpl-init-{}.toml", std::process::id()));
        std::fs::write(&path, "x").unwrap();
        assert!(write_template(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = std::env::temp_dir().join(format!("sqltpl-init-dir-{}", std::process::id()));
        let path = dir.join("nested").join("sqltpl.toml");
        write_template(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), STARTER_CONFIG);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
