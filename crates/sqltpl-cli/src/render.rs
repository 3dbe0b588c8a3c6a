use crate::cli::{RenderArgs, TemplateArgs, TemplateSource};
use crate::config::ProjectConfig;
use sqltpl::{Arg, BuildQuery, QueryBuilder, Template, TypeTag};
use std::path::Path;
use tracing::debug;

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(&args.template.config, args.template.config_explicit)?;
    let template = load_template(&project, &args.template.source)?;

    let mut render_config = project.file.render.to_builder_config();
    if args.strict {
        render_config = render_config.with_strict_arity();
    }
    let qb = QueryBuilder::with_config(render_config)?;

    let raw_args = match (&args.args_json, &args.args_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => read_file(path)?,
        (None, None) => "[]".to_string(),
    };
    let mut values = parse_args_json(&raw_args)?;
    apply_skips(&mut values, &args.skip_indexes, qb.skip());

    debug!(arg_count = values.len(), "rendering template");
    let sql = qb.render(&template, &values)?;
    println!("{sql}");
    Ok(())
}

pub fn inspect(args: TemplateArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(&args.config, args.config_explicit)?;
    let template = load_template(&project, &args.source)?;

    for p in template.placeholders() {
        println!(
            "{}\t{}\t{}\t{}..{}",
            p.index,
            tag_marker(p.tag),
            p.tag.name(),
            p.start,
            p.end
        );
    }
    Ok(())
}

fn load_template(project: &ProjectConfig, source: &TemplateSource) -> anyhow::Result<Template> {
    let text = match source {
        TemplateSource::Inline(text) => text.clone(),
        TemplateSource::File(path) => read_file(path)?,
        TemplateSource::Named(name) => project.template(name)?.to_string(),
    };
    Ok(Template::parse(text)?)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))
}

fn parse_args_json(raw: &str) -> anyhow::Result<Vec<Arg>> {
    serde_json::from_str::<Vec<Arg>>(raw)
        .map_err(|e| anyhow::anyhow!("arguments must be a JSON array: {e}"))
}

/// Put `skip` at every index in `indexes`, padding with nulls as needed.
fn apply_skips(values: &mut Vec<Arg>, indexes: &[usize], skip: Arg) {
    for &index in indexes {
        if values.len() <= index {
            values.resize(index + 1, Arg::Null);
        }
        values[index] = skip.clone();
    }
}

/// Render a placeholder tag the way it appears in templates.
fn tag_marker(tag: TypeTag) -> String {
    tag.as_char().map_or_else(|| "?".to_string(), |c| format!("?{c}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_json_must_be_an_array() {
        assert_eq!(parse_args_json("[1, \"a\"]").unwrap().len(), 2);
        assert!(parse_args_json("{\"a\": 1}").is_err());
        assert!(parse_args_json("nope").is_err());
    }

    #[test]
    fn skips_pad_missing_positions() {
        let mut values = vec![Arg::Int(5)];
        apply_skips(&mut values, &[2], sqltpl::skip());
        assert_eq!(values, vec![Arg::Int(5), Arg::Null, Arg::Int(0)]);
    }

    #[test]
    fn skips_overwrite_existing_positions() {
        let mut values = vec![Arg::Int(5), Arg::Int(6)];
        apply_skips(&mut values, &[0], sqltpl::skip());
        assert_eq!(values[0], sqltpl::skip());
        assert_eq!(values[1], Arg::Int(6));
    }

    #[test]
    fn inline_template_loads() {
        let project = ProjectConfig::load(Path::new("missing/sqltpl.toml"), false).unwrap();
        let t = load_template(&project, &TemplateSource::Inline("?d".to_string())).unwrap();
        assert_eq!(t.placeholder_count(), 1);
    }

    #[test]
    fn unknown_named_template_fails() {
        let project = ProjectConfig::load(Path::new("missing/sqltpl.toml"), false).unwrap();
        assert!(load_template(&project, &TemplateSource::Named("nope".to_string())).is_err());
    }
}
