use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "sqltpl.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
    Inspect,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
    Inspect(TemplateArgs),
    Init(InitArgs),
}

/// Where the template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
    Named(String),
}

#[derive(Debug, Clone)]
pub struct TemplateArgs {
    pub config: PathBuf,
    /// `--config` was given; a missing file is then an error.
    pub config_explicit: bool,
    pub source: TemplateSource,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub template: TemplateArgs,
    pub args_json: Option<String>,
    pub args_file: Option<PathBuf>,
    pub skip_indexes: Vec<usize>,
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "render" => parse_render(it.map(|s| s.as_str())),
        "inspect" => parse_inspect(it.map(|s| s.as_str())),
        "init" => parse_init(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Options shared by `render` and `inspect`.
#[derive(Default)]
struct TemplateOpts {
    config: Option<PathBuf>,
    source: Option<TemplateSource>,
    verbose: bool,
}

impl TemplateOpts {
    fn set_source(&mut self, source: TemplateSource) -> anyhow::Result<()> {
        if self.source.is_some() {
            anyhow::bail!("only one of --template, --file, --name may be given");
        }
        self.source = Some(source);
        Ok(())
    }

    /// Consume `token` if it is a shared option. Returns `false` if not recognized.
    fn accept<'a>(
        &mut self,
        token: &'a str,
        it: &mut impl Iterator<Item = &'a str>,
    ) -> anyhow::Result<bool> {
        match token {
            "--config" => self.config = Some(PathBuf::from(require_value(token, it)?)),
            _ if token.starts_with("--config=") => {
                self.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "-t" | "--template" => {
                let v = require_value(token, it)?;
                self.set_source(TemplateSource::Inline(v.to_string()))?;
            }
            _ if token.starts_with("--template=") => {
                let v = token.trim_start_matches("--template=");
                self.set_source(TemplateSource::Inline(v.to_string()))?;
            }
            "-f" | "--file" => {
                let v = require_value(token, it)?;
                self.set_source(TemplateSource::File(PathBuf::from(v)))?;
            }
            _ if token.starts_with("--file=") => {
                let v = token.trim_start_matches("--file=");
                self.set_source(TemplateSource::File(PathBuf::from(v)))?;
            }
            "-n" | "--name" => {
                let v = require_value(token, it)?;
                self.set_source(TemplateSource::Named(v.to_string()))?;
            }
            _ if token.starts_with("--name=") => {
                let v = token.trim_start_matches("--name=");
                self.set_source(TemplateSource::Named(v.to_string()))?;
            }
            "-v" | "--verbose" => self.verbose = true,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> anyhow::Result<TemplateArgs> {
        let Some(source) = self.source else {
            anyhow::bail!("missing template: expected --template, --file or --name");
        };
        Ok(TemplateArgs {
            config_explicit: self.config.is_some(),
            config: self.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG)),
            source,
            verbose: self.verbose,
        })
    }
}

fn require_value<'a>(flag: &str, it: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<&'a str> {
    let Some(v) = it.next() else {
        anyhow::bail!("{flag} requires a value");
    };
    Ok(v)
}

fn parse_index(v: &str) -> anyhow::Result<usize> {
    v.trim()
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("--skip-index expects a non-negative integer, got: {v}"))
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut opts = TemplateOpts::default();
    let mut args_json: Option<String> = None;
    let mut args_file: Option<PathBuf> = None;
    let mut skip_indexes: Vec<usize> = Vec::new();
    let mut strict = false;

    while let Some(token) = it.next() {
        if opts.accept(token, &mut it)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "-a" | "--args" => args_json = Some(require_value(token, &mut it)?.to_string()),
            _ if token.starts_with("--args=") => {
                args_json = Some(token.trim_start_matches("--args=").to_string());
            }
            "--args-file" => args_file = Some(PathBuf::from(require_value(token, &mut it)?)),
            _ if token.starts_with("--args-file=") => {
                args_file = Some(PathBuf::from(token.trim_start_matches("--args-file=")));
            }
            "--skip-index" => skip_indexes.push(parse_index(require_value(token, &mut it)?)?),
            _ if token.starts_with("--skip-index=") => {
                skip_indexes.push(parse_index(token.trim_start_matches("--skip-index="))?);
            }
            "--strict" => strict = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if args_json.is_some() && args_file.is_some() {
        anyhow::bail!("only one of --args, --args-file may be given");
    }

    Ok(Command::Render(RenderArgs {
        template: opts.finish()?,
        args_json,
        args_file,
        skip_indexes,
        strict,
    }))
}

fn parse_inspect<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut opts = TemplateOpts::default();

    while let Some(token) = it.next() {
        if opts.accept(token, &mut it)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Inspect)),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Inspect(opts.finish()?))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "--config" => config = PathBuf::from(require_value(token, &mut it)?),
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqltpl - render SQL query templates

USAGE:
  sqltpl <COMMAND> [OPTIONS]

COMMANDS:
  render        Render a template with positional arguments
  inspect       List the placeholders of a template
  init          Write a starter sqltpl.toml

Run `sqltpl <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  sqltpl render (--template <SQL> | --file <FILE> | --name <NAME>) [OPTIONS]

TEMPLATE OPTIONS:
  -t, --template <SQL>  Inline template text
  -f, --file <FILE>     Read the template from a file
  -n, --name <NAME>     Use a named template from the config [templates] table
  --config <FILE>       Config file path (default: sqltpl.toml)

RENDER OPTIONS:
  -a, --args <JSON>     Positional arguments as a JSON array
  --args-file <FILE>    Read the JSON argument array from a file
  --skip-index <N>      Bind skip() at argument position N (repeatable)
  --strict              Fail when there are fewer arguments than placeholders
  -v, --verbose         Log render events to stderr
  -h, --help            Print help"
            );
        }
        HelpTopic::Inspect => {
            println!(
                "\
USAGE:
  sqltpl inspect (--template <SQL> | --file <FILE> | --name <NAME>) [OPTIONS]

Prints one line per placeholder: index, tag, byte span.

OPTIONS:
  --config <FILE>       Config file path (default: sqltpl.toml)
  -v, --verbose         Log to stderr
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  sqltpl init [--config <FILE>]

Writes a starter config file. Refuses to overwrite an existing file."
            );
        }
    }
}
