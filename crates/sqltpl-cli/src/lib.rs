mod cli;
mod config;
mod init;
mod render;

use tracing_subscriber::EnvFilter;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Render(args) => {
            init_logging(args.template.verbose);
            render::run(args)
        }
        cli::Command::Inspect(args) => {
            init_logging(args.verbose);
            render::inspect(args)
        }
        cli::Command::Init(args) => init::run(args),
    }
}

/// Log to stderr so rendered SQL on stdout stays pipeable.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "sqltpl=debug,sqltpl_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
