mod commands;

use std::io;

use clap::{Args, Parser, Subcommand};
use flowchart::LayoutConfig;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layout config: {0}")]
    Config(#[from] flowchart::ConfigError),
    #[error("{count} statement(s) could not be parsed")]
    Malformed { count: usize },
}

#[derive(Parser, Debug)]
#[command(name = "mmdflow", about = "Parse, lay out, and reformat Mermaid flowcharts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed node/edge graph as JSON.
    Parse(ParseArgs),
    /// Print positioned object descriptors as JSON.
    Layout(LayoutArgs),
    /// Report statements that could not be parsed.
    Check(InputArgs),
    /// Print the flowchart as normalized Mermaid text.
    Fmt(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(long, env = "MMDFLOW_INPUT", default_value = "-", help = "Input file path, or - for stdin")]
    input: String,
}

#[derive(Args, Debug)]
struct ParseArgs {
    #[command(flatten)]
    source: InputArgs,

    #[arg(long, default_value_t = false, help = "Emit single-line JSON")]
    compact: bool,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    source: InputArgs,

    #[arg(long, env = "MMDFLOW_ORIGIN_X", default_value_t = 0.0, allow_negative_numbers = true)]
    origin_x: f64,

    #[arg(long, env = "MMDFLOW_ORIGIN_Y", default_value_t = 0.0, allow_negative_numbers = true)]
    origin_y: f64,

    #[arg(long, env = "MMDFLOW_SCALE", default_value_t = 1.0)]
    scale: f64,

    #[arg(long, default_value_t = false, help = "Emit single-line JSON")]
    compact: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Parse(args) => {
            let text = commands::read_input(&args.source.input)?;
            commands::run_parse(&text, args.compact, &mut out)
        }
        Command::Layout(args) => {
            let text = commands::read_input(&args.source.input)?;
            let config = LayoutConfig::from_env()?;
            let placement = commands::Placement { origin_x: args.origin_x, origin_y: args.origin_y, scale: args.scale };
            commands::run_layout(&text, &config, placement, args.compact, &mut out)
        }
        Command::Check(args) => {
            let text = commands::read_input(&args.input)?;
            commands::run_check(&text, &mut out)
        }
        Command::Fmt(args) => {
            let text = commands::read_input(&args.input)?;
            commands::run_fmt(&text, &mut out)
        }
    }
}
