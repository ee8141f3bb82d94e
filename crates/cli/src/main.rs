mod cmd;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{PartArgs, StepArg};
use output::OutputFormat;

/// charmpoetry - poetry part plugin with charm packaging conventions
#[derive(Parser)]
#[command(name = "charmpoetry")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(flatten)]
  part: PartArgs,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the build environment
  Env {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print the system packages needed at build time
  Packages {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the pull and build commands without running them
  Plan {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print the shell script for one step
  Script {
    /// Step to render
    #[arg(value_enum)]
    step: StepArg,
  },

  /// Run the pull and build steps
  Run {
    /// Render the steps without executing them
    #[arg(long)]
    dry_run: bool,

    /// Shell used to run step scripts (default: /bin/sh)
    #[arg(long)]
    shell: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Env { output } => cmd::cmd_env(&cli.part, output),
    Commands::Packages { output } => cmd::cmd_packages(&cli.part, output),
    Commands::Plan { output } => cmd::cmd_plan(&cli.part, output),
    Commands::Script { step } => cmd::cmd_script(&cli.part, step.into()),
    Commands::Run {
      dry_run,
      shell,
      output,
    } => cmd::cmd_run(&cli.part, dry_run, shell, output),
  }
}
