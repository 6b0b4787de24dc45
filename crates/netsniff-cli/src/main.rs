use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use netsniff_cli::OutputFormat;
use netsniff_cli::commands;
use netsniff_core::CreatorInfo;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netsniff")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Build HTTP Archive (HAR) files from captured page loads",
    long_about = "netsniff turns the request, reply and error events recorded while a page \
                  loads into a HAR 1.2 archive that HAR viewers and analyzers understand."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for reports
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a capture file into a HAR archive
    Convert {
        /// Path to the capture file (JSON with `page` and `resources`)
        #[arg(value_name = "CAPTURE")]
        file: PathBuf,

        /// Write the HAR to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,

        /// Name recorded as the HAR creator
        #[arg(long, env = "NETSNIFF_CREATOR_NAME", default_value = "netsniff")]
        creator_name: String,

        /// Version recorded as the HAR creator
        #[arg(long, env = "NETSNIFF_CREATOR_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
        creator_version: String,
    },

    /// Check that a HAR file is well-formed and summarize its entries
    Validate {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            file,
            output,
            compact,
            creator_name,
            creator_version,
        } => commands::convert::execute(
            &file,
            output,
            compact,
            CreatorInfo::new(creator_name, creator_version),
        ),
        Commands::Validate { file } => commands::validate::execute(&file, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("netsniff=debug,netsniff_cli=debug,netsniff_core=debug")
    } else {
        EnvFilter::new("netsniff=info,netsniff_cli=info,netsniff_core=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
