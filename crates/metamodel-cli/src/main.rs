mod cmd_inspect;
mod cmd_reshape;
mod input;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "metamodel")]
#[command(about = "Reshape JSON:API documents through a deduplicated resource graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log graph construction at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the graph and print the re-projected document
    Reshape(cmd_reshape::ReshapeArgs),
    /// Build the graph and print a summary of its resources
    Inspect {
        /// Input file (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Refuse documents that materialize more resources than this
        #[arg(long)]
        max_resources: Option<usize>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Reshape(args) => cmd_reshape::run(args, cli.pretty),
        Commands::Inspect {
            input,
            max_resources,
        } => cmd_inspect::run(input, max_resources, cli.pretty),
    }
}
