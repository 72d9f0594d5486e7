use crate::check::{run_check, CheckCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nonresident_filing::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Non-resident Filing",
    about = "Validate Spanish fiscal identifiers and serve the filing API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate a single identifier or an ownership table
    Check {
        #[command(subcommand)]
        command: CheckCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check { command } => run_check(command),
    }
}
