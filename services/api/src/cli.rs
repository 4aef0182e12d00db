use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ftpr_intake::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "FTPR Intake",
    about = "Run and exercise the Failure To Pay Rent case intake service",
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
    /// Evaluate intake submissions offline
    Intake {
        #[command(subcommand)]
        command: IntakeCommand,
    },
    /// Walk through the reference intake scenarios against seeded data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum IntakeCommand {
    /// Decide a single submission and print the decision as JSON
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Tenant roster CSV to serve instead of the seeded demo catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Intake {
            command: IntakeCommand::Evaluate(args),
        } => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}
