use crate::demo::{run_audit, run_demo, run_estimate, AuditArgs, DemoArgs, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mileage::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mileage Compliance Auditor",
    about = "Reconcile odometer readings and audit trip logs from the command line",
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
    /// Audit the vehicles of a trip-log CSV export
    Audit(AuditArgs),
    /// Estimate a vehicle's odometer at a point in time
    Estimate(EstimateArgs),
    /// Run an end-to-end demo against a synthetic fleet
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Trip-log CSV export to preload as the record source
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Audit(args) => run_audit(args),
        Command::Estimate(args) => run_estimate(args),
        Command::Demo(args) => run_demo(args),
    }
}
