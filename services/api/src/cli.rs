use crate::demo::{run_demo, run_optimize, DemoArgs, OptimizeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use plan_bundler::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Plan Bundler",
    about = "Recommend health plan bundles for employee groups from the command line",
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
    /// Run a single optimization request read from a JSON file
    Optimize(OptimizeArgs),
    /// Walk through a two-group optimization against the bundled sample catalog
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Optimize(args) => run_optimize(args),
        Command::Demo(args) => run_demo(args),
    }
}
