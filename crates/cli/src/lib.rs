pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "bundly",
    about = "Bundly operator CLI",
    long_about = "Operate Bundly migrations, demo fixtures, and smoke validation.",
    after_help = "Examples:\n  bundly migrate\n  bundly seed\n  bundly smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and household fixtures")]
    Seed,
    #[command(
        about = "Run end-to-end readiness checks, including a full engine pass, with timing details"
    )]
    Smoke,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Smoke => commands::smoke::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
