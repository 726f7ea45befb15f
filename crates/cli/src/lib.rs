pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use leadflow_core::config::LoadOptions;
use std::process::ExitCode;

use commands::signup::SignupArgs;
use commands::validate::DraftArgs;

#[derive(Debug, Parser)]
#[command(
    name = "leadflow",
    about = "Lead signup workflow CLI",
    long_about = "Validate signup drafts, run the create/convert/enrich workflow against the CRM, and inspect configuration.",
    after_help = "Examples:\n  leadflow validate --name 'Mariam Khan' --email mariam@example.ae --phone 0501234567 --region Dubai\n  leadflow signup --name 'Mariam Khan' --email mariam@example.ae --phone 0501234567 --region Dubai\n  leadflow config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Check a signup draft locally without contacting any service")]
    Validate(DraftArgs),
    #[command(about = "Create a lead and, unless cancelled, convert it and report the summary")]
    Signup(SignupArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let load_options = match &cli.command {
        Command::Signup(args) => args.load_options(),
        Command::Validate(_) | Command::Config => LoadOptions::default(),
    };
    logging::init(&logging::config_for(load_options));

    let result = match cli.command {
        Command::Validate(args) => commands::validate::run(&args),
        Command::Signup(args) => commands::signup::run(&args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
