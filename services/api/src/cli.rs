use crate::commands::{
    run_assess, run_rules_check, run_sanitize, AssessArgs, RulesCheckArgs, SanitizeArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mediguide::config::AppConfig;
use mediguide::error::AppError;
use mediguide::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "MediGuide",
    about = "Rule-based symptom triage service and command-line assessor",
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
    /// Score symptoms against the rule table and print the ranked conditions
    Assess(AssessArgs),
    /// Redact emails, phone numbers and long digit runs from text
    Sanitize(SanitizeArgs),
    /// Inspect the symptom rule file
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Validate a rule file without falling back to built-in rules
    Check(RulesCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured rule file
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => {
            let config = cli_config()?;
            run_assess(&config, args).await
        }
        Command::Sanitize(args) => run_sanitize(args),
        Command::Rules {
            command: RulesCommand::Check(args),
        } => {
            let config = cli_config()?;
            run_rules_check(&config, args)
        }
    }
}

fn cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_accepts_repeated_and_comma_separated_symptoms() {
        let cli = Cli::try_parse_from([
            "mediguide",
            "assess",
            "--symptom",
            "fever",
            "--symptom",
            "cough",
            "--symptoms",
            "headache, nausea",
            "--severity",
            "6",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.symptom, vec!["fever", "cough"]);
                assert_eq!(args.symptoms.as_deref(), Some("headache, nausea"));
                assert_eq!(args.severity, 6);
                assert!(!args.analyze);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["mediguide"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rules_check_takes_optional_path() {
        let cli = Cli::try_parse_from(["mediguide", "rules", "check", "custom.json"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Rules {
                command: RulesCommand::Check(args),
            }) => assert_eq!(args.path, Some(PathBuf::from("custom.json"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
