use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use devscreen::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Developmental Screening Service",
    about = "Score questionnaire answers against the weighted classifier ensemble",
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
    /// Evaluate an answer set stored as JSON and print the report
    Evaluate(EvaluateArgs),
    /// Fill the questionnaire automatically and print the resulting report
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
    /// Directory holding questions.csv, units.csv, features.csv and models/
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["devscreen-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_seed_and_healthy_flags() {
        let cli = Cli::try_parse_from(["devscreen-api", "demo", "--seed", "7", "--healthy"])
            .expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.seed, Some(7));
                assert!(args.healthy);
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[test]
    fn evaluate_requires_an_answers_file() {
        assert!(Cli::try_parse_from(["devscreen-api", "evaluate"]).is_err());
        let cli = Cli::try_parse_from([
            "devscreen-api",
            "evaluate",
            "--answers",
            "answers.json",
            "--data-dir",
            "fixtures",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.answers, PathBuf::from("answers.json"));
                assert_eq!(args.data_dir, Some(PathBuf::from("fixtures")));
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }
}
