use crate::commands::{
    run_checkin, run_export, run_quiz_complete, run_quiz_questions, run_quiz_score, run_status,
    AnswersArgs, CheckinArgs, ExportArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use longevity_protocol::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Longevity Protocol",
    about = "Score the longevity diagnosis and track the daily protocol from the command line",
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
    /// Inspect, score or record the diagnosis quiz
    Quiz {
        #[command(subcommand)]
        command: QuizCommand,
    },
    /// Log daily check-ins and review protocol progress
    Protocol {
        #[command(subcommand)]
        command: ProtocolCommand,
    },
    /// Run an in-memory walkthrough from quiz to a few logged days
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QuizCommand {
    /// Print the quiz questions and their options
    Questions,
    /// Score answers without saving anything
    Score(AnswersArgs),
    /// Score answers, store the diagnosis and unlock the first protocol day
    Complete(AnswersArgs),
}

#[derive(Subcommand, Debug)]
enum ProtocolCommand {
    /// Update and save a day's check-in
    Checkin(CheckinArgs),
    /// Print the progress dashboard
    Status,
    /// Export saved days as CSV
    Export(ExportArgs),
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
        Command::Quiz { command } => match command {
            QuizCommand::Questions => run_quiz_questions(),
            QuizCommand::Score(args) => run_quiz_score(args),
            QuizCommand::Complete(args) => run_quiz_complete(args),
        },
        Command::Protocol { command } => match command {
            ProtocolCommand::Checkin(args) => run_checkin(args),
            ProtocolCommand::Status => run_status(),
            ProtocolCommand::Export(args) => run_export(args),
        },
        Command::Demo(args) => run_demo(args),
    }
}
