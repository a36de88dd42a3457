use crate::demo::{render_check_in, render_outcome, render_score_report, render_summary};
use crate::infra::{open_engine, parse_answers, parse_task_status, LoggingRemoteSink};
use chrono::Utc;
use clap::Args;
use longevity_protocol::config::AppConfig;
use longevity_protocol::error::AppError;
use longevity_protocol::storage::InMemoryStore;
use longevity_protocol::workflows::diagnosis::question_bank;
use longevity_protocol::workflows::{EngineOptions, ProtocolEngine};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnswersArgs {
    /// Option indices in question order, e.g. `0,1,3,...` or `0130...`
    pub(crate) answers: String,
}

#[derive(Args, Debug)]
pub(crate) struct CheckinArgs {
    /// Day to log. Defaults to the current protocol day.
    #[arg(long)]
    pub(crate) day: Option<u32>,
    /// Task status as TASK=STATUS (pending, partial, not_done, completed). Repeatable.
    #[arg(long = "task")]
    pub(crate) tasks: Vec<String>,
    /// Energy rating from 1 to 10
    #[arg(long)]
    pub(crate) energy: Option<u8>,
    /// Mood rating from 1 to 10
    #[arg(long)]
    pub(crate) mood: Option<u8>,
    /// Advance to the next day after saving
    #[arg(long = "continue")]
    pub(crate) advance: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_quiz_questions() -> Result<(), AppError> {
    for question in question_bank() {
        let view = question.to_view();
        println!(
            "{:>2}. [{}] {}",
            view.index + 1,
            view.domain_label,
            view.prompt
        );
        for option in &view.options {
            println!("      {}) {} ({} pts)", option.index, option.label, option.points);
        }
    }
    Ok(())
}

pub(crate) fn run_quiz_score(args: AnswersArgs) -> Result<(), AppError> {
    let answers = parse_answers(&args.answers).map_err(AppError::InvalidInput)?;
    let config = AppConfig::load()?;
    let engine = ProtocolEngine::new(
        InMemoryStore::new(),
        Arc::new(LoggingRemoteSink),
        EngineOptions {
            user_id: None,
            ..config.engine.options()
        },
    );

    render_score_report(&engine.score_only(&answers));
    Ok(())
}

pub(crate) fn run_quiz_complete(args: AnswersArgs) -> Result<(), AppError> {
    let answers = parse_answers(&args.answers).map_err(AppError::InvalidInput)?;
    let config = AppConfig::load()?;
    let mut engine = open_engine(&config.engine)?;

    let outcome = engine.complete_quiz(answers, Utc::now())?;
    render_outcome(&outcome);
    println!("\nCurrent protocol day: {}", engine.current_day());
    Ok(())
}

pub(crate) fn run_checkin(args: CheckinArgs) -> Result<(), AppError> {
    let CheckinArgs {
        day,
        tasks,
        energy,
        mood,
        advance,
    } = args;

    let updates = tasks
        .iter()
        .map(|raw| parse_task_status(raw))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::InvalidInput)?;

    let config = AppConfig::load()?;
    let mut engine = open_engine(&config.engine)?;
    let requested = day.unwrap_or_else(|| engine.current_day());
    let opening = engine.open_day(requested);

    if let Some(notice) = opening.access.notice() {
        println!("{notice}");
    }
    let Some(mut check_in) = opening.check_in else {
        return Err(AppError::InvalidInput(
            "run `quiz complete` before logging protocol days".to_string(),
        ));
    };
    if opening.access.is_redirect() {
        if !updates.is_empty() || energy.is_some() || mood.is_some() || advance {
            return Err(AppError::InvalidInput(format!(
                "day {requested} cannot be logged yet"
            )));
        }
        render_check_in(&check_in.to_view());
        return Ok(());
    }

    for (id, status) in &updates {
        check_in.set_status(id, *status)?;
    }
    if let Some(rating) = energy {
        check_in.set_energy(rating);
    }
    if let Some(rating) = mood {
        check_in.set_mood(rating);
    }

    let current_day = if advance {
        engine.save_and_continue(&check_in)?
    } else {
        engine.save_day(&check_in)?;
        engine.current_day()
    };

    render_check_in(&check_in.to_view());
    println!("Current protocol day: {current_day}");
    Ok(())
}

pub(crate) fn run_status() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = open_engine(&config.engine)?;
    render_summary(&engine.summary());
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = open_engine(&config.engine)?;

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            engine.export_csv(file)?;
            println!("Exported {} day(s) to {}", engine.days().len(), path.display());
        }
        None => engine.export_csv(io::stdout().lock())?,
    }
    Ok(())
}
