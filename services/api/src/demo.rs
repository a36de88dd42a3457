use crate::infra::parse_answers;
use chrono::Utc;
use clap::Args;
use longevity_protocol::error::AppError;
use longevity_protocol::storage::{InMemoryStore, RecordingRemoteSink};
use longevity_protocol::workflows::diagnosis::{ActionPlan, DiagnosisOutcome, DiagnosisScores};
use longevity_protocol::workflows::protocol::{
    CheckInView, ComplianceLevel, ProtocolSummary, TaskStatus,
};
use longevity_protocol::workflows::{EngineOptions, ProtocolEngine, ScoreReport};
use std::io;
use std::sync::Arc;

/// Weak attention and uneven sleep, strong elsewhere.
const SAMPLE_ANSWERS: &str = "0,1,0,1,2,1,1,0,1,0,0,2,3,2,1,0,1";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Quiz answers to start from. Defaults to a built-in sample.
    #[arg(long)]
    pub(crate) answers: Option<String>,
    /// Number of protocol days to simulate after the quiz
    #[arg(long, default_value_t = 3)]
    pub(crate) days: u32,
    /// Print the CSV export after the dashboard
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { answers, days, csv } = args;
    let answers = parse_answers(answers.as_deref().unwrap_or(SAMPLE_ANSWERS))
        .map_err(AppError::InvalidInput)?;

    let sink = Arc::new(RecordingRemoteSink::default());
    let mut engine = ProtocolEngine::new(
        InMemoryStore::new(),
        sink.clone(),
        EngineOptions {
            user_id: Some("demo-user".to_string()),
            ..EngineOptions::default()
        },
    );

    println!("Longevity protocol demo");
    let outcome = engine.complete_quiz(answers, Utc::now())?;
    render_outcome(&outcome);

    for offset in 0..days {
        let Some(mut check_in) = engine.open_day(engine.current_day()).check_in else {
            break;
        };
        let ids: Vec<String> = check_in.tasks().iter().map(|task| task.id.clone()).collect();
        for (position, id) in ids.iter().enumerate() {
            check_in.set_status(id, simulated_status(offset, position))?;
        }
        check_in.set_energy(5 + (offset % 4) as u8);
        check_in.set_mood(6 + (offset % 3) as u8);

        println!();
        render_check_in(&check_in.to_view());
        engine.save_and_continue(&check_in)?;
    }

    println!();
    render_summary(&engine.summary());

    println!("\nRemote mirror received {} upsert(s)", sink.upserts().len());
    for upsert in sink.upserts() {
        println!("  - {} -> day {}", upsert.user_id, upsert.current_day);
    }

    if csv {
        println!();
        engine.export_csv(io::stdout().lock())?;
    }

    Ok(())
}

/// Later days get progressively better adherence.
fn simulated_status(offset: u32, position: usize) -> TaskStatus {
    match (offset as usize + position) % 4 {
        0 => TaskStatus::Completed,
        1 => TaskStatus::Partial,
        2 if offset > 0 => TaskStatus::Completed,
        2 => TaskStatus::NotDone,
        _ => TaskStatus::Completed,
    }
}

pub(crate) fn render_scores(scores: &DiagnosisScores) {
    println!("Global score: {}", scores.global);
    for (domain, score) in scores.domains() {
        println!("  - {:<16} {:>3}", domain.label(), score);
    }
}

pub(crate) fn render_plan(plan: &ActionPlan) {
    match plan.domain {
        Some(domain) => println!("Action plan ({})", domain.label()),
        None => println!("Action plan (general)"),
    }
    for (position, action) in plan.actions.iter().enumerate() {
        println!("  {}. {}: {}", position + 1, action.title, action.description);
        println!("     {}", action.rationale);
    }
}

pub(crate) fn render_score_report(report: &ScoreReport) {
    render_scores(&report.scores);
    println!("Accelerator: {}", report.accelerator_label);
    render_plan(&report.plan);
}

pub(crate) fn render_outcome(outcome: &DiagnosisOutcome) {
    println!(
        "Diagnosis {} recorded at {}",
        outcome.record.id,
        outcome.record.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    render_scores(outcome.scores());
    println!("Accelerator: {}", outcome.accelerator_label);
    render_plan(&outcome.plan);
}

pub(crate) fn render_check_in(view: &CheckInView) {
    let level = ComplianceLevel::from_compliance(view.compliance);
    println!(
        "Day {} | compliance {}% ({}) | energy {}/10 | mood {}/10",
        view.day_number,
        view.compliance,
        level.label(),
        view.energy_rating,
        view.mood_rating
    );
    for task in &view.tasks {
        println!("  - {}: {}", task.id, task.status_label);
    }
}

pub(crate) fn render_summary(summary: &ProtocolSummary) {
    println!("Protocol dashboard");
    println!(
        "- Current day {} | {} day(s) logged | streak {}",
        summary.current_day, summary.days_logged, summary.streak
    );

    if let Some(average) = summary.average_compliance {
        println!(
            "- Average compliance {}% ({})",
            average,
            ComplianceLevel::from_compliance(average).label()
        );
    }
    if let (Some(energy), Some(mood)) = (summary.average_energy, summary.average_mood) {
        println!("- Average energy {:.1} | mood {:.1}", energy, mood);
    }
    if let Some(day) = summary.best_day {
        println!("- Best day so far: day {day}");
    }
    if let (Some(global), Some(accelerator)) = (summary.latest_global_score, summary.accelerator) {
        println!(
            "- Latest global score {} | accelerator {}",
            global,
            accelerator.label()
        );
    }
    if let Some(progress) = &summary.score_progress {
        println!(
            "- {} diagnosis runs, global change {:+}",
            progress.runs, progress.global_delta
        );
        for delta in &progress.domain_deltas {
            println!("    {:<16} {:+}", delta.domain.label(), delta.delta);
        }
    }

    if !summary.days.is_empty() {
        println!("Days:");
        for entry in &summary.days {
            println!(
                "  - day {:>3}: {:>3}% {} (energy {}, mood {})",
                entry.day_number,
                entry.compliance,
                entry.level_label,
                entry.energy_rating,
                entry.mood_rating
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_answers_cover_the_whole_quiz() {
        let answers = parse_answers(SAMPLE_ANSWERS).expect("sample parses");
        assert_eq!(answers.len(), 17);
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs {
            answers: None,
            days: 2,
            csv: true,
        })
        .expect("demo completes");
    }
}
