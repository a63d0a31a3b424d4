use crate::infra::{catalogue_config, ensure_known, load_engine, read_answers};
use clap::Args;
use devscreen::error::AppError;
use devscreen::screening::{AnswerSet, EvaluationReport, QuestionCatalogue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the random answer fill. Omit for a different fill on every run.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Answer every question with its expected healthy answer instead of at random.
    #[arg(long)]
    pub(crate) healthy: bool,
    /// Directory holding questions.csv, units.csv, features.csv and models/
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file with the answers, either `{"answers": {...}}` or a plain id to yes/no map
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Directory holding questions.csv, units.csv, features.csv and models/
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { answers, data_dir } = args;

    let engine = load_engine(catalogue_config(data_dir)?)?;
    let answers = read_answers(&answers)?;
    ensure_known(&engine, &answers)?;

    let report = engine.evaluate(&answers);
    println!(
        "{}",
        render_report(engine.catalogue().questions(), &answers, &report)
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed,
        healthy,
        data_dir,
    } = args;

    let engine = load_engine(catalogue_config(data_dir)?)?;
    let questions = engine.catalogue().questions();
    let answers = if healthy {
        healthy_fill(questions)
    } else {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        random_fill(questions, &mut rng)
    };

    println!("Developmental screening demo");
    match (healthy, seed) {
        (true, _) => println!("Fill: expected healthy answers"),
        (false, Some(seed)) => println!("Fill: random (seed {seed})"),
        (false, None) => println!("Fill: random"),
    }
    println!();

    let report = engine.evaluate(&answers);
    println!("{}", render_report(questions, &answers, &report));
    Ok(())
}

/// Every question answered yes or no with equal odds.
pub(crate) fn random_fill<R: Rng>(questions: &QuestionCatalogue, rng: &mut R) -> AnswerSet {
    questions
        .questions()
        .iter()
        .map(|question| (question.id.clone(), rng.gen_bool(0.5)))
        .collect()
}

pub(crate) fn healthy_fill(questions: &QuestionCatalogue) -> AnswerSet {
    questions
        .questions()
        .iter()
        .map(|question| (question.id.clone(), question.expected))
        .collect()
}

fn yes_no(answer: bool) -> &'static str {
    if answer {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn render_report(
    questions: &QuestionCatalogue,
    answers: &AnswerSet,
    report: &EvaluationReport,
) -> String {
    let mut lines = vec!["Answers".to_string()];
    for question in questions.questions() {
        let given = answers
            .get(&question.id)
            .map(yes_no)
            .unwrap_or("unanswered");
        lines.push(format!("  {} {}: {}", question.id, question.text, given));
    }

    lines.push(String::new());
    lines.push("Report".to_string());
    lines.extend(report.summary().lines().map(|line| format!("  {line}")));

    if !report.skill_gaps.is_empty() {
        lines.push(String::new());
        lines.push("Skill gaps".to_string());
        for gap in &report.skill_gaps {
            let ids: Vec<&str> = gap.questions.iter().map(|id| id.as_str()).collect();
            lines.push(format!(
                "  {}: {} ({})",
                gap.category,
                gap.count,
                ids.join(", ")
            ));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Skipped classifiers".to_string());
        for warning in &report.warnings {
            lines.push(format!(
                "  {} ({}): {}",
                warning.unit, warning.category, warning.reason
            ));
        }
    }

    lines.join("\n")
}
