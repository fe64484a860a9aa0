//! Gridmark CLI - grade spreadsheet exercises from a data directory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridmark::prelude::*;
use gridmark::store::csv_dir::CsvSheetReader;
use gridmark::store::json_file::{JsonFileStore, JsonRuleSource};
use gridmark_core::{Grid, SheetRange};
use gridmark_csv::{CsvReadOptions, CsvReader};
use gridmark_engine::{compare, DEFAULT_TOLERANCE};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gridmark")]
#[command(author, version, about = "Spreadsheet exercise grading tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a learner's sheet and record progression
    Grade {
        /// Directory holding rules.json, sheets/ and progress.json
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Learner's spreadsheet id (sheets/<id>.csv)
        #[arg(short, long)]
        sheet: String,

        /// Exercise (section) id in rules.json
        #[arg(short, long)]
        exercise: String,

        /// Learner id
        #[arg(short, long)]
        learner: String,

        /// The learner looked at a hint
        #[arg(long)]
        hint: bool,
    },

    /// Compare two CSV files cell by cell without recording anything
    Compare {
        /// Learner's CSV file
        student: PathBuf,

        /// Solution CSV file
        solution: PathBuf,

        /// Range to compare, e.g. B2:D9 (default: whole file)
        #[arg(short, long)]
        range: Option<String>,

        /// Relative numeric tolerance
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Mismatches to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a learner's progression and XP
    Progress {
        /// Directory holding progress.json
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Learner id
        #[arg(short, long)]
        learner: String,

        /// Only show this exercise
        #[arg(short, long)]
        exercise: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grade {
            data_dir,
            sheet,
            exercise,
            learner,
            hint,
        } => {
            let request = GradeRequest::new(sheet, exercise, learner).with_hint(hint);
            grade(&data_dir, &request).await
        }
        Commands::Compare {
            student,
            solution,
            range,
            tolerance,
            limit,
        } => compare_files(&student, &solution, range.as_deref(), tolerance, limit),
        Commands::Progress {
            data_dir,
            learner,
            exercise,
        } => show_progress(&data_dir, &learner, exercise.as_deref()).await,
    }
}

async fn open_store(data_dir: &Path) -> Result<Arc<JsonFileStore>> {
    let path = data_dir.join("progress.json");
    let store = JsonFileStore::open(&path)
        .await
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    Ok(Arc::new(store))
}

async fn grade(data_dir: &Path, request: &GradeRequest) -> Result<()> {
    let rules_path = data_dir.join("rules.json");
    let rules = JsonRuleSource::open(&rules_path)
        .await
        .with_context(|| format!("Failed to load '{}'", rules_path.display()))?;
    let store = open_store(data_dir).await?;

    let service = GradingService::new(
        GraderConfig::default(),
        Arc::new(CsvSheetReader::new(data_dir.join("sheets"))),
        Arc::new(rules),
        store.clone(),
        store,
    );

    let outcome = match service.grade(request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_body())?);
            let status = err_status(&err);
            return Err(err).context(format!("Grading failed ({})", status));
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    if let Some(failure) = outcome.persistence_failure {
        eprintln!("Warning: {}", failure);
    }

    Ok(())
}

fn err_status(err: &GradeError) -> &'static str {
    if err.is_client_error() {
        "bad request"
    } else {
        "internal error"
    }
}

fn read_grid(path: &Path, range: Option<&SheetRange>) -> Result<Grid> {
    let grid = CsvReader::read_file(path, &CsvReadOptions::default())
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(match range {
        Some(r) => grid.window(&r.cells()),
        None => grid,
    })
}

fn compare_files(
    student: &Path,
    solution: &Path,
    range: Option<&str>,
    tolerance: f64,
    limit: usize,
) -> Result<()> {
    let parsed = range
        .map(SheetRange::parse)
        .transpose()
        .context("Invalid range")?;

    let student_grid = read_grid(student, parsed.as_ref())?;
    let solution_grid = read_grid(solution, parsed.as_ref())?;
    let result = compare(&student_grid, &solution_grid, tolerance, range);

    for mismatch in result.mismatches.iter().take(limit) {
        println!(
            "{}: expected {:?}, got {:?}",
            mismatch.cell, mismatch.expected, mismatch.actual
        );
    }
    if result.mismatches.len() > limit {
        println!("... and {} more", result.mismatches.len() - limit);
    }

    println!(
        "{}/{} correct ({}%)",
        result.correct_cells,
        result.total_cells,
        result.score()
    );

    Ok(())
}

async fn show_progress(data_dir: &Path, learner: &str, exercise: Option<&str>) -> Result<()> {
    let store = open_store(data_dir).await?;

    let records: Vec<ProgressionRecord> = store
        .records_for(learner)
        .await?
        .into_iter()
        .filter(|r| exercise.map_or(true, |id| r.exercise_id == id))
        .collect();
    let total = store.learner_total(learner).await?;

    let report = serde_json::json!({
        "learner_id": learner,
        "total_xp": total,
        "records": records,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
