//! ImpactScore - organizational impact assessments
//!
//! A CLI tool that records questionnaire answers across seven fixed
//! impact domains and turns them into scorecards: per-domain averages,
//! completion and an overall rating.
//!
//! Exit codes:
//!   0 - Success (no assessment below threshold, or no --fail-below set)
//!   1 - Runtime error (invalid input, unreadable store, etc.)
//!   2 - An assessment's overall score is below --fail-below

mod analysis;
mod catalog;
mod cli;
mod config;
mod models;
mod report;
mod scanner;
mod store;

use analysis::group_by_assessment;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, CatalogArgs, Command, OutputFormat, ProjectArgs, RecordArgs, ReportArgs};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata, Scorecard};
use std::path::{Path, PathBuf};
use store::{AnswerStore, StoreDocument};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    // Load configuration before logging so `[general] verbose` applies
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("ImpactScore v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .impactscore.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the store path, report output and scanner limits.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` overrides the verbosity flags.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the subcommand. Returns the exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    match &args.command {
        Command::Project(project) => handle_project(config, project),
        Command::Record(record) => handle_record(config, record),
        Command::Report(report) => handle_report(config, report, args.quiet),
        Command::Catalog(catalog) => handle_catalog(catalog),
        Command::InitConfig => unreachable!("init-config is handled before dispatch"),
    }
}

/// Create a project in the store.
fn handle_project(config: &Config, args: &ProjectArgs) -> Result<i32> {
    let mut store = open_store(config)?;

    let project = store.create_project(&args.name, args.description.clone())?;
    store.save()?;

    println!("✅ Created project '{}' with id: {}", project.name, project.id);
    println!(
        "   Store: {} ({} projects)",
        store.path().display(),
        store.document().projects.len()
    );
    Ok(0)
}

/// Validate and upsert a single answer.
fn handle_record(config: &Config, args: &RecordArgs) -> Result<i32> {
    let response = args
        .response()
        .context("One of --score or --percent is required")?;

    let mut store = open_store(config)?;
    let answer = store.submit(
        &args.project,
        &args.domain,
        &args.question,
        response,
        args.notes.clone(),
    )?;
    store.save()?;

    println!(
        "✅ Recorded {}/{} for assessment {}",
        answer.domain_id, answer.question_id, answer.assessment_id
    );

    let question = catalog::find_question(&answer.domain_id, &answer.question_id);
    if let (Some(question), Some(stored)) = (question, answer.score) {
        let shown = question.display_value(stored);
        println!(
            "   Stored score: {} (shown as {}: {})",
            stored,
            shown,
            question.label_for(shown).unwrap_or("no label")
        );
    }
    Ok(0)
}

/// Compute scorecards and write the report. Returns exit code (0 or 2).
fn handle_report(config: &Config, args: &ReportArgs, quiet: bool) -> Result<i32> {
    let source = args
        .answers
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.store.path));

    let scan_config = scanner::ScanConfig::from(&config.scanner);

    let loaded = if source.exists() {
        info!("Loading answers from: {}", source.display());
        scanner::load_source(&source, &scan_config, !quiet)?
    } else {
        warn!("No answers found at {}, reporting empty", source.display());
        scanner::ScanResult::default()
    };

    info!("Read {} answer file(s)", loaded.files_read);
    for (path, reason) in &loaded.files_failed {
        eprintln!("⚠️  Skipped {}: {}", path, reason);
    }

    let scorecards = build_scorecards(&loaded.document, args.assessment.as_deref());

    let report = Report {
        metadata: ReportMetadata {
            source: source.display().to_string(),
            generated_at: Utc::now(),
            assessments: scorecards.len(),
            answers: loaded.document.answers.len(),
        },
        scorecards,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = report_destination(config, args);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Assessment Summary:");
    for card in &report.scorecards {
        println!(
            "   {} {}: {:.1} / 10 ({}) - {}% complete",
            card.label.emoji(),
            card.assessment_id,
            card.overall_score,
            card.label,
            card.completion_percent
        );
    }
    if report.scorecards.is_empty() {
        println!("   No assessments found.");
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    // Check --fail-below threshold
    if let Some(threshold) = args.fail_below {
        let below: Vec<_> = report
            .scorecards
            .iter()
            .filter(|c| c.overall_score < threshold)
            .map(|c| c.assessment_id.as_str())
            .collect();

        if !below.is_empty() {
            eprintln!(
                "\n⛔ Overall score below {:.1} for: {}. Failing (exit code 2).",
                threshold,
                below.join(", ")
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Print the catalog to stdout.
fn handle_catalog(args: &CatalogArgs) -> Result<i32> {
    let output = match args.format {
        OutputFormat::Json => report::generate_catalog_json(catalog::domains())?,
        OutputFormat::Markdown => report::generate_catalog_markdown(catalog::domains()),
    };

    println!("{}", output);
    Ok(0)
}

/// One scorecard per assessment, or just the requested one.
fn build_scorecards(doc: &StoreDocument, only: Option<&str>) -> Vec<Scorecard> {
    let grouped = group_by_assessment(&doc.answers);

    let ids: Vec<String> = match only {
        Some(id) => {
            if !grouped.contains_key(id) {
                warn!("Assessment {} has no answers yet", id);
            }
            vec![id.to_string()]
        }
        None => grouped.keys().cloned().collect(),
    };

    ids.into_iter()
        .map(|id| {
            let answers = grouped.get(&id).map(Vec::as_slice).unwrap_or(&[]);
            let mut card = Scorecard::from_answers(&id, answers);
            card.project_id = doc.project_of(&id).map(String::from);
            card
        })
        .collect()
}

/// Report destination; JSON reports swap the default `.md` extension.
fn report_destination(config: &Config, args: &ReportArgs) -> PathBuf {
    let path = PathBuf::from(&config.general.output);

    if args.output.is_none()
        && args.format == OutputFormat::Json
        && path.extension().and_then(|e| e.to_str()) == Some("md")
    {
        return path.with_extension("json");
    }

    path
}

/// Open the answer store named in the configuration.
fn open_store(config: &Config) -> Result<AnswerStore> {
    let path = Path::new(&config.store.path);
    AnswerStore::open(path)
        .with_context(|| format!("Failed to open answer store {}", path.display()))
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}. Using defaults.", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;

    fn report_args(format: OutputFormat, output: Option<PathBuf>) -> ReportArgs {
        ReportArgs {
            answers: None,
            assessment: None,
            format,
            output,
            fail_below: None,
            no_notes: false,
            weakest: None,
        }
    }

    #[test]
    fn test_build_scorecards_per_assessment() {
        let doc = StoreDocument {
            answers: vec![
                Answer::new("b", "culture_and_people", "wellbeing", Some(8)),
                Answer::new("a", "culture_and_people", "wellbeing", Some(2)),
            ],
            ..StoreDocument::default()
        };

        let cards = build_scorecards(&doc, None);
        let ids: Vec<_> = cards.iter().map(|c| c.assessment_id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cards[1].overall_score, 8.0);
    }

    #[test]
    fn test_build_scorecards_unknown_assessment_is_empty() {
        let cards = build_scorecards(&StoreDocument::default(), Some("fresh"));

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].overall_score, 0.0);
        assert_eq!(cards[0].completion_percent, 0);
        assert_eq!(cards[0].started_domains(), 0);
    }

    #[test]
    fn test_config_verbose_enables_debug_logging() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[general]\nverbose = true\n").unwrap();

        let mut args = Args {
            config: Some(path),
            store: None,
            verbose: false,
            quiet: false,
            command: Command::Catalog(CatalogArgs {
                format: OutputFormat::Markdown,
            }),
        };

        let mut config = load_config(&args).unwrap();
        config.merge_with_args(&args);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::ERROR);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            store: None,
            verbose: false,
            quiet: false,
            command: Command::InitConfig,
        };

        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_report_destination() {
        let config = Config::default();

        let md = report_destination(&config, &report_args(OutputFormat::Markdown, None));
        assert_eq!(md, PathBuf::from("impact_report.md"));

        let json = report_destination(&config, &report_args(OutputFormat::Json, None));
        assert_eq!(json, PathBuf::from("impact_report.json"));

        let mut explicit = config.clone();
        explicit.general.output = "custom.md".to_string();
        let kept = report_destination(
            &explicit,
            &report_args(OutputFormat::Json, Some(PathBuf::from("custom.md"))),
        );
        assert_eq!(kept, PathBuf::from("custom.md"));
    }
}
