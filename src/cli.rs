//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::store::Response;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// ImpactScore - organizational impact assessments from the command line
///
/// Record answers across seven impact domains and turn them into
/// scorecards with domain averages, completion and an overall rating.
///
/// Examples:
///   impactscore project --name "Green Cities"
///   impactscore record --project green-cities --domain culture_and_people --question wellbeing --score 7
///   impactscore record --project green-cities --domain purpose_and_strategy --question purpose_alignment --percent 65
///   impactscore report --format json --output scorecard.json
///   impactscore report --answers ./exports --fail-below 6
///   impactscore init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .impactscore.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the answer store
    #[arg(long, value_name = "FILE", env = "IMPACTSCORE_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a project
    Project(ProjectArgs),
    /// Record (or replace) the answer to one question
    Record(RecordArgs),
    /// Compute scorecards and write a report
    Report(ReportArgs),
    /// List the domains and questions
    Catalog(CatalogArgs),
    /// Generate a default .impactscore.toml configuration file
    InitConfig,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ProjectArgs {
    /// Display name of the project
    #[arg(short, long)]
    pub name: String,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RecordArgs {
    /// Project id (as printed by `project`)
    #[arg(short, long)]
    pub project: String,

    /// Domain id
    #[arg(short, long)]
    pub domain: String,

    /// Question id within the domain
    #[arg(long)]
    pub question: String,

    /// Displayed score 0-10 for scale questions
    #[arg(short, long, required_unless_present = "percent", conflicts_with = "percent")]
    pub score: Option<u8>,

    /// Slider value 0-100 for percentage questions
    #[arg(long, value_name = "PERCENT")]
    pub percent: Option<u8>,

    /// Free-text note saved with the score
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl RecordArgs {
    /// The response as entered.
    pub fn response(&self) -> Option<Response> {
        match (self.score, self.percent) {
            (Some(score), _) => Some(Response::Scale(score)),
            (None, Some(percent)) => Some(Response::Percentage(percent)),
            (None, None) => None,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReportArgs {
    /// Answer source: a store file, an export file, or a directory of exports
    ///
    /// Defaults to the answer store
    #[arg(short, long, value_name = "PATH")]
    pub answers: Option<PathBuf>,

    /// Only report on this assessment
    #[arg(long, value_name = "ID")]
    pub assessment: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fail if any assessment's overall score is below this value
    ///
    /// Useful for CI pipelines. Exit code 2 when the threshold is not met.
    #[arg(long, value_name = "SCORE")]
    pub fail_below: Option<f64>,

    /// Leave answer notes out of the report
    #[arg(long)]
    pub no_notes: bool,

    /// Number of weakest domains to list as focus areas
    #[arg(long, value_name = "COUNT")]
    pub weakest: Option<usize>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CatalogArgs {
    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Project(project) => {
                if project.name.trim().is_empty() {
                    return Err("Project name must not be empty".to_string());
                }
            }
            Command::Record(record) => {
                if record.response().is_none() {
                    return Err("One of --score or --percent is required".to_string());
                }
            }
            Command::Report(report) => {
                if let Some(threshold) = report.fail_below {
                    if !(0.0..=10.0).contains(&threshold) {
                        return Err("--fail-below must be between 0 and 10".to_string());
                    }
                }
                if let Some(ref answers) = report.answers {
                    if !answers.exists() {
                        return Err(format!(
                            "Answer source does not exist: {}",
                            answers.display()
                        ));
                    }
                }
            }
            Command::Catalog(_) | Command::InitConfig => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over everything; `default_verbose` comes from the
    /// `[general]` section of the config file.
    pub fn log_level(&self, default_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || default_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            config: None,
            store: None,
            verbose: false,
            quiet: false,
            command,
        }
    }

    fn report_args() -> ReportArgs {
        ReportArgs {
            answers: None,
            assessment: None,
            format: OutputFormat::Markdown,
            output: None,
            fail_below: None,
            no_notes: false,
            weakest: None,
        }
    }

    #[test]
    fn test_parse_record() {
        let args = Args::try_parse_from([
            "impactscore",
            "record",
            "--project",
            "p",
            "--domain",
            "culture_and_people",
            "--question",
            "wellbeing",
            "--score",
            "7",
        ])
        .unwrap();

        match args.command {
            Command::Record(ref record) => {
                assert_eq!(record.response(), Some(Response::Scale(7)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_record_requires_a_value() {
        let result = Args::try_parse_from([
            "impactscore",
            "record",
            "--project",
            "p",
            "--domain",
            "d",
            "--question",
            "q",
        ]);
        assert!(result.is_err());

        let result = Args::try_parse_from([
            "impactscore",
            "record",
            "--project",
            "p",
            "--domain",
            "d",
            "--question",
            "q",
            "--score",
            "3",
            "--percent",
            "40",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_report_json() {
        let args =
            Args::try_parse_from(["impactscore", "report", "--format", "json", "--verbose"])
                .unwrap();

        assert!(args.verbose);
        match args.command {
            Command::Report(ref report) => assert_eq!(report.format, OutputFormat::Json),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::InitConfig);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_fail_below_range() {
        let mut report = report_args();
        report.fail_below = Some(11.0);
        assert!(make_args(Command::Report(report.clone())).validate().is_err());

        report.fail_below = Some(6.0);
        assert!(make_args(Command::Report(report)).validate().is_ok());
    }

    #[test]
    fn test_validation_missing_answer_source() {
        let mut report = report_args();
        report.answers = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(make_args(Command::Report(report)).validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::InitConfig);
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
