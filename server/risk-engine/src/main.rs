//! Binary entrypoint: read one JSON object from stdin, write one to stdout.
//!
//! Errors are written to stdout as an ErrorOutput object. Exit code 2 means the
//! input was rejected (incomplete profile or validation), 1 means the engine
//! could not run at all.

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use youmatter_risk::types::ErrorOutput;
use youmatter_risk::{
  telemetry, AppConfig, AssessmentRequest, Engine, EngineError, InboundProfile, PlanCatalog,
  ScoringConfig,
};

#[derive(Parser, Debug)]
#[command(
  name = "youmatter-risk",
  about = "Score a YouMatter health profile and rank insurance plans (stdin JSON in, stdout JSON out)",
  version
)]
struct Cli {
  /// Plan catalog JSON file (defaults to YOUMATTER_CATALOG, then the built-in catalog)
  #[arg(long, global = true)]
  catalog: Option<PathBuf>,
  /// Scoring config JSON file (defaults to YOUMATTER_SCORING, then built-in constants)
  #[arg(long, global = true)]
  scoring: Option<PathBuf>,
  /// Log filter, e.g. "debug" (RUST_LOG takes precedence)
  #[arg(long, global = true)]
  log_level: Option<String>,
  /// Reference date for ages derived from date of birth (YYYY-MM-DD, default today UTC)
  #[arg(long, global = true)]
  as_of: Option<NaiveDate>,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
  /// Full assessment: report, plan matches, explanations, discount draft (default)
  Assess,
  /// Risk report only; stdin is a bare health profile
  Score,
  /// Print the effective plan catalog
  Catalog,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  let app = AppConfig::from_env();
  let log_level = cli.log_level.clone().unwrap_or_else(|| app.log_level.clone());
  if let Err(e) = telemetry::init(&log_level) {
    let _ = writeln!(io::stderr(), "youmatter-risk: {}", e);
    return ExitCode::from(1);
  }

  match run(&cli, &app) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::warn!(kind = e.kind(), error = %e, "request failed");
      let stdout = io::stdout();
      let mut handle = stdout.lock();
      let _ = serde_json::to_writer(&mut handle, &ErrorOutput::from_error(&e));
      let _ = writeln!(handle);
      ExitCode::from(e.exit_code())
    }
  }
}

fn run(cli: &Cli, app: &AppConfig) -> Result<(), EngineError> {
  let scoring = match cli.scoring.as_ref().or(app.scoring_path.as_ref()) {
    Some(path) => ScoringConfig::load(path)?,
    None => ScoringConfig::default(),
  };
  let catalog = match cli.catalog.as_ref().or(app.catalog_path.as_ref()) {
    Some(path) => PlanCatalog::load(path)?,
    None => PlanCatalog::builtin(),
  };
  let engine = Engine::new(scoring, catalog)?;

  let now = match cli.as_of {
    Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
    None => Utc::now(),
  };

  let stdout = io::stdout();
  let mut out = stdout.lock();
  match cli.command.unwrap_or(Command::Assess) {
    Command::Assess => {
      let request: AssessmentRequest = serde_json::from_str(&read_stdin()?)?;
      let assessment = engine.assess(&request, now)?;
      serde_json::to_writer(&mut out, &assessment)?;
    }
    Command::Score => {
      let profile: InboundProfile = serde_json::from_str(&read_stdin()?)?;
      let report = engine.score(&profile, None, now.date_naive())?;
      serde_json::to_writer(&mut out, &report)?;
    }
    Command::Catalog => {
      serde_json::to_writer_pretty(&mut out, &*engine.catalog())?;
    }
  }
  writeln!(out)?;
  out.flush()?;
  Ok(())
}

fn read_stdin() -> Result<String, EngineError> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  Ok(raw)
}
