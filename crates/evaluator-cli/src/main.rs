//! LLM Evaluator - prompt-management CLI
//!
//! The `llm-eval` command walks the three-phase evaluation wizard from a
//! plan file and talks to the evaluator backend.
//!
//! ## Commands
//!
//! - `catalog`: List domains, rubrics or models
//! - `health`: Ping the backend
//! - `validate-key`: Check an API key against a model
//! - `check`: Offline phase-gate check of a plan file
//! - `evaluate`: Submit, run and fetch an evaluation for a plan file
//! - `results` / `rerun`: Fetch or re-run an existing evaluation

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use evaluator_client::{EvaluationBackend, EvaluatorConfig, HttpBackend, ValidateKeyRequest};
use evaluator_core::{
    check_key, fetch, find_model, render_report_text, run_and_fetch, spawn_prewarm,
    AnalysisReport, AnalysisResults, ExpandedRows, Orchestrator, Phase, Rubric, Wizard, DOMAINS,
    MODELS, RUBRICS,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "llm-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prompt evaluation against the LLM evaluator backend", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Backend base URL (default: the hosted evaluator)
    #[arg(long, global = true, env = "EVALUATOR_API_URL")]
    api_url: Option<String>,

    /// API key for the selected model's provider
    #[arg(long, global = true, env = "EVALUATOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Skip the background health request sent on startup
    #[arg(long, global = true)]
    no_prewarm: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List static reference data
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the backend answers on /health
    Health,

    /// Validate an API key for a model
    ValidateKey {
        /// Model id, e.g. `mistral`
        #[arg(short, long)]
        model: String,
    },

    /// Check a plan file against the phase gates without contacting the backend
    Check {
        /// Path to the plan file (JSON)
        plan: PathBuf,
    },

    /// Submit, run and fetch an evaluation described by a plan file
    Evaluate {
        /// Path to the plan file (JSON)
        plan: PathBuf,

        /// Run and fetch a second time, reusing the evaluation id
        #[arg(long)]
        reanalyze: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fetch the results of an existing evaluation
    Results {
        evaluation_id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run an existing evaluation again and fetch its results
    Rerun {
        evaluation_id: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CatalogKind {
    Domains,
    Rubrics,
    Models,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Clone, Copy, Debug)]
struct OutputArgs {
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show score breakdown and input/output for every test case
    #[arg(long)]
    expand_all: bool,
}

/// Evaluation plan as read from disk.
#[derive(Debug, Clone, Deserialize)]
struct Plan {
    domain: String,
    rubrics: Vec<PlanRubric>,
    prompt: String,
    model: String,
    #[serde(default)]
    api_key: Option<String>,
    test_cases: Vec<PlanTestCase>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlanRubric {
    id: String,
    weight: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct PlanTestCase {
    input: String,
    #[serde(default)]
    expected_output: Option<String>,
}

impl Plan {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid plan file {:?}", path))
    }

    /// The `--api-key` flag wins over the key stored in the plan.
    fn resolve_key(&self, override_key: Option<&str>) -> String {
        override_key
            .or(self.api_key.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    fn fill_phase1(&self, wizard: &mut Wizard) -> Result<()> {
        wizard.select_domain(&self.domain)?;
        for rubric in &self.rubrics {
            wizard.add_rubric(&rubric.id)?;
            wizard.set_rubric_weight(&rubric.id, rubric.weight)?;
        }
        Ok(())
    }

    fn fill_phase2(&self, wizard: &mut Wizard, api_key: &str) -> Result<()> {
        wizard.set_prompt(self.prompt.clone());
        wizard.select_model(&self.model)?;
        if let Some(provider) = wizard.selected_provider() {
            wizard.set_api_key(provider, api_key);
        }

        let mut ids: Vec<String> = wizard.test_cases().iter().map(|t| t.id.clone()).collect();
        for (position, case) in self.test_cases.iter().enumerate() {
            if position >= ids.len() {
                ids.push(wizard.add_test_case());
            }
            let id = &ids[position];
            wizard.set_test_case_input(id, case.input.clone())?;
            wizard.set_test_case_expected(id, case.expected_output.clone())?;
        }
        Ok(())
    }

    /// Walk the wizard to phase 3 through both gates.
    fn replay(&self, wizard: &mut Wizard, api_key: &str) -> Result<()> {
        self.fill_phase1(wizard)?;
        wizard.next().context("Plan does not pass phase 1")?;
        self.fill_phase2(wizard, api_key)?;
        wizard.next().context("Plan does not pass phase 2")?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    evaluator_core::init_tracing(cli.json, level);

    match &cli.command {
        Commands::Catalog { kind, format } => return cmd_catalog(*kind, *format),
        Commands::Check { plan } => return cmd_check(plan, cli.api_key.as_deref()),
        _ => {}
    }

    let mut config = EvaluatorConfig::from_env();
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url);
    }
    let backend = Arc::new(HttpBackend::new(config).context("Failed to set up backend client")?);
    info!(api_url = %backend.config().api_url, "using evaluator backend");

    if !cli.no_prewarm && !matches!(cli.command, Commands::Health) {
        spawn_prewarm(backend.clone());
    }

    let api_key = cli.api_key.as_deref();
    match cli.command {
        Commands::Health => cmd_health(backend.as_ref()).await,
        Commands::ValidateKey { model } => {
            cmd_validate_key(backend.as_ref(), &model, api_key).await
        }
        Commands::Evaluate {
            plan,
            reanalyze,
            output,
        } => cmd_evaluate(backend.as_ref(), &plan, api_key, reanalyze, output).await,
        Commands::Results {
            evaluation_id,
            output,
        } => cmd_results(backend.as_ref(), &evaluation_id, output).await,
        Commands::Rerun {
            evaluation_id,
            output,
        } => cmd_rerun(backend.as_ref(), &evaluation_id, output).await,
        Commands::Catalog { .. } | Commands::Check { .. } => Ok(()),
    }
}

/// List domains, rubrics or models
fn cmd_catalog(kind: CatalogKind, format: OutputFormat) -> Result<()> {
    println!("{}", catalog_listing(kind, format)?);
    Ok(())
}

fn catalog_listing(kind: CatalogKind, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let value = match kind {
            CatalogKind::Domains => serde_json::to_string_pretty(DOMAINS)?,
            CatalogKind::Rubrics => serde_json::to_string_pretty(RUBRICS)?,
            CatalogKind::Models => serde_json::to_string_pretty(MODELS)?,
        };
        return Ok(value);
    }

    let lines: Vec<String> = match kind {
        CatalogKind::Domains => DOMAINS
            .iter()
            .map(|d| format!("{:<12} {:<14} {}", d.id, d.name, d.description))
            .collect(),
        CatalogKind::Rubrics => RUBRICS
            .iter()
            .map(|r| format!("{:<16} {:<18} {}", r.id, r.name, r.description))
            .collect(),
        CatalogKind::Models => MODELS
            .iter()
            .map(|m| format!("{:<20} {:<24} {}", m.id, m.name, m.provider))
            .collect(),
    };
    Ok(lines.join("\n"))
}

/// Ping the backend health endpoint
async fn cmd_health(backend: &HttpBackend) -> Result<()> {
    let url = backend.config().health_url()?;
    backend
        .health()
        .await
        .with_context(|| format!("Backend health check failed ({})", url))?;
    println!("Backend is up: {}", url);
    Ok(())
}

/// Validate an API key for a model
async fn cmd_validate_key(
    backend: &dyn EvaluationBackend,
    model: &str,
    api_key: Option<&str>,
) -> Result<()> {
    let Some(descriptor) = find_model(model) else {
        bail!("Unknown model '{}'. See `llm-eval catalog models`.", model);
    };
    let key = api_key.map(str::trim).unwrap_or_default();
    if key.is_empty() {
        bail!(
            "No {} given. Pass --api-key or set EVALUATOR_API_KEY.",
            descriptor.api_key_label
        );
    }

    let outcome = check_key(
        backend,
        &ValidateKeyRequest {
            llm_model: descriptor.id.to_string(),
            api_key: key.to_string(),
        },
    )
    .await;

    if outcome.success {
        println!("✓ {}", outcome.message);
        Ok(())
    } else {
        bail!("✗ {}", outcome.message)
    }
}

/// Check a plan against the phase gates, offline
fn cmd_check(plan_path: &Path, api_key: Option<&str>) -> Result<()> {
    let plan = Plan::load(plan_path)?;
    let report = check_plan(&plan, api_key)?;
    for line in &report.lines {
        println!("{}", line);
    }
    if !report.passed {
        bail!("Plan {:?} is not ready for analysis", plan_path);
    }
    Ok(())
}

struct CheckReport {
    passed: bool,
    lines: Vec<String>,
}

fn check_plan(plan: &Plan, api_key: Option<&str>) -> Result<CheckReport> {
    let mut wizard = Wizard::new();
    let mut lines = Vec::new();

    plan.fill_phase1(&mut wizard)?;
    let issues = wizard.phase1_issues();
    if !push_gate(&mut lines, Phase::DomainAndRubrics, &issues) {
        return Ok(CheckReport {
            passed: false,
            lines,
        });
    }
    wizard.next()?;

    plan.fill_phase2(&mut wizard, &plan.resolve_key(api_key))?;
    let issues = wizard.phase2_issues();
    let passed = push_gate(&mut lines, Phase::PromptAndTestCases, &issues);
    Ok(CheckReport { passed, lines })
}

fn push_gate(lines: &mut Vec<String>, phase: Phase, issues: &[evaluator_core::GateIssue]) -> bool {
    if issues.is_empty() {
        lines.push(format!("✓ {}", phase));
        return true;
    }
    lines.push(format!("✗ {}", phase));
    lines.extend(issues.iter().map(|issue| format!("    - {}", issue)));
    false
}

/// Replay a plan and run the full analysis
async fn cmd_evaluate(
    backend: &dyn EvaluationBackend,
    plan_path: &Path,
    api_key: Option<&str>,
    reanalyze: bool,
    output: OutputArgs,
) -> Result<()> {
    let plan = Plan::load(plan_path)?;
    let mut wizard = evaluate_plan(backend, &plan, api_key, reanalyze).await?;
    if output.expand_all {
        wizard.expand_all();
    }

    let Some(results) = wizard.results() else {
        bail!("Analysis finished without results");
    };
    warn_failed_generations(results);
    let report = AnalysisReport::build(results, wizard.rubrics(), wizard.evaluation_id());
    println!("{}", render(&report, wizard.expanded_rows(), output.format)?);
    Ok(())
}

async fn evaluate_plan(
    backend: &dyn EvaluationBackend,
    plan: &Plan,
    api_key: Option<&str>,
    reanalyze: bool,
) -> Result<Wizard> {
    let mut wizard = Wizard::new();
    plan.replay(&mut wizard, &plan.resolve_key(api_key))?;

    let orchestrator = Orchestrator::new(backend);
    orchestrator.analyze(&mut wizard).await?;
    if reanalyze {
        orchestrator.reanalyze(&mut wizard).await?;
    }
    Ok(wizard)
}

/// Fetch results of an existing evaluation
async fn cmd_results(
    backend: &dyn EvaluationBackend,
    evaluation_id: &str,
    output: OutputArgs,
) -> Result<()> {
    let results = fetch(backend, evaluation_id).await?;
    print_results(&results, evaluation_id, output)
}

/// Re-run an existing evaluation and fetch its results
async fn cmd_rerun(
    backend: &dyn EvaluationBackend,
    evaluation_id: &str,
    output: OutputArgs,
) -> Result<()> {
    let results = run_and_fetch(backend, evaluation_id).await?;
    print_results(&results, evaluation_id, output)
}

fn warn_failed_generations(results: &AnalysisResults) {
    let failed = results.failed_generations();
    if failed > 0 {
        warn!(
            failed = failed,
            total = results.test_case_results.len(),
            "some test cases produced no LLM output"
        );
    }
}

fn print_results(results: &AnalysisResults, evaluation_id: &str, output: OutputArgs) -> Result<()> {
    warn_failed_generations(results);
    // No wizard here, so rubric weights are unknown.
    let rubrics: &[Rubric] = &[];
    let report = AnalysisReport::build(results, rubrics, Some(evaluation_id));
    let mut expanded = ExpandedRows::default();
    if output.expand_all {
        expanded.expand_all(report.test_cases.iter().map(|tc| tc.test_case_index));
    }
    println!("{}", render(&report, &expanded, output.format)?);
    Ok(())
}

fn render(report: &AnalysisReport, expanded: &ExpandedRows, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_report_text(report, expanded)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}
