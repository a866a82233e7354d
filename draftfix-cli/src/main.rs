mod config;
mod explain;
mod input;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use config::{CliOverrides, ConfigMerger, MergedConfig};
use draftfix_client::MessagesClient;
use draftfix_core::adapters::RuleEngineChecker;
use draftfix_core::pipeline::{RepairOutcome, run_repair};
use draftfix_core::settings::RepairSettings;
use draftfix_domain::{RuleEngine, build_repair_prompt};
use draftfix_types::report::{RepairReport, RepairStatus, ReportArtifact, RunInfo, ToolInfo};
use draftfix_types::{Artifact, ArtifactId, Locale, Platform};
use fs_err as fs;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "draftfix",
    version,
    about = "Validate generated posts and repair them until they pass content rules."
)]
struct Cli {
    /// Directory holding draftfix.toml (default: current directory).
    #[arg(long, global = true, default_value = ".")]
    root: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the content rules locally and list violations.
    Check(CheckArgs),
    /// Print the repair instruction that would be sent for a file.
    Prompt(CheckArgs),
    /// Validate a file and repair it through the text-generation service.
    Repair(RepairArgs),
    /// Generate drafts for one or more platforms and repair each until compliant.
    Generate(GenerateArgs),
    /// Explain what a rule checks and how to fix its violations.
    Explain(ExplainArgs),
    /// List all built-in rules.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Minimum trimmed length in chars (overrides rules.min_chars).
    #[arg(long)]
    min_chars: Option<usize>,

    /// Rule id to skip (repeatable; extends rules.disabled).
    #[arg(long = "disable")]
    disable: Vec<String>,

    /// Extra fabrication marker phrase (repeatable; extends rules.extra_fabrication_markers).
    #[arg(long = "marker")]
    markers: Vec<String>,
}

#[derive(Debug, Args)]
struct ServiceArgs {
    /// API key for the text-generation service.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name (overrides client.model).
    #[arg(long)]
    model: Option<String>,

    /// Service base URL (overrides client.base_url).
    #[arg(long)]
    base_url: Option<String>,

    /// Attempts per service call (overrides retry.max_attempts).
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Artifact JSON file, or a plain-text draft.
    file: Utf8PathBuf,

    /// Target platform; enables the length rule.
    #[arg(long)]
    platform: Option<Platform>,

    /// Locale for plain-text input (default: en-US).
    #[arg(long)]
    locale: Option<String>,

    #[command(flatten)]
    rules: RuleArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct RepairArgs {
    /// Artifact JSON file, or a plain-text draft.
    file: Utf8PathBuf,

    /// Target platform; enables the length rule.
    #[arg(long)]
    platform: Option<Platform>,

    /// Locale for plain-text input (default: en-US).
    #[arg(long)]
    locale: Option<String>,

    /// Where to write the compliant artifact (default: <out_dir>/<id>.json).
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Where to write the run report (default: <out_dir>/<id>.report.json).
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Output directory (default: <root>/artifacts/draftfix).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Repairs already spent on this artifact by an earlier run.
    #[arg(long, default_value_t = 0)]
    resume_depth: u32,

    #[command(flatten)]
    rules: RuleArgs,

    #[command(flatten)]
    service: ServiceArgs,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    /// Content pillar to write about (e.g., "ios_swift").
    #[arg(long)]
    pillar: String,

    /// Target platform (repeatable; default: all platforms).
    #[arg(long = "platform")]
    platforms: Vec<Platform>,

    /// Locale of the generated drafts (default: en-US).
    #[arg(long)]
    locale: Option<String>,

    /// Output directory (default: <root>/artifacts/draftfix).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    rules: RuleArgs,

    #[command(flatten)]
    service: ServiceArgs,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g., "fabrication-marker").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(&cli.root, args),
        Command::Prompt(args) => cmd_prompt(&cli.root, args),
        Command::Repair(args) => runtime()?.block_on(cmd_repair(&cli.root, args)),
        Command::Generate(args) => runtime()?.block_on(cmd_generate(&cli.root, args)),
        Command::Explain(args) => cmd_explain(args),
        Command::ListRules(args) => cmd_list_rules(args),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("start async runtime")
}

fn merged_config(
    root: &Utf8Path,
    platform: Option<Platform>,
    rules: &RuleArgs,
    service: Option<&ServiceArgs>,
) -> anyhow::Result<MergedConfig> {
    let file_config = config::load_or_default(root).context("load draftfix.toml config")?;
    let overrides = CliOverrides {
        platform,
        min_chars: rules.min_chars,
        disabled: rules.disable.clone(),
        markers: rules.markers.clone(),
        model: service.and_then(|s| s.model.clone()),
        base_url: service.and_then(|s| s.base_url.clone()),
        max_attempts: service.and_then(|s| s.max_attempts),
    };
    let merged = ConfigMerger::new(file_config, root).merge(&overrides);
    debug!(
        "merged config: rules={:?}, model={}, base_url={}, retry={:?}",
        merged.rules, merged.model, merged.base_url, merged.retry
    );
    Ok(merged)
}

fn build_client(merged: &MergedConfig, service: &ServiceArgs) -> anyhow::Result<MessagesClient> {
    let Some(api_key) = service.api_key.clone().filter(|k| !k.trim().is_empty()) else {
        anyhow::bail!("missing API key: pass --api-key or set ANTHROPIC_API_KEY");
    };
    let system_prompt = merged.load_system_prompt()?;
    MessagesClient::new(merged.client_config(api_key, system_prompt), merged.retry)
        .context("configure text-generation client")
}

fn rule_engine(merged: &MergedConfig, platform: Option<Platform>) -> anyhow::Result<RuleEngine> {
    RuleEngine::from_config(&merged.rules_for(platform)).context("configure rules")
}

fn cmd_check(root: &Utf8Path, args: CheckArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(root, args.platform, &args.rules, None)?;
    let engine = rule_engine(&merged, args.platform)?;
    let locale = args.locale.map(Locale::new);
    let artifact = input::load_artifact(&args.file, locale.as_ref())?;

    let outcome = engine.evaluate(&artifact);
    match args.format {
        OutputFormat::Text => {
            if outcome.needs_repair() {
                println!("{}: {} violation(s)", artifact.id(), outcome.violations().len());
                for v in outcome.violations() {
                    println!("  - {}", v);
                }
            } else {
                println!("{}: ok", artifact.id());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "id": artifact.id(),
                "needs_repair": outcome.needs_repair(),
                "violations": outcome.violations(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(if outcome.needs_repair() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_prompt(root: &Utf8Path, args: CheckArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(root, args.platform, &args.rules, None)?;
    let engine = rule_engine(&merged, args.platform)?;
    let locale = args.locale.map(Locale::new);
    let artifact = input::load_artifact(&args.file, locale.as_ref())?;

    let outcome = engine.evaluate(&artifact);
    if !outcome.needs_repair() {
        eprintln!("{}: no violations, nothing to repair", artifact.id());
        return Ok(ExitCode::SUCCESS);
    }
    println!("{}", build_repair_prompt(&artifact, outcome.violations()));
    Ok(ExitCode::SUCCESS)
}

async fn cmd_repair(root: &Utf8Path, args: RepairArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(root, args.platform, &args.rules, Some(&args.service))?;
    let checker = RuleEngineChecker::new(rule_engine(&merged, args.platform)?);
    let locale = args.locale.map(Locale::new);
    let artifact = input::load_artifact(&args.file, locale.as_ref())?;
    let client = build_client(&merged, &args.service)?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| root.join("artifacts").join("draftfix"));
    let stem = input::file_stem(artifact.id());
    let out_path = args
        .out
        .unwrap_or_else(|| out_dir.join(format!("{stem}.json")));
    let report_path = args
        .report
        .unwrap_or_else(|| out_dir.join(format!("{stem}.report.json")));

    let settings = RepairSettings {
        platform: args.platform,
        resume_depth: args.resume_depth,
    };
    let outcome = run_repair(&settings, &checker, &client, artifact, tool_info()).await;

    if let Some(repaired) = outcome.artifact() {
        write_json(&out_path, repaired)?;
        info!("wrote compliant artifact to {}", out_path);
    }
    write_json(&report_path, &outcome.report)?;
    info!("wrote report to {}", report_path);

    log_outcome(&outcome);
    println!("{}: {}", outcome.report.artifact.id, status_label(outcome.report.status));
    Ok(ExitCode::from(outcome.exit_code()))
}

/// Result of one platform in `generate`.
struct PlatformRun {
    platform: Platform,
    artifact: Option<Artifact>,
    report: RepairReport,
}

async fn cmd_generate(root: &Utf8Path, args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(root, None, &args.rules, Some(&args.service))?;
    let client = Arc::new(build_client(&merged, &args.service)?);
    let locale = args.locale.map(Locale::new).unwrap_or_default();

    let mut platforms = if args.platforms.is_empty() {
        Platform::ALL.to_vec()
    } else {
        args.platforms
    };
    platforms.sort();
    platforms.dedup();

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| root.join("artifacts").join("draftfix"));

    let mut tasks = JoinSet::new();
    for platform in platforms {
        let checker = RuleEngineChecker::new(rule_engine(&merged, Some(platform))?);
        let client = Arc::clone(&client);
        let pillar = args.pillar.clone();
        let locale = locale.clone();
        tasks.spawn(async move { generate_one(&client, &checker, &pillar, platform, locale).await });
    }

    let mut runs = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        runs.push(joined.context("generation task panicked")?);
    }
    runs.sort_by_key(|r| r.platform);

    let mut exit = 0u8;
    for run in &runs {
        if let Some(artifact) = &run.artifact {
            write_json(&out_dir.join(format!("{}.json", run.platform)), artifact)?;
        }
        write_json(
            &out_dir.join(format!("{}.report.json", run.platform)),
            &run.report,
        )?;
        println!("{}: {}", run.platform, status_label(run.report.status));

        exit = match (exit, run.report.status) {
            (_, RepairStatus::ServiceError) | (1, _) => 1,
            (_, RepairStatus::NeedsReview) => 2,
            (prev, RepairStatus::Compliant) => prev,
        };
    }
    info!("wrote {} platform run(s) to {}", runs.len(), out_dir);
    Ok(ExitCode::from(exit))
}

async fn generate_one(
    client: &MessagesClient,
    checker: &RuleEngineChecker,
    pillar: &str,
    platform: Platform,
    locale: Locale,
) -> PlatformRun {
    let started_at = Utc::now();
    let id = ArtifactId::generate();

    let text = match client.generate(pillar, platform).await {
        Ok(text) => text,
        Err(e) => {
            warn!(platform = %platform, error = %e, "initial generation failed");
            let mut report = RepairReport::new(
                tool_info(),
                RunInfo {
                    started_at,
                    ended_at: Some(Utc::now()),
                },
                ReportArtifact {
                    id: id.to_string(),
                    locale: locale.to_string(),
                    revision: 0,
                    platform: Some(platform.to_string()),
                    content_sha256: None,
                },
                RepairStatus::ServiceError,
            );
            report.message = Some(format!("generation failed: {e}"));
            report.data = Some(serde_json::json!({ "pillar": pillar }));
            return PlatformRun {
                platform,
                artifact: None,
                report,
            };
        }
    };

    let settings = RepairSettings {
        platform: Some(platform),
        ..RepairSettings::default()
    };
    let draft = Artifact::new(id, text, locale);
    let outcome = run_repair(&settings, checker, client, draft, tool_info()).await;
    log_outcome(&outcome);

    let RepairOutcome { result, mut report } = outcome;
    report.run.started_at = started_at;
    let mut data = match report.data.take() {
        Some(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    data.insert("pillar".to_string(), serde_json::Value::from(pillar));
    report.data = Some(serde_json::Value::Object(data));

    PlatformRun {
        platform,
        artifact: result.ok(),
        report,
    }
}

fn log_outcome(outcome: &RepairOutcome) {
    let id = &outcome.report.artifact.id;
    match &outcome.result {
        Ok(a) => info!(artifact_id = %id, revision = a.revision(), "artifact compliant"),
        Err(e) if e.needs_manual_review() => warn!(artifact_id = %id, "{}", e),
        Err(e) => error!(artifact_id = %id, "{}", e),
    }
}

fn status_label(status: RepairStatus) -> &'static str {
    match status {
        RepairStatus::Compliant => "compliant",
        RepairStatus::NeedsReview => "needs manual review",
        RepairStatus::ServiceError => "service error",
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "draftfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<ExitCode> {
    use explain::{list_rule_ids, lookup_rule};

    let Some(rule) = lookup_rule(&args.rule) else {
        let available = list_rule_ids().join(", ");
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available
        );
    };

    println!("================================================================================");
    println!("RULE: {}", rule.title);
    println!("================================================================================");
    println!();
    println!("Id:      {}", rule.id);
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.description);
    println!();

    println!("SETTINGS");
    println!("--------------------------------------------------------------------------------");
    for setting in rule.settings {
        println!("  - {}", setting);
    }
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.remediation);
    println!();

    Ok(ExitCode::SUCCESS)
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<ExitCode> {
    use explain::RULE_REGISTRY;

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<22} TITLE", "ID");
            println!("  {:<22} -----", "--");
            for rule in RULE_REGISTRY {
                println!("  {:<22} {}", rule.id, rule.title);
            }
            println!();
            println!("Use 'draftfix explain <id>' for details.");
        }
        OutputFormat::Json => {
            let rules: Vec<_> = RULE_REGISTRY
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.id,
                        "title": r.title,
                        "settings": r.settings,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
