//! Trainplan - training plan synthesis
//!
//! CLI entry point for building plans and inspecting prompts, raw responses
//! and saved plans.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::{info, warn};

use trainplan::cli::{Cli, Command};
use trainplan::config::Config;
use trainplan::domain::PlanRequest;
use trainplan::{
    PlanOrchestrator, PromptComposer, PromptLoader, RateLimitedGenerator, ResponseCache, Throttle, create_client,
    parse_plan, parse_week, summarize, summarize_plan,
};
use workoutindex::WorkoutIndex;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trainplan")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("trainplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only the log level is read before logging starts
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "Trainplan loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Build {
            request,
            run_id,
            cache_dir,
            output,
            refresh,
        } => cmd_build(&config, &request, run_id, cache_dir, output, refresh).await,
        Command::Prompt { request, week, summary } => cmd_prompt(&config, &request, week, summary.as_deref()),
        Command::Parse { file, plan } => cmd_parse(&file, plan),
        Command::Summarize { file } => cmd_summarize(&file),
    }
}

fn load_request(path: &Path) -> Result<PlanRequest> {
    let content = fs::read_to_string(path).context(format!("Failed to read request {}", path.display()))?;
    // YAML is a superset of JSON, so one parser covers both
    let request: PlanRequest =
        serde_yaml::from_str(&content).context(format!("Invalid plan request {}", path.display()))?;
    request.validate().map_err(|e| eyre!("Invalid plan request {}: {}", path.display(), e))?;
    Ok(request)
}

/// Composer with reference retrieval when an index is configured
fn build_composer(config: &Config) -> PromptComposer {
    let composer = PromptComposer::new(PromptLoader::from_dir(config.prompts.dir.as_deref()));

    let Some(index_path) = &config.search.index_path else {
        return composer;
    };
    match WorkoutIndex::open(index_path) {
        Ok(index) => {
            info!("Using {} reference workouts from {}", index.len(), index.path().display());
            composer.with_retriever(Arc::new(index), config.search.references)
        }
        Err(e) => {
            warn!("Reference index unavailable, continuing without it: {:#}", e);
            composer
        }
    }
}

async fn cmd_build(
    config: &Config,
    request_path: &Path,
    run_id: Option<String>,
    cache_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    refresh: bool,
) -> Result<()> {
    let request = load_request(request_path)?;
    config.validate()?;

    let composer = build_composer(config);
    let client = create_client(&config.llm)?;
    let throttle = Arc::new(Throttle::new(config.throttle.min_interval()));
    let generator = RateLimitedGenerator::new(client, throttle)
        .with_system_prompt(composer.system_prompt()?)
        .with_max_tokens(config.llm.max_tokens)
        .with_json_mode(config.llm.json_mode);

    let run_id = run_id.unwrap_or_else(ResponseCache::new_run_id);
    let cache_root = cache_dir.unwrap_or_else(|| config.cache.dir.clone());
    let cache = ResponseCache::for_run(&cache_root, &run_id);
    eprintln!("Run {} (cache: {})", run_id, cache.dir().display());

    let orchestrator = PlanOrchestrator::new(composer, generator, cache).with_refresh(refresh);

    // Dropping the build future is safe: cache entries are written atomically
    let result = tokio::select! {
        result = orchestrator.build(&request) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Build interrupted");
            return Err(eyre!("Interrupted; resume with --run-id {}", run_id));
        }
    };
    let plan = result.inspect_err(|e| {
        if let Some(wait) = e.retry_after() {
            eprintln!(
                "Provider rate limit hit; wait {}s, then resume with --run-id {}",
                wait.as_secs(),
                run_id
            );
        }
    })?;

    let json = serde_json::to_string_pretty(&plan)?;
    match output {
        Some(path) => {
            fs::write(&path, json).context(format!("Failed to write plan to {}", path.display()))?;
            eprintln!("Wrote {} ({} weeks) to {}", plan.name, plan.weeks.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_prompt(config: &Config, request_path: &Path, week: u32, summary: Option<&str>) -> Result<()> {
    let request = load_request(request_path)?;
    let composer = build_composer(config);
    println!("{}", composer.compose(&request, week, summary.unwrap_or_default())?);
    Ok(())
}

/// Raw response text, unwrapped from a cache envelope when the file is one
fn read_raw_response(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(&content)
        && let Some(raw) = map
            .get("raw_response")
            .or_else(|| map.get("openai_response"))
            .and_then(|v| v.as_str())
    {
        return Ok(raw.to_string());
    }
    Ok(content)
}

fn cmd_parse(path: &Path, as_plan: bool) -> Result<()> {
    let raw = read_raw_response(path)?;
    if as_plan {
        let plan = parse_plan(&raw)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let week = parse_week(&raw)?;
        println!("{}", summarize(&week));
    }
    Ok(())
}

fn cmd_summarize(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let plan = parse_plan(&content)?;

    println!("{}", plan.name);
    for (idx, summary) in summarize_plan(&plan).iter().enumerate() {
        println!("Week {}: {}", idx + 1, summary);
    }
    Ok(())
}
