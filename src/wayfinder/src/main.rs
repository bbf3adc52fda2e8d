//! Wayfinder resolves where a multi-page web journey goes next.
//!
//! Loads configuration and a journey definition, wires feature-flag guards,
//! and answers "next"/"previous" queries the way a web handler would.

mod guards;
mod journeys;

use std::collections::HashMap;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use wayfinder_core::config::{AppConfig, LoggingConfig, NavigationConfig};
use wayfinder_core::WayfinderResult;
use wayfinder_journey::{Direction, JourneyDefinition, JourneyNavigator, StepRegistry};

#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(about = "Resolve the next or previous step of a multi-page journey")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Journey definition file (overrides config)
    #[arg(long, global = true)]
    journey: Option<String>,

    /// Feature flag override, e.g. `--flag survey_enabled=true`
    #[arg(long = "flag", global = true, value_parser = parse_flag)]
    flags: Vec<(String, bool)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the redirect to the step after STEP
    Next {
        step: String,
        /// Path variables, in declared order
        args: Vec<String>,
        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the back-link path to the step before STEP
    Previous {
        step: String,
        args: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Check every link and template in the journey
    Validate,

    /// List the journey's steps
    Steps,
}

fn parse_flag(raw: &str) -> Result<(String, bool), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=true|false, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("flag '{name}' must be true or false"))?;
    Ok((name.trim().to_string(), value))
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // An explicit config file must load; otherwise fall back to defaults.
    let loaded = AppConfig::load_from(cli.config.as_deref());
    let mut config = match (&loaded, &cli.config) {
        (Ok(config), _) => config.clone(),
        (Err(e), Some(path)) => anyhow::bail!("Failed to load config {path}: {e}"),
        (Err(_), None) => AppConfig::default(),
    };

    init_tracing(&config.logging);
    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    config.flags.extend(cli.flags);

    let journey_path = cli.journey.or_else(|| config.journey.definition_path.clone());
    let (definition, registry) = load_journey(journey_path.as_deref()).with_context(|| {
        let source = journey_path.as_deref().unwrap_or("pay-penalty (built in)");
        format!("Failed to load journey {source}")
    })?;
    let registry = Arc::new(registry);
    info!(
        journey = %definition.name,
        steps = registry.len(),
        flags = config.flags.len(),
        "Journey loaded"
    );

    let (direction, step, args, json) = match cli.command {
        Commands::Next { step, args, json } => (Direction::Next, step, args, json),
        Commands::Previous { step, args, json } => (Direction::Previous, step, args, json),
        Commands::Validate => return Ok(validate(&definition, &registry)),
        Commands::Steps => {
            print_steps(&registry);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let navigator = build_navigator(&definition, registry, config.flags, &config.navigation);
    let code = resolve(
        &navigator,
        &config.navigation.fallback_path,
        direction,
        &step,
        &args,
        json,
        &mut std::io::stdout().lock(),
    )?;
    Ok(code)
}

fn load_journey(path: Option<&str>) -> WayfinderResult<(JourneyDefinition, StepRegistry)> {
    let definition = match path {
        Some(path) => JourneyDefinition::load(path)?,
        None => journeys::pay_penalty(),
    };
    let registry = StepRegistry::from_definition(&definition)?;
    Ok((definition, registry))
}

fn build_navigator(
    definition: &JourneyDefinition,
    registry: Arc<StepRegistry>,
    flags: HashMap<String, bool>,
    navigation: &NavigationConfig,
) -> JourneyNavigator {
    let provider = guards::flag_guards(definition, flags);
    JourneyNavigator::new(registry, Arc::new(provider)).with_config(navigation)
}

/// Writes the redirect (next), back-link path (previous) or JSON resolution
/// to `out`. Failed resolutions write the fallback redirect instead.
fn resolve(
    navigator: &JourneyNavigator,
    fallback_path: &str,
    direction: Direction,
    step: &str,
    args: &[String],
    json: bool,
    out: &mut impl Write,
) -> WayfinderResult<ExitCode> {
    match navigator.resolve(&step.into(), direction, args) {
        Ok(resolution) => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?;
            } else if direction == Direction::Next {
                writeln!(out, "{}", navigator.redirect_to(&resolution.path))?;
            } else {
                writeln!(out, "{}", resolution.path)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // Every failure lands on the same fallback page.
            warn!(
                error = %e,
                kind = e.kind(),
                step = %step,
                %direction,
                "Journey resolution failed, redirecting to fallback"
            );
            writeln!(out, "{}", navigator.redirect_to(fallback_path))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn validate(definition: &JourneyDefinition, registry: &StepRegistry) -> ExitCode {
    let problems = registry.problems();
    if problems.is_empty() {
        println!(
            "Journey '{}' is valid ({} steps)",
            definition.name,
            registry.len()
        );
        return ExitCode::SUCCESS;
    }

    for problem in &problems {
        println!("  {problem}");
    }
    println!(
        "Journey '{}' has {} problem(s)",
        definition.name,
        problems.len()
    );
    ExitCode::FAILURE
}

fn print_steps(registry: &StepRegistry) {
    println!(
        "{:<24} {:<12} {:<24} {:<24} TEMPLATES",
        "STEP", "GUARDED", "NEXT", "PREVIOUS"
    );
    for step in registry.steps() {
        let templates: Vec<String> = step
            .templates
            .iter()
            .map(|t| format!("{} ({})", t, t.arity()))
            .collect();
        println!(
            "{:<24} {:<12} {:<24} {:<24} {}",
            step.id.as_str(),
            if step.conditional { "yes" } else { "no" },
            step.next.as_ref().map(|s| s.as_str()).unwrap_or("-"),
            step.previous.as_ref().map(|s| s.as_str()).unwrap_or("-"),
            templates.join(", ")
        );
    }
}
