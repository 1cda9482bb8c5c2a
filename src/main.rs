//! PersonaWeb Engine - Client-side personalization engine
//!
//! This is the main entry point for the personaweb binary. The engine
//! collects visitor signals, scores them into a persona decision, and
//! renders the matching hero variant, with an optional auto-cycle that
//! rotates through all variants.

mod cli;
mod config;
mod engine;
mod error;
mod logging;
mod persona;
mod render;
mod session;
mod signal;
mod telemetry;
mod transition;
mod version;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::{Cli, Commands, ConfigSubcommand, PageArgs, PersonaSubcommand};
use crate::config::EngineConfig;
use crate::engine::{DecisionEngine, RemoteDelegate};
use crate::error::{Error, Result};
use crate::logging::LogGuards;
use crate::persona::{Persona, TemplateRegistry};
use crate::render::{build_hero_html, ConsoleRenderSink, HtmlRenderSink, SharedRenderSink};
use crate::session::{FileSessionStore, MemorySessionStore, SharedSessionStore};
use crate::signal::SignalCollector;
use crate::telemetry::{MemoryTelemetry, TelemetrySink};
use crate::transition::{AutoCycle, TransitionController};

fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    // For commands that don't need full logging, use simple setup
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone());
        }
        Commands::Persona { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_persona_command(subcommand.clone());
        }
        _ => {}
    }

    let config_path = match &cli.command {
        Commands::Run { config, .. } | Commands::Decide { config, .. } => config.clone(),
        _ => None,
    };

    // Load config (or use defaults)
    let config = match EngineConfig::load(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    // The guards must be kept alive for the lifetime of the program
    let _log_guards: LogGuards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting PersonaWeb engine"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("personaweb")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    match cli.command {
        Commands::Run {
            page,
            html_out,
            cycle,
            ..
        } => runtime.block_on(run_demo(config, page, html_out, cycle)),
        Commands::Decide { page, pretty, .. } => {
            runtime.block_on(run_decide(config, page, pretty))
        }
        Commands::Version | Commands::Config { .. } | Commands::Persona { .. } => {
            // Already handled above
            unreachable!();
        }
    }
}

/// Session store from configuration: file-backed when a store file is set.
fn build_session(config: &EngineConfig) -> SharedSessionStore {
    match config.session.store_file {
        Some(ref path) => Arc::new(FileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::new()),
    }
}

/// Decision engine from configuration, with the remote delegate attached
/// when an endpoint is configured.
fn build_engine(config: &EngineConfig) -> DecisionEngine {
    let mut engine = DecisionEngine::new(config.fallback_persona());
    if let Some(ref endpoint) = config.engine.remote_endpoint {
        engine = engine.with_remote(RemoteDelegate::new(
            endpoint.clone(),
            Duration::from_secs(config.engine.remote_timeout_secs),
        ));
    }
    engine
}

/// Run the interactive demo: initial decision, then a stdin control loop.
async fn run_demo(
    config: EngineConfig,
    page: PageArgs,
    html_out: Option<String>,
    cycle_on_start: bool,
) -> Result<()> {
    let registry = TemplateRegistry::load()?;
    let session = build_session(&config);
    let collector = SignalCollector::new(Arc::new(page.to_environment()), session.clone());
    let telemetry = Arc::new(MemoryTelemetry::new());

    let render: SharedRenderSink = match html_out {
        Some(ref path) => Arc::new(HtmlRenderSink::new(path)),
        None => Arc::new(ConsoleRenderSink::new()),
    };

    let controller = Arc::new(TransitionController::new(
        collector,
        build_engine(&config),
        registry,
        render,
        telemetry.clone(),
        session,
        config.timing.clone(),
        config.fallback_persona(),
    ));

    let cycle = AutoCycle::new(controller.clone(), telemetry.clone(), config.timing.cycle());

    // Initial decision from the simulated page
    controller.evaluate().await;

    if cycle_on_start {
        cycle.start();
    }

    println!();
    println!("Commands: 1-4 show persona · c toggle cycle · r reset · d dump decision · s stats · x click CTA · q quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "q" | "quit" => break,
                    "c" => {
                        let running = cycle.toggle();
                        println!("auto-cycle {}", if running { "on" } else { "off" });
                    }
                    "r" => {
                        cycle.stop();
                        controller.reset();
                        println!("session cleared");
                    }
                    "d" => match controller.last_decision() {
                        Some(decision) => {
                            let dump = serde_json::to_string_pretty(&decision)
                                .map_err(|e| Error::Internal(e.to_string()))?;
                            println!("{}", dump);
                        }
                        None => println!("no decision yet"),
                    },
                    "s" => print_stats(&telemetry),
                    "x" => match controller.current() {
                        Some(persona) => {
                            telemetry.track("cta_click", json!({ "persona": persona.slug() }));
                            println!("CTA clicked for {}", persona.slug());
                        }
                        None => println!("nothing showing yet"),
                    },
                    digit @ ("1" | "2" | "3" | "4") => {
                        // A user-directed switch always pre-empts the cycle
                        cycle.stop();
                        let index = digit.parse::<usize>().unwrap_or(1) - 1;
                        let persona = Persona::all()[index];
                        controller.select(persona).await;
                    }
                    "" => {}
                    other => {
                        warn!(input = %other, "Unknown demo command");
                        println!("unknown command: {}", other);
                    }
                }
            }
        }
    }

    cycle.stop();
    info!("Demo shutting down");
    Ok(())
}

/// Print the telemetry event log and CTA click counts.
fn print_stats(telemetry: &MemoryTelemetry) {
    let events = telemetry.events();
    println!("events ({}):", events.len());
    for event in events.iter().rev().take(10) {
        println!(
            "  {} {} {}",
            event.timestamp.format("%H:%M:%S"),
            event.name,
            event.payload
        );
    }
    let clicks = telemetry.cta_clicks();
    if clicks.is_empty() {
        println!("cta clicks: none");
    } else {
        println!("cta clicks:");
        for (persona, count) in clicks {
            println!("  {}: {}", persona, count);
        }
    }
}

/// One-shot decision: collect, decide, print JSON, exit.
async fn run_decide(config: EngineConfig, page: PageArgs, pretty: bool) -> Result<()> {
    let session = build_session(&config);
    let collector = SignalCollector::new(Arc::new(page.to_environment()), session);

    let signals = collector.collect();
    let decision = build_engine(&config).decide(signals).await;

    let output = if pretty {
        serde_json::to_string_pretty(&decision)
    } else {
        serde_json::to_string(&decision)
    }
    .map_err(|e| Error::Internal(e.to_string()))?;

    println!("{}", output);
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = EngineConfig::load(config.as_deref())?;
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(|e| Error::Internal(format!("Failed to render config: {}", e)))?;
            println!("{}", rendered);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate { config } => match EngineConfig::load(config.as_deref()) {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        },
    }

    Ok(())
}

/// Handle persona inspection subcommands
fn handle_persona_command(subcommand: PersonaSubcommand) -> Result<()> {
    let registry = TemplateRegistry::load()?;

    match subcommand {
        PersonaSubcommand::List => {
            println!("{:<10} {:<14} {:<8} headline", "id", "label", "theme");
            for persona in registry.personas() {
                let template = registry.get(*persona);
                println!(
                    "{:<10} {:<14} {:<8} {}",
                    persona.slug(),
                    template.label,
                    template.theme.slug(),
                    template.headline
                );
            }
        }
        PersonaSubcommand::Show { persona, html } => {
            let persona: Persona = persona.parse().map_err(Error::Config)?;
            let template = registry.get(persona);

            if html {
                println!("{}", build_hero_html(persona, template));
            } else {
                println!("id:          {}", persona.slug());
                println!("label:       {}", template.label);
                println!("theme:       {}", template.theme.slug());
                println!("badge:       {} {}", template.badge.icon, template.badge.text);
                println!("headline:    {}", template.headline);
                println!("subheadline: {}", template.subheadline);
                println!("cta:         {} {}", template.cta.icon, template.cta.text);
                println!("extras:      {:?}", template.extras);
            }
        }
    }

    Ok(())
}
