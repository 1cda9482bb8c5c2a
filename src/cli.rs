//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the PersonaWeb engine.

use clap::{Args, Parser, Subcommand};

use crate::signal::StaticEnvironment;

/// PersonaWeb Engine - Client-side personalization engine
///
/// Collects page and visitor signals, scores them into a persona decision,
/// and renders the matching hero variant with single-flight transitions.
#[derive(Parser, Debug)]
#[command(name = "personaweb")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Simulated page environment shared by the run and decide commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page URL including the query string
    #[arg(long, env = "PERSONAWEB_PAGE_URL")]
    pub url: Option<String>,

    /// Referrer URL
    #[arg(long, env = "PERSONAWEB_REFERRER")]
    pub referrer: Option<String>,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// Meta description content
    #[arg(long)]
    pub meta_description: Option<String>,

    /// First top-level heading text
    #[arg(long)]
    pub heading: Option<String>,
}

impl PageArgs {
    /// Build the fixed environment the collector reads from.
    pub fn to_environment(&self) -> StaticEnvironment {
        let mut env = StaticEnvironment::new();
        if let Some(ref url) = self.url {
            env = env.with_url(url);
        }
        if let Some(ref referrer) = self.referrer {
            env = env.with_referrer(referrer);
        }
        if let Some(ref title) = self.title {
            env = env.with_title(title);
        }
        if let Some(ref meta) = self.meta_description {
            env = env.with_meta_description(meta);
        }
        if let Some(ref heading) = self.heading {
            env = env.with_heading(heading);
        }
        env
    }
}

/// Available commands for the engine
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive demo (decide, render, auto-cycle, preview)
    Run {
        /// Path to configuration file
        #[arg(short, long, env = "PERSONAWEB_CONFIG")]
        config: Option<String>,

        #[command(flatten)]
        page: PageArgs,

        /// Write the current hero markup to this file on every transition
        #[arg(long)]
        html_out: Option<String>,

        /// Start the auto-cycle immediately
        #[arg(long)]
        cycle: bool,
    },

    /// Make one decision from the given signals and print it as JSON
    Decide {
        /// Path to configuration file
        #[arg(short, long, env = "PERSONAWEB_CONFIG")]
        config: Option<String>,

        #[command(flatten)]
        page: PageArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Persona and template inspection
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List all personas and their hero templates
    List,

    /// Show one persona's template in detail
    Show {
        /// Persona id: buy_now, compare, gaming, budget
        persona: String,

        /// Print the assembled hero markup instead of the summary
        #[arg(long)]
        html: bool,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
