//! # Modmap CLI Module
//!
//! This module implements the CLI interface for modmap.
//!
//! ## Available Commands
//!
//! - `list` - List a catalog category, optionally keyword-filtered
//! - `get` - Fetch one fully hydrated entity by identifier
//! - `related` - List modules related to an anchor entity
//! - `search` - Fuzzy search identifiers across every category
//! - `top` - Rank modules by complexity score
//! - `slo` - Fetch one SLO with derived metrics
//! - `slos` - List SLOs, filtered by keyword, team, or application
//!
//! Without a subcommand, prints an overview of the configured datasets.

mod commands;

use clap::{Parser, Subcommand};
use modmap_core::{Engine, ModmapError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Modmap - Architecture Discovery CLI
///
/// A read-only query engine over a module catalog and an SLO dataset.
/// Misses come back with ranked "did you mean" suggestions instead of
/// bare errors.
#[derive(Parser, Debug)]
#[command(name = "modmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the catalog database
    #[arg(short = 'C', long, global = true, default_value = "catalog.db")]
    pub catalog: PathBuf,

    /// Path to the SLO database (SLO commands fail without it)
    #[arg(short = 'S', long, global = true)]
    pub slo_db: Option<PathBuf>,

    /// Output response envelopes in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a catalog category
    List {
        /// Category (module, interface, team, database, flow, kind, slo)
        category: String,

        /// Case-sensitive substring filter on identifiers
        #[arg(short, long, default_value = "")]
        keyword: String,
    },

    /// Fetch one entity by identifier
    Get {
        /// Category of the entity
        category: String,

        /// Entity identifier
        id: String,
    },

    /// List modules related to an anchor entity
    Related {
        /// Anchor category (team, database, interface, flow, kind)
        category: String,

        /// Anchor identifier
        id: String,
    },

    /// Fuzzy search identifiers across every category
    Search {
        /// Search keyword
        keyword: String,

        /// Maximum hits per category
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Rank modules by complexity score
    Top {
        /// Number of modules to return
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Fetch one SLO with derived metrics
    Slo {
        /// SLO identifier
        id: String,
    },

    /// List SLOs
    Slos {
        /// Case-sensitive substring filter on identifiers
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// Exact team filter (overrides --keyword)
        #[arg(short, long)]
        team: Option<String>,

        /// Exact application filter (overrides --keyword)
        #[arg(short, long)]
        application: Option<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ModmapError> {
    let engine = Engine::open(&cli.catalog, cli.slo_db.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::List { category, keyword }) => {
            cmd_list(&engine, &category, &keyword, json_mode)
        }
        Some(Commands::Get { category, id }) => cmd_get(&engine, &category, &id, json_mode),
        Some(Commands::Related { category, id }) => cmd_related(&engine, &category, &id, json_mode),
        Some(Commands::Search { keyword, limit }) => cmd_search(&engine, &keyword, limit, json_mode),
        Some(Commands::Top { count }) => cmd_top(&engine, count, json_mode),
        Some(Commands::Slo { id }) => cmd_slo(&engine, &id, json_mode),
        Some(Commands::Slos {
            keyword,
            team,
            application,
        }) => cmd_slos(
            &engine,
            &keyword,
            team.as_deref(),
            application.as_deref(),
            json_mode,
        ),
        None => {
            // No subcommand - show dataset overview by default
            cmd_overview(&engine, &cli.catalog, cli.slo_db.as_deref(), json_mode)
        }
    }
}
