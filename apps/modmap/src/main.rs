//! # Modmap - Architecture Discovery CLI
//!
//! The main binary for the modmap query engine.
//!
//! This application provides:
//! - CLI access to the module catalog (list / get / related)
//! - Fuzzy search across every entity category
//! - Complexity ranking and SLO reporting
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               apps/modmap (THE BINARY)              │
//! │                                                     │
//! │   ┌─────────────┐        ┌─────────────────────┐   │
//! │   │    CLI      │        │   Output rendering  │   │
//! │   │   (clap)    │        │  (text / envelope)  │   │
//! │   └──────┬──────┘        └──────────┬──────────┘   │
//! │          │                          │               │
//! │          └────────────┬─────────────┘               │
//! │                       ▼                             │
//! │               ┌───────────────┐                     │
//! │               │  modmap-core  │                     │
//! │               │  (THE LOGIC)  │                     │
//! │               └───────────────┘                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Overview of the configured datasets
//! modmap --catalog catalog.db
//!
//! # Catalog operations
//! modmap list modules --keyword partner
//! modmap get interface partner-api
//! modmap related team team-payments
//!
//! # Cross-category fuzzy search
//! modmap search paymnt --limit 5
//!
//! # Derived metrics
//! modmap top --count 10
//! modmap --slo-db slo.db slo slo-checkout-availability
//! ```

use clap::Parser;
use modmap::cli;
use modmap_core::Response;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing — MODMAP_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MODMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "modmap=debug,modmap_core=debug"
    } else {
        "modmap=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // The banner would corrupt envelope output, so JSON mode implies quiet.
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    let json_mode = cli.json_mode;
    if let Err(e) = cli::execute(cli) {
        if json_mode {
            println!(
                "{}",
                serde_json::to_string_pretty(&Response::<()>::failure(&e)).unwrap_or_default()
            );
        } else {
            tracing::error!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Print the modmap startup banner.
fn print_banner() {
    println!(
        r"
  ███╗   ███╗ ██████╗ ██████╗ ███╗   ███╗ █████╗ ██████╗
  ████╗ ████║██╔═══██╗██╔══██╗████╗ ████║██╔══██╗██╔══██╗
  ██╔████╔██║██║   ██║██║  ██║██╔████╔██║███████║██████╔╝
  ██║╚██╔╝██║██║   ██║██║  ██║██║╚██╔╝██║██╔══██║██╔═══╝
  ██║ ╚═╝ ██║╚██████╔╝██████╔╝██║ ╚═╝ ██║██║  ██║██║
  ╚═╝     ╚═╝ ╚═════╝ ╚═════╝ ╚═╝     ╚═╝╚═╝  ╚═╝╚═╝

  Architecture Discovery v{}

  Catalog • Complexity • SLOs
",
        env!("CARGO_PKG_VERSION")
    );
}
