//! # Sprout - Gamified Savings App
//!
//! The main binary for the Sprout savings engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for shop, goal, claim, and theme operations
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/sprout (THE BINARY)              │
//! │                                                      │
//! │   ┌─────────────┐           ┌─────────────┐          │
//! │   │   CLI       │           │   HTTP API  │          │
//! │   │  (clap)     │           │   (axum)    │          │
//! │   └──────┬──────┘           └──────┬──────┘          │
//! │          │                         │                 │
//! │          └────────────┬────────────┘                 │
//! │                       ▼                              │
//! │               ┌───────────────┐                      │
//! │               │  sprout-core  │                      │
//! │               │  (THE LOGIC)  │                      │
//! │               └───────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! sprout server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! sprout status
//! sprout shop
//! sprout claim
//! sprout goal create -i bike -n "New bike" -t 2500000
//! ```

use clap::Parser;
use sprout::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — SPROUT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SPROUT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sprout=info,tower_http=debug".into());

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

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Sprout startup banner.
fn print_banner() {
    println!(
        r"
  ███████╗██████╗ ██████╗  ██████╗ ██╗   ██╗████████╗
  ██╔════╝██╔══██╗██╔══██╗██╔═══██╗██║   ██║╚══██╔══╝
  ███████╗██████╔╝██████╔╝██║   ██║██║   ██║   ██║
  ╚════██║██╔═══╝ ██╔══██╗██║   ██║██║   ██║   ██║
  ███████║██║     ██║  ██║╚██████╔╝╚██████╔╝   ██║
  ╚══════╝╚═╝     ╚═╝  ╚═╝ ╚═════╝  ╚═════╝    ╚═╝

  Gamified Savings v{}

  Deterministic • Playful • Yours
",
        env!("CARGO_PKG_VERSION")
    );
}
