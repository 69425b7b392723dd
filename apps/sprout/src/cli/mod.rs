//! # Sprout CLI Module
//!
//! This module implements the CLI interface for Sprout.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show wallet and profile status
//! - `shop` - List the shop with this week's discount
//! - `buy` - Purchase a catalog item
//! - `claim` - Claim daily collection rewards
//! - `goal` - Create and manage savings goals
//! - `theme` - Derive a custom color theme
//! - `export` - Export the profile snapshot to a file
//! - `import` - Import a profile snapshot from a file
//! - `init` - Initialize a new database

mod commands;

use clap::{Parser, Subcommand};
use sprout_core::SproutError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sprout - Gamified Savings
///
/// Budgets, goals, and cosmetics over a deterministic engine: the same
/// catalog and date always produce the same discount, stage, and rewards.
#[derive(Parser, Debug)]
#[command(name = "sprout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the profile database
    #[arg(short = 'D', long, global = true, default_value = "sprout.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show wallet and profile status
    Status,

    /// List the shop catalog with this week's discount
    Shop {
        /// Pin the calendar date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Purchase a catalog item
    Buy {
        /// Item id to purchase
        item_id: String,

        /// Pin the calendar date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Claim daily collection rewards
    Claim {
        /// Pin the calendar date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Create and manage savings goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Derive and store a custom color theme
    Theme {
        /// Theme name
        #[arg(short, long)]
        name: String,

        /// Primary color (hex, "R G B", or "r,g,b")
        #[arg(short, long)]
        primary: String,

        /// Accent color
        #[arg(short, long)]
        accent: String,

        /// Card background color
        #[arg(short, long)]
        card: String,

        /// Solid app background color
        #[arg(long)]
        background_color: Option<String>,

        /// Background image reference (takes precedence over the color)
        #[arg(long)]
        background_image: Option<String>,
    },

    /// Export the profile snapshot to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a profile snapshot from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Goal management subcommands.
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Create a new goal
    Create {
        /// Goal id
        #[arg(short, long)]
        id: String,

        /// Goal name
        #[arg(short, long)]
        name: String,

        /// Target amount; omit for an open-ended (infinite) goal
        #[arg(short, long)]
        target: Option<f64>,

        /// Visualization: "plant" or "pet"
        #[arg(long, default_value = "plant")]
        visual: String,

        /// Cosmetic skin id
        #[arg(short, long)]
        skin: Option<String>,
    },

    /// List goals with progress and stage
    List,

    /// Deposit into a goal
    Deposit {
        /// Goal id
        id: String,

        /// Amount to deposit
        amount: f64,

        /// Pin the calendar date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Withdraw from a goal
    Withdraw {
        /// Goal id
        id: String,

        /// Amount to withdraw (capped at the saved balance)
        amount: f64,

        /// Pin the calendar date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Cash out a completed goal
    CashOut {
        /// Goal id
        id: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SproutError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, backend, &host, port).await
        }
        Some(Commands::Status) => cmd_status(&cli.database, backend, json_mode),
        Some(Commands::Shop { date }) => cmd_shop(&cli.database, backend, json_mode, &date),
        Some(Commands::Buy { item_id, date }) => {
            cmd_buy(&cli.database, backend, json_mode, &item_id, &date)
        }
        Some(Commands::Claim { date }) => cmd_claim(&cli.database, backend, json_mode, &date),
        Some(Commands::Goal { command }) => {
            cmd_goal(&cli.database, backend, json_mode, command)
        }
        Some(Commands::Theme {
            name,
            primary,
            accent,
            card,
            background_color,
            background_image,
        }) => cmd_theme(
            &cli.database,
            backend,
            json_mode,
            &name,
            &primary,
            &accent,
            &card,
            background_color,
            background_image,
        ),
        Some(Commands::Export { output }) => cmd_export(&cli.database, backend, &output),
        Some(Commands::Import { input }) => cmd_import(&cli.database, backend, &input),
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, backend, json_mode)
        }
    }
}
