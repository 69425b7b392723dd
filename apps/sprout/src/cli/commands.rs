//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! The wall clock is read here (and only here): `--date` flags pin the
//! calendar date for deterministic replays, otherwise the local date is
//! passed into the core.

use crate::api;
use crate::api::GoalJson;
use crate::cli::GoalCommands;
use chrono::NaiveDate;
use sprout_core::{
    Session, SproutError, VisualKind, goal_stage, progress_percent, theme::BackgroundSpec,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for snapshot import (32 MB).
///
/// This prevents memory exhaustion from malicious or accidental large
/// files; the format itself enforces a tighter payload limit afterwards.
const MAX_IMPORT_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SproutError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SproutError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SproutError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is
/// an existing regular file, preventing path traversal into directories.
fn validate_file_path(path: &Path) -> Result<PathBuf, SproutError> {
    let canonical = path.canonicalize().map_err(|e| {
        SproutError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SproutError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, SproutError> {
    let parent = path.parent().unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SproutError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(SproutError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SproutError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SESSION / DATE HELPERS
// =============================================================================

/// Open a session on the selected backend.
fn load_session(db_path: &PathBuf, backend: &str) -> Result<Session, SproutError> {
    match backend {
        "memory" => Ok(Session::new()),
        "redb" => Session::with_redb(db_path),
        other => Err(SproutError::IoError(format!(
            "Unknown backend '{}' (expected redb|memory)",
            other
        ))),
    }
}

/// Resolve an optional `--date` flag, defaulting to the local date.
fn resolve_date(raw: &Option<String>) -> Result<NaiveDate, SproutError> {
    match raw {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            SproutError::DeserializationError(format!("Invalid date '{}': {}", s, e))
        }),
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &PathBuf,
    backend: &str,
    host: &str,
    port: u16,
) -> Result<(), SproutError> {
    let session = load_session(db_path, backend)?;

    println!("Sprout Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET  /shop     - Catalog with weekly discount");
    println!("  POST /purchase - Buy an item");
    println!("  POST /claim    - Claim daily rewards");
    println!("  GET  /goals    - List goals and stages");
    println!("  POST /themes   - Derive a theme");
    println!("  GET  /health   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, session).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show wallet and profile status.
pub fn cmd_status(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), SproutError> {
    let session = load_session(db_path, backend)?;
    let profile = session.profile();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "mustika": profile.wallet.mustika,
            "xp": profile.wallet.xp,
            "owned_items": profile.owned().len(),
            "goals": profile.goals().count(),
            "themes": profile.themes().len(),
            "last_claim": profile.claim_ledger.last_claim.map(|d| d.format("%Y-%m-%d").to_string()),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Sprout Profile Status");
    println!("=====================");
    println!("Database: {:?}", db_path);
    println!("Backend:  {}", backend);
    println!();
    println!("Mustika:  {}", profile.wallet.mustika);
    println!("XP:       {}", profile.wallet.xp);
    println!("Owned:    {} items", profile.owned().len());
    println!("Goals:    {}", profile.goals().count());
    println!("Themes:   {}", profile.themes().len());
    match profile.claim_ledger.last_claim {
        Some(date) => println!("Last claim: {}", date.format("%Y-%m-%d")),
        None => println!("Last claim: never"),
    }

    Ok(())
}

// =============================================================================
// SHOP COMMANDS
// =============================================================================

/// List the shop catalog with this week's discount.
pub fn cmd_shop(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    date: &Option<String>,
) -> Result<(), SproutError> {
    let session = load_session(db_path, backend)?;
    let today = resolve_date(date)?;
    let profile = session.profile();
    let offer = session.current_offer(today);

    if json_mode {
        let items: Vec<api::ShopItemJson> = session
            .catalog()
            .iter()
            .map(|item| api::ShopItemJson::from_item(item, profile.owns(&item.id), offer.as_ref()))
            .collect();
        let output = serde_json::json!({
            "date": today.format("%Y-%m-%d").to_string(),
            "discount": offer.as_ref().map(|o| &o.item_id),
            "items": items,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Sprout Shop — {}", today.format("%Y-%m-%d"));
    println!("==========================");
    for item in session.catalog().iter() {
        let owned = if profile.owns(&item.id) { " [owned]" } else { "" };
        let price = match offer.as_ref().filter(|o| o.item_id == item.id) {
            Some(o) => format!("{} (was {})", o.discounted_price, o.original_price),
            None => format!("{}", item.price),
        };
        let rarity = item
            .rarity
            .map(|r| format!(" [{}]", r.as_str()))
            .unwrap_or_default();
        println!(
            "  {:<16} {:<20} {:>12} mustika{}{}",
            item.id, item.name, price, rarity, owned
        );
    }
    if let Some(o) = offer {
        println!();
        println!(
            "This week's deal: {} at {} mustika (20% off)",
            o.item_id, o.discounted_price
        );
    }

    Ok(())
}

/// Purchase a catalog item.
pub fn cmd_buy(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    item_id: &str,
    date: &Option<String>,
) -> Result<(), SproutError> {
    let mut session = load_session(db_path, backend)?;
    let today = resolve_date(date)?;

    let paid = session.purchase(item_id, today)?;
    let balance = session.profile().wallet.mustika;

    if json_mode {
        let output = serde_json::json!({
            "item_id": item_id,
            "paid": paid,
            "balance": balance,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Purchased {} for {} mustika", item_id, paid);
    println!("Balance: {} mustika", balance);
    Ok(())
}

// =============================================================================
// CLAIM COMMAND
// =============================================================================

/// Claim daily collection rewards.
pub fn cmd_claim(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    date: &Option<String>,
) -> Result<(), SproutError> {
    let mut session = load_session(db_path, backend)?;
    let today = resolve_date(date)?;

    match session.claim_daily(today)? {
        Some(summary) => {
            if json_mode {
                let output = serde_json::json!({
                    "claimed": true,
                    "total_mustika": summary.total_mustika,
                    "total_xp": summary.total_xp,
                    "items": summary.per_item.len(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output).unwrap_or_default()
                );
                return Ok(());
            }
            println!("Daily rewards claimed!");
            for reward in &summary.per_item {
                let currency = match reward.currency {
                    sprout_core::CurrencyKind::Mustika => "mustika",
                    sprout_core::CurrencyKind::Xp => "xp",
                };
                println!("  {:<16} +{} {}", reward.id, reward.reward, currency);
            }
            println!();
            println!(
                "Total: +{} mustika, +{} xp",
                summary.total_mustika, summary.total_xp
            );
        }
        None => {
            if json_mode {
                println!("{}", serde_json::json!({ "claimed": false }));
                return Ok(());
            }
            println!("Nothing to claim today (already claimed, or no collection).");
        }
    }

    Ok(())
}

// =============================================================================
// GOAL COMMANDS
// =============================================================================

/// Dispatch goal subcommands.
pub fn cmd_goal(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    command: GoalCommands,
) -> Result<(), SproutError> {
    match command {
        GoalCommands::Create {
            id,
            name,
            target,
            visual,
            skin,
        } => cmd_goal_create(db_path, backend, json_mode, &id, &name, target, &visual, skin),
        GoalCommands::List => cmd_goal_list(db_path, backend, json_mode),
        GoalCommands::Deposit { id, amount, date } => {
            cmd_goal_deposit(db_path, backend, json_mode, &id, amount, &date)
        }
        GoalCommands::Withdraw { id, amount, date } => {
            cmd_goal_withdraw(db_path, backend, json_mode, &id, amount, &date)
        }
        GoalCommands::CashOut { id } => cmd_goal_cash_out(db_path, backend, json_mode, &id),
    }
}

fn cmd_goal_create(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    id: &str,
    name: &str,
    target: Option<f64>,
    visual: &str,
    skin: Option<String>,
) -> Result<(), SproutError> {
    let visual = match visual {
        "plant" => VisualKind::Plant,
        "pet" => VisualKind::Pet,
        other => {
            return Err(SproutError::DeserializationError(format!(
                "Unknown visual kind '{}' (expected plant|pet)",
                other
            )));
        }
    };

    let goal = match target {
        Some(amount) => sprout_core::SavingsGoal::fixed(id, name, amount, visual, skin),
        None => sprout_core::SavingsGoal::infinite(id, name, visual, skin),
    };

    let mut session = load_session(db_path, backend)?;
    session.add_goal(goal)?;

    if json_mode {
        println!("{}", serde_json::json!({ "created": id }));
        return Ok(());
    }
    println!("Goal '{}' created", id);
    Ok(())
}

fn cmd_goal_list(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), SproutError> {
    let session = load_session(db_path, backend)?;

    if json_mode {
        let goals: Vec<GoalJson> = session
            .profile()
            .goals()
            .map(|goal| GoalJson::from_goal(goal, session.assets()))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "goals": goals }))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Savings Goals");
    println!("=============");
    let mut any = false;
    for goal in session.profile().goals() {
        any = true;
        let view = goal_stage(goal);
        let target = match goal.target {
            sprout_core::GoalTarget::Fixed { amount } => format!("/ {}", amount),
            sprout_core::GoalTarget::Infinite => "(open-ended)".to_string(),
        };
        println!(
            "  {:<12} {:<20} {:>10} {}  {:>5.1}%  {}",
            goal.id,
            goal.name,
            goal.saved_amount,
            target,
            progress_percent(goal),
            view.display_label(),
        );
    }
    if !any {
        println!("  (no goals yet — try `sprout goal create`)");
    }
    Ok(())
}

fn cmd_goal_deposit(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    id: &str,
    amount: f64,
    date: &Option<String>,
) -> Result<(), SproutError> {
    let mut session = load_session(db_path, backend)?;
    let at = resolve_date(date)?;
    let saved = session.deposit(id, at, amount)?;

    if json_mode {
        println!("{}", serde_json::json!({ "goal": id, "saved": saved }));
        return Ok(());
    }
    println!("Deposited {} into '{}'; saved: {}", amount, id, saved);
    if let Some(goal) = session.profile().goal(id) {
        let view = goal_stage(goal);
        println!(
            "Progress: {:.1}% — {}",
            progress_percent(goal),
            view.display_label()
        );
    }
    Ok(())
}

fn cmd_goal_withdraw(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    id: &str,
    amount: f64,
    date: &Option<String>,
) -> Result<(), SproutError> {
    let mut session = load_session(db_path, backend)?;
    let at = resolve_date(date)?;
    let taken = session.withdraw(id, at, amount)?;

    if json_mode {
        println!("{}", serde_json::json!({ "goal": id, "withdrawn": taken }));
        return Ok(());
    }
    println!("Withdrew {} from '{}'", taken, id);
    Ok(())
}

fn cmd_goal_cash_out(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    id: &str,
) -> Result<(), SproutError> {
    let mut session = load_session(db_path, backend)?;
    let balance = session.cash_out(id)?;

    if json_mode {
        println!("{}", serde_json::json!({ "goal": id, "cashed_out": balance }));
        return Ok(());
    }
    println!("Cashed out '{}': {}", id, balance);
    Ok(())
}

// =============================================================================
// THEME COMMAND
// =============================================================================

/// Derive and store a custom theme.
pub fn cmd_theme(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    name: &str,
    primary: &str,
    accent: &str,
    card: &str,
    background_color: Option<String>,
    background_image: Option<String>,
) -> Result<(), SproutError> {
    let background = match (background_image, background_color) {
        (Some(reference), _) => BackgroundSpec::Image { reference },
        (None, Some(color)) => BackgroundSpec::Solid { color },
        (None, None) => BackgroundSpec::Solid {
            color: card.to_string(),
        },
    };

    // Time-based id, minted at the boundary so the derivation stays pure.
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let id = format!("theme-{millis}");

    let mut session = load_session(db_path, backend)?;
    let theme = session.add_theme(id, name, primary, accent, card, &background)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&theme).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Theme '{}' ({})", theme.name, theme.id);
    for (slot, value) in &theme.colors {
        println!("  {:<24} {}", slot, value);
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export the profile snapshot to a file.
pub fn cmd_export(db_path: &PathBuf, backend: &str, output: &PathBuf) -> Result<(), SproutError> {
    let session = load_session(db_path, backend)?;
    let (bytes, checksum) = session.export_snapshot()?;

    let output = validate_output_path(output)?;
    std::fs::write(&output, &bytes)
        .map_err(|e| SproutError::IoError(format!("Write failed: {}", e)))?;

    println!("Exported {} bytes to {:?}", bytes.len(), output);
    println!("Checksum: {:016x}", checksum);
    Ok(())
}

/// Import a profile snapshot from a file.
pub fn cmd_import(db_path: &PathBuf, backend: &str, input: &PathBuf) -> Result<(), SproutError> {
    let input = validate_file_path(input)?;
    validate_file_size(&input, MAX_IMPORT_FILE_SIZE)?;

    let bytes = std::fs::read(&input)
        .map_err(|e| SproutError::IoError(format!("Read failed: {}", e)))?;
    let checksum = sprout_core::snapshot_checksum(&bytes);

    let mut session = load_session(db_path, backend)?;
    session.import_snapshot(&bytes)?;

    println!("Imported {} bytes from {:?}", bytes.len(), input);
    println!("Checksum: {:016x}", checksum);
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(db_path: &PathBuf, force: bool) -> Result<(), SproutError> {
    if db_path.exists() && !force {
        return Err(SproutError::IoError(format!(
            "Database {:?} already exists (use --force to overwrite)",
            db_path
        )));
    }
    if db_path.exists() {
        std::fs::remove_file(db_path)
            .map_err(|e| SproutError::IoError(format!("Remove failed: {}", e)))?;
    }

    let session = Session::with_redb(db_path)?;
    drop(session);

    println!("Initialized new database at {:?}", db_path);
    Ok(())
}
