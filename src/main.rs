// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use pocket_ledger::{
    aggregation, db, filter, format_money, FilterCriteria, KeyValueStore, MemoryStore,
    SqliteStore, TransactionRepository, DEFAULT_BAR_SCALE,
};

/// Personal income and expense tracker with a terminal dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database holding the transactions slot.
    #[arg(long, env = "POCKET_LEDGER_DB", default_value = "pocket_ledger.db")]
    db_path: PathBuf,

    /// File the log is written to (the terminal belongs to the dashboard).
    #[arg(long, default_value = "pocket_ledger.log")]
    log_file: PathBuf,

    /// Keep everything in memory; nothing is read from or written to disk.
    #[arg(long)]
    ephemeral: bool,

    /// Bar length (cells) per unit of money in the category chart.
    #[arg(long, default_value_t = DEFAULT_BAR_SCALE)]
    bar_scale: f64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive dashboard (default).
    Ui,

    /// Append transactions from a JSON array file.
    Import {
        file: PathBuf,
    },

    /// Print totals, category totals and the daily series.
    Summary {
        #[arg(long, default_value = "All")]
        category: String,

        /// Inclusive start date, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        from: String,

        /// Inclusive end date, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        to: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_file)?;

    match &args.command {
        Some(Command::Import { file }) => run_import(&args, file),
        Some(Command::Summary { category, from, to }) => run_summary(&args, category, from, to),
        Some(Command::Ui) | None => run_ui_mode(&args),
    }
}

fn setup_logging(path: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn open_store(args: &Args) -> Result<Box<dyn KeyValueStore>> {
    if args.ephemeral {
        return Ok(Box::new(MemoryStore::new()));
    }

    let store = SqliteStore::open(&args.db_path)
        .with_context(|| format!("Could not open database {}", args.db_path.display()))?;
    Ok(Box::new(store))
}

fn run_import(args: &Args, file: &Path) -> Result<()> {
    println!("📥 Importing transactions");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Read and decode the file
    println!("\n📂 Reading {}...", file.display());
    let blob = fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let decoded = db::decode_transactions(&blob)
        .with_context(|| format!("{} is not a JSON array of transactions", file.display()))?;
    println!("✓ Decoded {} transactions", decoded.transactions.len());
    if !decoded.dropped.is_empty() {
        println!("⚠️  Dropped {} invalid records", decoded.dropped.len());
    }

    // 2. Open the store
    println!("\n🔧 Opening {}...", args.db_path.display());
    let mut repo = TransactionRepository::open(open_store(args)?)
        .context("Could not load existing transactions")?;
    println!("✓ {} transactions already stored", repo.len());

    // 3. Append
    println!("\n💾 Appending...");
    let report = repo.import(decoded.transactions);
    println!("✓ Imported: {}", report.imported);
    println!("✓ Already present: {}", report.skipped_existing);
    if report.rejected > 0 {
        println!("⚠️  Rejected: {}", report.rejected);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if !report.persistence.is_durable() {
        bail!("Import was not saved: {:?}", report.persistence);
    }
    println!("✅ Ledger now holds {} transactions", repo.len());

    Ok(())
}

fn run_summary(args: &Args, category: &str, from: &str, to: &str) -> Result<()> {
    let criteria = FilterCriteria::parse(category, from, to).context("Invalid filter")?;
    let repo = TransactionRepository::open(open_store(args)?)
        .context("Could not load transactions")?;
    let visible = filter(repo.all(), &criteria);

    println!("📊 {} ({} of {} transactions)", criteria, visible.len(), repo.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let totals = aggregation::totals(&visible);
    println!("  Income:  {}", format_money(totals.income));
    println!("  Expense: {}", format_money(totals.expense));
    println!("  Balance: {}", format_money(totals.balance));

    println!("\n🏷️  Expenses by category");
    for (category, total) in aggregation::category_totals(&visible) {
        println!("  {:<10} {}", category.as_str(), format_money(total));
    }

    let series = aggregation::time_series(&visible);
    if !series.is_empty() {
        println!("\n📅 By date");
        for daily in series {
            println!(
                "  {}  +{}  -{}",
                daily.date.format("%Y-%m-%d"),
                format_money(daily.income),
                format_money(daily.expense)
            );
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(args: &Args) -> Result<()> {
    let repo = TransactionRepository::open_or_session_only(open_store(args)?);

    let mut app = ui::App::new(repo, args.bar_scale);
    ui::run_ui(&mut app)?;

    println!("✅ Ledger closed ({} transactions)", app.repo.len());

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_args: &Args) -> Result<()> {
    eprintln!("❌ Dashboard not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: pocket-ledger summary");
    std::process::exit(1);
}
