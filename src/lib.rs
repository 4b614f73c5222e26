// Pocket Ledger - Core Library
// Storage, the derive pipeline and view models; the binary adds the CLI and TUI

pub mod db;
pub mod entities;
pub mod error;
pub mod repository;  // Ordered list + durable slot
pub mod filter;      // Category and date range selection
pub mod aggregation; // Totals, category sums, daily series
pub mod reveal;      // Progressive chart animation
pub mod view;        // What the dashboard draws

// Re-export commonly used types
pub use db::{
    decode_transactions, encode_transactions, load_transactions, save_transactions,
    setup_database, Decoded, KeyValueStore, MemoryStore, SqliteStore, TRANSACTIONS_SLOT,
};
pub use entities::{
    parse_amount, Category, NewTransaction, Transaction, TransactionId, TransactionType,
    ALL_CATEGORIES_LABEL,
};
pub use error::{StorageError, TrackerError, ValidationError};
pub use repository::{ImportReport, Persistence, TransactionRepository};
pub use filter::{filter, parse_optional_date, CategoryFilter, FilterCriteria, DATE_FORMAT};
pub use aggregation::{
    category_totals, time_series, totals, BalanceSignal, DailyTotals, Totals,
};
pub use reveal::{Reveal, REVEAL_STEPS};
pub use view::{
    format_money, line_rgb, Bar, BarChartModel, ChartLayout, ChartPoint,
    Dashboard, EmptyState, LineChartModel, ListMode, Listing, ListingRow, PointTooltip,
    TotalsPanel, CURRENCY_SYMBOL, DEFAULT_BAR_SCALE, EXPENSE_LINE_COLOR, HOVER_RADIUS,
    INCOME_LINE_COLOR, MIN_CHART_MAX,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
