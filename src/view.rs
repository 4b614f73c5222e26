// 🖼️ View models - what every renderer must draw for a given list
//
// Built synchronously from the list alone; no hidden state. The terminal UI
// draws these, and tests assert on them directly.

use crate::aggregation::{self, BalanceSignal, DailyTotals, Totals};
use crate::entities::{category::hex_to_rgb, Category, Transaction, TransactionId, TransactionType};
use crate::reveal::{Reveal, REVEAL_STEPS};
use chrono::NaiveDate;
use numfmt::{Formatter, Precision};
use std::fmt;
use std::sync::OnceLock;

pub const CURRENCY_SYMBOL: &str = "₦";

/// Bar length per unit of money.
pub const DEFAULT_BAR_SCALE: f64 = 2.0;

/// Floor for the line chart's vertical maximum, so tiny values don't fill it.
pub const MIN_CHART_MAX: f64 = 50.0;

/// Pointer distance (drawing units) within which a chart point is "hit".
pub const HOVER_RADIUS: f64 = 6.0;

pub const INCOME_LINE_COLOR: &str = "#3DBE9F";
pub const EXPENSE_LINE_COLOR: &str = "#33A78F";

fn currency_formatter(prefix: &str) -> Formatter {
    // Prefixes here are well under numfmt's 12-byte limit
    Formatter::currency(prefix)
        .unwrap_or_else(|_| Formatter::new())
        .precision(Precision::Unspecified)
}

/// Amount with the currency symbol, keeping every significant digit of the
/// stored value so sums are shown exactly.
pub fn format_money(amount: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    // numfmt renders zero as a bare "0", without the prefix
    if amount == 0.0 {
        return format!("{CURRENCY_SYMBOL}0");
    }

    let formatted = if amount < 0.0 {
        NEGATIVE_FMT
            .get_or_init(|| currency_formatter(&format!("-{CURRENCY_SYMBOL}")))
            .fmt_string(amount.abs())
    } else {
        POSITIVE_FMT
            .get_or_init(|| currency_formatter(CURRENCY_SYMBOL))
            .fmt_string(amount)
    };

    // Whole amounts come back as "20.0"
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_owned(),
        None => formatted,
    }
}

pub fn line_rgb(kind: TransactionType) -> (u8, u8, u8) {
    match kind {
        TransactionType::Income => hex_to_rgb(INCOME_LINE_COLOR),
        TransactionType::Expense => hex_to_rgb(EXPENSE_LINE_COLOR),
    }
}

// ============================================================================
// LISTING
// ============================================================================

/// Which list is on screen; decides the empty-state message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Full,
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing recorded at all
    NoTransactions,
    /// Records exist but the filter excludes all of them
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoTransactions => "No transactions yet. Start adding your income or expenses!",
            EmptyState::NoMatches => "No transactions match this filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    /// Removal key for this row
    pub id: TransactionId,
    pub label: String,
    pub kind: TransactionType,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub rows: Vec<ListingRow>,
    pub empty: Option<EmptyState>,
}

impl Listing {
    pub fn build(transactions: &[Transaction], mode: ListMode) -> Self {
        let rows: Vec<ListingRow> = transactions
            .iter()
            .map(|tx| ListingRow {
                id: tx.id,
                label: format!(
                    "{} - {} ({})",
                    tx.description,
                    format_money(tx.amount),
                    tx.category
                ),
                kind: tx.kind,
                date: tx.date,
            })
            .collect();

        let empty = match (rows.is_empty(), mode) {
            (false, _) => None,
            (true, ListMode::Full) => Some(EmptyState::NoTransactions),
            (true, ListMode::Filtered) => Some(EmptyState::NoMatches),
        };

        Listing { rows, empty }
    }

    /// Id of the row shown at `position`.
    pub fn id_at(&self, position: usize) -> Option<TransactionId> {
        self.rows.get(position).map(|row| row.id)
    }
}

// ============================================================================
// TOTALS PANEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalsPanel {
    pub totals: Totals,
    pub signal: BalanceSignal,
}

impl TotalsPanel {
    pub fn build(transactions: &[Transaction]) -> Self {
        let totals = aggregation::totals(transactions);
        TotalsPanel {
            totals,
            signal: totals.signal(),
        }
    }

    /// Green, red or grey for the balance figure.
    pub fn balance_rgb(&self) -> (u8, u8, u8) {
        match self.signal {
            BalanceSignal::Positive => hex_to_rgb("#4caf50"),
            BalanceSignal::Negative => hex_to_rgb("#f44336"),
            BalanceSignal::Neutral => hex_to_rgb("#cccccc"),
        }
    }
}

// ============================================================================
// BAR CHART
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub category: Category,
    pub total: f64,
}

impl Bar {
    /// `total * scale`, capped at `available`. Monotonic in `total`.
    pub fn length(&self, scale: f64, available: f64) -> f64 {
        (self.total * scale).clamp(0.0, available.max(0.0))
    }

    /// Text shown when the bar is hovered or focused.
    pub fn tooltip(&self) -> String {
        format!("{}\n{}", self.category, format_money(self.total))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartModel {
    /// One bar per category in `Category::ALL` order
    pub bars: Vec<Bar>,
    pub has_expenses: bool,
}

impl BarChartModel {
    pub const EMPTY_MESSAGE: &'static str = "No expenses to display";

    pub fn build(transactions: &[Transaction]) -> Self {
        let sums = aggregation::category_totals(transactions);
        BarChartModel {
            bars: sums
                .into_iter()
                .map(|(category, total)| Bar { category, total })
                .collect(),
            has_expenses: transactions.iter().any(Transaction::is_expense),
        }
    }

    /// Bar drawn in row `row` of the chart, if any.
    pub fn bar_at(&self, row: usize) -> Option<&Bar> {
        self.bars.get(row)
    }

    /// Reveal growing every bar from zero; owns a copy of the totals.
    pub fn reveal(&self) -> Reveal<Vec<Bar>> {
        let targets = self.bars.clone();
        Reveal::new(REVEAL_STEPS, move |fraction| {
            targets
                .iter()
                .map(|bar| Bar {
                    category: bar.category,
                    total: bar.total * fraction,
                })
                .collect()
        })
    }
}

// ============================================================================
// LINE CHART
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartModel {
    pub series: Vec<DailyTotals>,
    /// Shared vertical maximum: max(all income, all expense, MIN_CHART_MAX)
    pub y_max: f64,
}

impl LineChartModel {
    pub const EMPTY_MESSAGE: &'static str = "No transactions to display";

    pub fn build(transactions: &[Transaction]) -> Self {
        let series = aggregation::time_series(transactions);
        let y_max = series
            .iter()
            .flat_map(|d| [d.income, d.expense])
            .fold(MIN_CHART_MAX, f64::max);

        LineChartModel { series, y_max }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Short `MM-DD` labels, one per point.
    pub fn date_labels(&self) -> Vec<String> {
        self.series
            .iter()
            .map(|d| d.date.format("%m-%d").to_string())
            .collect()
    }

    /// Point positions in a `width` x `height` drawing area (origin top-left).
    pub fn layout(&self, width: f64, height: f64) -> ChartLayout {
        ChartLayout::new(self, width, height, 1.0)
    }

    /// Reveal sweeping both lines up from the baseline and in from the left.
    /// The frame is a layout, so the drawing area is captured too.
    pub fn reveal(&self, width: f64, height: f64) -> Reveal<ChartLayout> {
        let model = self.clone();
        Reveal::new(REVEAL_STEPS, move |fraction| {
            ChartLayout::new(&model, width, height, fraction)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub income: Vec<ChartPoint>,
    pub expense: Vec<ChartPoint>,
}

impl ChartLayout {
    /// At `progress` 1.0: x_i = i / max(n-1, 1) * width and
    /// y = height - value * height / y_max. Lower progress scales both the
    /// horizontal reach and the height above the baseline.
    fn new(model: &LineChartModel, width: f64, height: f64, progress: f64) -> Self {
        let last = model.series.len().saturating_sub(1).max(1) as f64;
        let scale_y = height / model.y_max;

        let points = |kind: TransactionType| -> Vec<ChartPoint> {
            model
                .series
                .iter()
                .enumerate()
                .map(|(i, daily)| {
                    let value = daily.value(kind);
                    let x = (i as f64 / last) * width;
                    let y = height - value * scale_y;
                    ChartPoint {
                        x: x * progress,
                        y: height - (height - y) * progress,
                        date: daily.date,
                        value,
                    }
                })
                .collect()
        };

        ChartLayout {
            width,
            height,
            income: points(TransactionType::Income),
            expense: points(TransactionType::Expense),
        }
    }

    pub fn points(&self, kind: TransactionType) -> &[ChartPoint] {
        match kind {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    /// Nearest point of either series within `radius` of (`x`, `y`).
    pub fn nearest(&self, x: f64, y: f64, radius: f64) -> Option<PointTooltip> {
        TransactionType::ALL
            .into_iter()
            .flat_map(|kind| self.points(kind).iter().map(move |p| (kind, p)))
            .map(|(kind, p)| (kind, p, (p.x - x).hypot(p.y - y)))
            .filter(|(_, _, distance)| *distance < radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(kind, p, _)| PointTooltip {
                date: p.date,
                kind,
                value: p.value,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTooltip {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub value: f64,
}

impl fmt::Display for PointTooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}: {}",
            self.date.format("%Y-%m-%d"),
            self.kind.label(),
            format_money(self.value)
        )
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Everything derived from one list. Rebuilt from scratch after every
/// mutation or filter change, for the full and filtered list alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub mode: ListMode,
    pub listing: Listing,
    pub totals: TotalsPanel,
    pub bars: BarChartModel,
    pub line: LineChartModel,
}

impl Dashboard {
    pub fn build(transactions: &[Transaction], mode: ListMode) -> Self {
        Dashboard {
            mode,
            listing: Listing::build(transactions, mode),
            totals: TotalsPanel::build(transactions),
            bars: BarChartModel::build(transactions),
            line: LineChartModel::build(transactions),
        }
    }
}
