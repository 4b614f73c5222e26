// 📊 Aggregation Engine - derived numbers for any transaction list
//
// All functions are pure and take whichever list is active (full or
// filtered). There is one code path for both.

use crate::entities::{Category, Transaction, TransactionType};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    /// income - expense
    pub balance: f64,
}

/// Tri-state sign of the balance, used to colour the balance figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSignal {
    Positive,
    Negative,
    Neutral,
}

impl Totals {
    pub fn signal(&self) -> BalanceSignal {
        if self.balance > 0.0 {
            BalanceSignal::Positive
        } else if self.balance < 0.0 {
            BalanceSignal::Negative
        } else {
            BalanceSignal::Neutral
        }
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expense) = transactions
        .iter()
        .fold((0.0, 0.0), |(income, expense), tx| match tx.kind {
            TransactionType::Income => (income + tx.amount, expense),
            TransactionType::Expense => (income, expense + tx.amount),
        });

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// Expense sums per category. Every category in `Category::ALL` is a key;
/// income records are never counted.
pub fn category_totals(transactions: &[Transaction]) -> BTreeMap<Category, f64> {
    let mut sums: BTreeMap<Category, f64> = Category::ALL.iter().map(|c| (*c, 0.0)).collect();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        *sums.entry(tx.category).or_insert(0.0) += tx.amount;
    }

    sums
}

// ============================================================================
// TIME SERIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl DailyTotals {
    pub fn value(&self, kind: TransactionType) -> f64 {
        match kind {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expense,
        }
    }
}

/// Income and expense per date, ascending. Dates without records are not
/// filled in.
pub fn time_series(transactions: &[Transaction]) -> Vec<DailyTotals> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for tx in transactions {
        let entry = by_date.entry(tx.date).or_insert((0.0, 0.0));
        match tx.kind {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount,
        }
    }

    by_date
        .into_iter()
        .map(|(date, (income, expense))| DailyTotals {
            date,
            income,
            expense,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewTransaction;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(description: &str, amount: &str, category: &str, kind: &str, date: &str) -> Transaction {
        NewTransaction::new(description, amount, category, kind)
            .validate(day(date))
            .unwrap()
    }

    fn lunch_and_salary() -> Vec<Transaction> {
        vec![
            tx("Lunch", "20", "Food", "expense", "2024-01-05"),
            tx("Salary", "100", "Allowance", "income", "2024-01-05"),
        ]
    }

    #[test]
    fn test_totals_scenario() {
        let t = totals(&lunch_and_salary());

        assert_eq!(t, Totals { income: 100.0, expense: 20.0, balance: 80.0 });
        assert_eq!(t.signal(), BalanceSignal::Positive);
    }

    #[test]
    fn test_totals_empty_list() {
        let t = totals(&[]);
        assert_eq!(t, Totals::default());
        assert_eq!(t.signal(), BalanceSignal::Neutral);
    }

    #[test]
    fn test_balance_identity_and_negative_signal() {
        let list = vec![
            tx("Rent", "300.5", "Bills", "expense", "2024-01-01"),
            tx("Gift", "120.25", "Allowance", "income", "2024-01-02"),
            tx("Taxi", "14", "Transport", "expense", "2024-01-03"),
        ];
        let t = totals(&list);

        assert_eq!(t.balance, t.income - t.expense);
        assert_eq!(t.signal(), BalanceSignal::Negative);
    }

    #[test]
    fn test_category_totals_scenario() {
        let sums = category_totals(&lunch_and_salary());

        let expected: BTreeMap<Category, f64> = [
            (Category::Allowance, 0.0),
            (Category::Food, 20.0),
            (Category::Transport, 0.0),
            (Category::Bills, 0.0),
            (Category::Others, 0.0),
        ]
        .into_iter()
        .collect();

        // Salary is income in Allowance and must not count
        assert_eq!(sums, expected);
    }

    #[test]
    fn test_category_totals_always_full_key_set() {
        let sums = category_totals(&[]);
        let keys: Vec<_> = sums.keys().copied().collect();

        assert_eq!(keys, Category::ALL.to_vec());
        assert!(sums.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_time_series_same_day() {
        let series = time_series(&lunch_and_salary());

        assert_eq!(
            series,
            vec![DailyTotals {
                date: day("2024-01-05"),
                income: 100.0,
                expense: 20.0,
            }]
        );
    }

    #[test]
    fn test_time_series_sorted_without_gaps() {
        let list = vec![
            tx("Late", "5", "Food", "expense", "2024-03-10"),
            tx("Early", "7", "Food", "expense", "2024-01-02"),
            tx("Pay", "50", "Allowance", "income", "2024-03-10"),
        ];
        let series = time_series(&list);

        let dates: Vec<_> = series.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day("2024-01-02"), day("2024-03-10")]);
        assert_eq!(series[1].value(TransactionType::Income), 50.0);
        assert_eq!(series[1].value(TransactionType::Expense), 5.0);
    }
}
