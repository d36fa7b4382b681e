//! Transaction data aggregation for the dashboard cards and charts.
//!
//! Provides pure functions to total income and expenses, group expenses by
//! category, and build the per-day income/expense series for the trend chart.

use time::Date;

use crate::transaction::{TransactionKind, TransactionWithCategory};

/// Color used for expenses whose transaction has no category.
const UNCATEGORIZED_COLOR: &str = "#8884d8";

/// Label used for expenses whose transaction has no category.
pub(super) const UNCATEGORIZED_LABEL: &str = "Other";

/// Income and expense totals over the summarized transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(super) struct Totals {
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expenses: f64,
}

impl Totals {
    /// Net savings: income minus expenses. Negative when spending exceeds
    /// earnings.
    pub fn savings(&self) -> f64 {
        self.income - self.expenses
    }
}

/// One slice of the expenses-by-category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategorySlice {
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub name: String,
    /// Total expenses in this category.
    pub total: f64,
    /// The category's display color.
    pub color: String,
}

/// Income and expenses on a single day.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DailyFlow {
    /// The day.
    pub date: Date,
    /// Income total for the day.
    pub income: f64,
    /// Expense total for the day.
    pub expenses: f64,
}

/// Sum income and expenses over `transactions`.
pub(super) fn calculate_totals(transactions: &[TransactionWithCategory]) -> Totals {
    let mut totals = Totals::default();

    for row in transactions {
        match row.transaction.kind {
            TransactionKind::Income => totals.income += row.transaction.amount,
            TransactionKind::Expense => totals.expenses += row.transaction.amount,
        }
    }

    totals
}

/// Group expense transactions by category name.
///
/// Uncategorized expenses are grouped under [UNCATEGORIZED_LABEL]. Slices
/// appear in first-seen order; income transactions are ignored.
pub(super) fn expenses_by_category(
    transactions: &[TransactionWithCategory],
) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = Vec::new();

    for row in transactions {
        if row.transaction.kind != TransactionKind::Expense {
            continue;
        }

        let (name, color) = match &row.category {
            Some(category) => (category.name.as_ref(), category.color.as_str()),
            None => (UNCATEGORIZED_LABEL, UNCATEGORIZED_COLOR),
        };

        match slices.iter_mut().find(|slice| slice.name == name) {
            Some(slice) => slice.total += row.transaction.amount,
            None => slices.push(CategorySlice {
                name: name.to_owned(),
                total: row.transaction.amount,
                color: color.to_owned(),
            }),
        }
    }

    slices
}

/// Build the per-day income/expense series for the trend chart.
///
/// Days are sorted chronologically and trimmed to the most recent
/// `day_limit` days that have data.
pub(super) fn daily_flows(
    transactions: &[TransactionWithCategory],
    day_limit: usize,
) -> Vec<DailyFlow> {
    let mut flows: Vec<DailyFlow> = Vec::new();

    for row in transactions {
        let flow = match flows
            .iter_mut()
            .find(|flow| flow.date == row.transaction.date)
        {
            Some(flow) => flow,
            None => {
                flows.push(DailyFlow {
                    date: row.transaction.date,
                    income: 0.0,
                    expenses: 0.0,
                });
                flows.last_mut().expect("just pushed a flow")
            }
        };

        match row.transaction.kind {
            TransactionKind::Income => flow.income += row.transaction.amount,
            TransactionKind::Expense => flow.expenses += row.transaction.amount,
        }
    }

    flows.sort_by_key(|flow| flow.date);

    if flows.len() > day_limit {
        flows.drain(..flows.len() - day_limit);
    }

    flows
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName},
        transaction::{Transaction, TransactionKind, TransactionWithCategory},
    };

    use super::{calculate_totals, daily_flows, expenses_by_category};

    fn make_row(
        amount: f64,
        kind: TransactionKind,
        date: time::Date,
        category: Option<(&str, &str)>,
    ) -> TransactionWithCategory {
        TransactionWithCategory {
            transaction: Transaction {
                id: 0,
                amount,
                date,
                description: String::new(),
                kind,
                category_id: category.map(|_| 1),
                auto_parsed: false,
                confidence: None,
            },
            category: category.map(|(name, color)| Category {
                id: 1,
                name: CategoryName::new_unchecked(name),
                color: color.to_owned(),
                icon: "🧪".to_owned(),
            }),
        }
    }

    #[test]
    fn totals_sum_income_and_expenses_separately() {
        let today = date!(2024 - 06 - 10);
        let rows = vec![
            make_row(3500.0, TransactionKind::Income, today, None),
            make_row(6.5, TransactionKind::Expense, today, None),
            make_row(45.2, TransactionKind::Expense, today, None),
        ];

        let totals = calculate_totals(&rows);

        assert_eq!(totals.income, 3500.0);
        assert_eq!(totals.expenses, 6.5 + 45.2);
        assert_eq!(totals.savings(), 3500.0 - (6.5 + 45.2));
    }

    #[test]
    fn totals_handle_empty_input() {
        let totals = calculate_totals(&[]);

        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expenses, 0.0);
        assert_eq!(totals.savings(), 0.0);
    }

    #[test]
    fn expenses_group_by_category_name() {
        let today = date!(2024 - 06 - 10);
        let rows = vec![
            make_row(6.5, TransactionKind::Expense, today, Some(("Food & Dining", "#F59E0B"))),
            make_row(12.0, TransactionKind::Expense, today, Some(("Food & Dining", "#F59E0B"))),
            make_row(45.2, TransactionKind::Expense, today, Some(("Groceries", "#10B981"))),
            make_row(3500.0, TransactionKind::Income, today, None),
        ];

        let slices = expenses_by_category(&rows);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].name, "Food & Dining");
        assert_eq!(slices[0].total, 6.5 + 12.0);
        assert_eq!(slices[0].color, "#F59E0B");
        assert_eq!(slices[1].name, "Groceries");
        assert_eq!(slices[1].total, 45.2);
    }

    #[test]
    fn uncategorized_expenses_group_under_other() {
        let today = date!(2024 - 06 - 10);
        let rows = vec![
            make_row(5.0, TransactionKind::Expense, today, None),
            make_row(7.0, TransactionKind::Expense, today, None),
        ];

        let slices = expenses_by_category(&rows);

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].name, "Other");
        assert_eq!(slices[0].total, 12.0);
    }

    #[test]
    fn daily_flows_sorts_chronologically_and_splits_kinds() {
        let rows = vec![
            make_row(6.5, TransactionKind::Expense, date!(2024 - 06 - 10), None),
            make_row(3500.0, TransactionKind::Income, date!(2024 - 06 - 08), None),
            make_row(12.0, TransactionKind::Expense, date!(2024 - 06 - 08), None),
        ];

        let flows = daily_flows(&rows, 7);

        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].date, date!(2024 - 06 - 08));
        assert_eq!(flows[0].income, 3500.0);
        assert_eq!(flows[0].expenses, 12.0);
        assert_eq!(flows[1].date, date!(2024 - 06 - 10));
        assert_eq!(flows[1].expenses, 6.5);
    }

    #[test]
    fn daily_flows_keeps_only_the_most_recent_days() {
        let rows: Vec<_> = (1i64..=10)
            .map(|day| {
                make_row(
                    day as f64,
                    TransactionKind::Expense,
                    date!(2024 - 06 - 01) + time::Duration::days(day - 1),
                    None,
                )
            })
            .collect();

        let flows = daily_flows(&rows, 7);

        assert_eq!(flows.len(), 7);
        assert_eq!(flows[0].date, date!(2024 - 06 - 04));
        assert_eq!(flows[6].date, date!(2024 - 06 - 10));
    }
}
