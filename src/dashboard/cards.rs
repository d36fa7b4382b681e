//! Summary cards for the dashboard: total income, total expenses and net
//! savings over the summarized transactions.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

const INCOME_VALUE_STYLE: &str = "text-2xl font-bold text-green-600 dark:text-green-400";
const EXPENSE_VALUE_STYLE: &str = "text-2xl font-bold text-red-600 dark:text-red-400";

/// Render the three summary cards.
pub(super) fn summary_cards_view(totals: &Totals) -> Markup {
    let savings = totals.savings();
    let (savings_style, savings_note) = if savings >= 0.0 {
        (INCOME_VALUE_STYLE, "Saving money")
    } else {
        (EXPENSE_VALUE_STYLE, "Spending more than earning")
    };

    html!(
        section class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 md:grid-cols-3 gap-6"
            {
                div class=(CARD_STYLE)
                {
                    h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2"
                    {
                        "Total Income"
                    }
                    div class=(INCOME_VALUE_STYLE) { (format_currency(totals.income)) }
                }

                div class=(CARD_STYLE)
                {
                    h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2"
                    {
                        "Total Expenses"
                    }
                    div class=(EXPENSE_VALUE_STYLE) { (format_currency(totals.expenses)) }
                }

                div class=(CARD_STYLE)
                {
                    h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2"
                    {
                        "Net Savings"
                    }
                    div class=(savings_style) { (format_currency(savings.abs())) }
                    p class="text-xs text-gray-600 dark:text-gray-400" { (savings_note) }
                }
            }
        }
    )
}
