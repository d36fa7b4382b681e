//! The interpreter's rule tables and token patterns.
//!
//! Both tables are ordered data scanned front to back by a generic loop in
//! [super::core]; the first matching entry wins. Keeping them as data rather
//! than branch chains makes the tie-break order visible and testable.

use std::sync::LazyLock;

use regex::Regex;
use time::Weekday;

/// Confidence assigned before any signal has fired.
pub(super) const BASE_CONFIDENCE: f64 = 0.8;
/// Confidence when the two-amount clause pattern matched.
pub(super) const TWO_AMOUNT_CONFIDENCE: f64 = 0.9;
/// Confidence when an income keyword matched. Replaces the running value
/// rather than adding to it.
pub(super) const INCOME_CONFIDENCE: f64 = 0.95;
/// Added (capped at 1.0) when a category keyword group matched.
pub(super) const CATEGORY_MATCH_BONUS: f64 = 0.1;

/// Display color for placeholder categories synthesized from a keyword match.
pub(super) const PLACEHOLDER_COLOR: &str = "#3B82F6";
/// Display color for the hardcoded "Other" fallback placeholder.
pub(super) const OTHER_COLOR: &str = "#6B7280";
/// Icon for the hardcoded "Other" fallback placeholder.
pub(super) const OTHER_ICON: &str = "📄";
/// Icon hint used when the income vocabulary fixed the category to "Income"
/// but the reference set has no such entry.
pub(super) const INCOME_ICON: &str = "💰";

/// A sentence describing two transactions joined by "and" or a comma:
/// `<text>$<amount>(and|,)<text>$<amount>`. Only the first clause is kept.
pub(super) static TWO_AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+?)\s*\$(\d+\.?\d*)\s*(?:and|,)\s*(.+?)\s*\$(\d+\.?\d*)")
        .expect("two-amount pattern must compile")
});

/// The first dollar-amount token anywhere in the text, `$` optional.
pub(super) static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+\.?\d*)").expect("amount pattern must compile"));

/// Words that indicate money coming in rather than going out.
pub(super) const INCOME_KEYWORDS: &[&str] = &[
    "salary",
    "paid",
    "income",
    "bonus",
    "refund",
    "cashback",
    "dividend",
    "freelance",
    "paycheck",
];

/// A keyword group mapping to a category name and icon.
pub(super) struct CategoryRule {
    /// Any of these appearing in the lower-cased text triggers the rule.
    pub keywords: &'static [&'static str],
    /// The category name to assign.
    pub category_name: &'static str,
    /// The icon used if the name must be synthesized as a placeholder.
    pub icon: &'static str,
}

/// The keyword table, scanned in order; the first group with any keyword
/// present wins.
pub(super) const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &["coffee", "starbucks", "cafe", "espresso", "latte"],
        category_name: "Food & Dining",
        icon: "☕",
    },
    CategoryRule {
        keywords: &[
            "food",
            "restaurant",
            "dinner",
            "lunch",
            "breakfast",
            "pizza",
            "burger",
            "chinese",
            "italian",
            "mexican",
        ],
        category_name: "Food & Dining",
        icon: "🍽️",
    },
    CategoryRule {
        keywords: &[
            "grocery",
            "whole foods",
            "supermarket",
            "trader joes",
            "walmart",
            "costco",
        ],
        category_name: "Groceries",
        icon: "🛒",
    },
    CategoryRule {
        keywords: &["gas", "gasoline", "fuel", "shell", "chevron", "exxon"],
        category_name: "Transportation",
        icon: "⛽",
    },
    CategoryRule {
        keywords: &["uber", "lyft", "taxi", "bus", "train", "metro", "parking"],
        category_name: "Transportation",
        icon: "🚗",
    },
    CategoryRule {
        keywords: &["netflix", "spotify", "subscription", "hulu", "disney", "prime"],
        category_name: "Entertainment",
        icon: "🎬",
    },
    // Listed ahead of Shopping so that specific device words win over generic
    // purchase verbs ("Bought Samsung watch" is Electronics, not Shopping).
    CategoryRule {
        keywords: &["watch", "phone", "laptop", "samsung", "apple", "electronics"],
        category_name: "Electronics",
        icon: "📱",
    },
    CategoryRule {
        keywords: &["amazon", "purchase", "shopping", "buy", "bought"],
        category_name: "Shopping",
        icon: "🛍️",
    },
    CategoryRule {
        keywords: &["rent", "mortgage", "utilities", "electric", "water", "internet"],
        category_name: "Bills",
        icon: "🏠",
    },
    CategoryRule {
        keywords: &["doctor", "hospital", "pharmacy", "medicine", "health"],
        category_name: "Healthcare",
        icon: "🏥",
    },
    CategoryRule {
        keywords: &["gym", "fitness", "yoga", "sports"],
        category_name: "Fitness",
        icon: "💪",
    },
];

/// What a matched date phrase does to the reference date.
#[derive(Clone, Copy)]
pub(super) enum DateEffect {
    /// Subtract a fixed number of days.
    DaysBefore(i64),
    /// Walk backward to the most recent prior occurrence of the weekday.
    /// The offset is never zero: the phrase said on that weekday means the
    /// previous week, not today.
    LastWeekday(Weekday),
    /// A numeric `month/day` token, interpreted in the reference date's year.
    MonthDay,
}

/// A temporal phrase paired with its effect.
pub(super) struct DateRule {
    /// The phrase pattern tested against the raw text.
    pub pattern: Regex,
    /// How a match changes the resolved date.
    pub effect: DateEffect,
}

/// The date-phrase table in priority order; only the first match is honored.
pub(super) static DATE_RULES: LazyLock<Vec<DateRule>> = LazyLock::new(|| {
    vec![
        DateRule {
            pattern: Regex::new(r"(?i)yesterday").expect("date pattern must compile"),
            effect: DateEffect::DaysBefore(1),
        },
        DateRule {
            pattern: Regex::new(r"(?i)last\s+friday").expect("date pattern must compile"),
            effect: DateEffect::LastWeekday(Weekday::Friday),
        },
        DateRule {
            pattern: Regex::new(r"(?i)last\s+monday").expect("date pattern must compile"),
            effect: DateEffect::LastWeekday(Weekday::Monday),
        },
        DateRule {
            pattern: Regex::new(r"(?i)last\s+week").expect("date pattern must compile"),
            effect: DateEffect::DaysBefore(7),
        },
        DateRule {
            pattern: Regex::new(r"(\d{1,2})/(\d{1,2})").expect("date pattern must compile"),
            effect: DateEffect::MonthDay,
        },
    ]
});
