//! The interpretation pipeline: amount, date, type, and category passes.

use regex::Captures;
use time::{Date, Duration, Month, Weekday};

use crate::{
    category::Category,
    interpreter::{
        models::{ParsedTransaction, ResolvedCategory},
        rules::{
            AMOUNT_PATTERN, BASE_CONFIDENCE, CATEGORY_MATCH_BONUS, CATEGORY_RULES, DATE_RULES,
            DateEffect, INCOME_CONFIDENCE, INCOME_ICON, INCOME_KEYWORDS, OTHER_COLOR, OTHER_ICON,
            PLACEHOLDER_COLOR, TWO_AMOUNT_CONFIDENCE, TWO_AMOUNT_PATTERN,
        },
    },
    transaction::TransactionKind,
};

/// Interpret a free-text transaction description.
///
/// `categories` is the read-only reference set used to resolve detected
/// category names to real IDs; `reference_date` is the date treated as
/// "today" for relative phrases like "yesterday" or "last friday".
///
/// This function cannot fail: any input produces *some* [ParsedTransaction],
/// degrading to defaults (amount 0, expense, "Other", the reference date,
/// confidence 0.8) when no signals are detected. The result is advisory and
/// is expected to be confirmed by a human before being persisted.
pub fn interpret(text: &str, categories: &[Category], reference_date: Date) -> ParsedTransaction {
    let lowercased = text.to_lowercase();

    let (amount, description, mut confidence) = extract_amount(text);
    let date = extract_date(text, reference_date);

    let is_income = INCOME_KEYWORDS
        .iter()
        .any(|keyword| lowercased.contains(keyword));

    let (kind, category) = if is_income {
        // The income vocabulary fixes both the type and the category, and the
        // keyword table is not consulted.
        confidence = INCOME_CONFIDENCE;
        (
            TransactionKind::Income,
            resolve_category("Income", INCOME_ICON, categories),
        )
    } else {
        let category = match matching_category_rule(&lowercased) {
            Some(rule) => {
                confidence = (confidence + CATEGORY_MATCH_BONUS).min(1.0);
                resolve_category(rule.category_name, rule.icon, categories)
            }
            None => resolve_other(categories),
        };

        (TransactionKind::Expense, category)
    };

    ParsedTransaction {
        amount,
        description,
        kind,
        category,
        confidence,
        date,
    }
}

/// The amount and primary-clause pass.
///
/// Returns the detected amount, the description derived from the input, and
/// the starting confidence. A sentence describing two transactions joined by
/// "and" or a comma keeps only the first clause; the second amount and its
/// text are discarded.
fn extract_amount(text: &str) -> (f64, String, f64) {
    if let Some(captures) = TWO_AMOUNT_PATTERN.captures(text) {
        let description = captures[1].trim().to_owned();
        let amount = captures[2].parse().unwrap_or(0.0);

        return (amount, description, TWO_AMOUNT_CONFIDENCE);
    }

    match AMOUNT_PATTERN.find(text) {
        Some(token) => {
            let amount = token.as_str().trim_start_matches('$').parse().unwrap_or(0.0);
            let leading = text[..token.start()].trim();
            let description = if leading.is_empty() {
                text.trim().to_owned()
            } else {
                leading.to_owned()
            };

            (amount, description, BASE_CONFIDENCE)
        }
        None => (0.0, text.trim().to_owned(), BASE_CONFIDENCE),
    }
}

/// The date pass: the first matching phrase in table order wins, and only one
/// date phrase is ever honored per input.
fn extract_date(text: &str, reference_date: Date) -> Date {
    for rule in DATE_RULES.iter() {
        if let Some(captures) = rule.pattern.captures(text) {
            return match rule.effect {
                DateEffect::DaysBefore(days) => reference_date - Duration::days(days),
                DateEffect::LastWeekday(weekday) => last_weekday(reference_date, weekday),
                DateEffect::MonthDay => month_day_date(&captures, reference_date),
            };
        }
    }

    reference_date
}

/// The most recent occurrence of `weekday` strictly before `reference_date`.
///
/// The walk-back offset is `(reference dow - target dow) mod 7`, substituting
/// 7 when the offsets coincide, so "last monday" said on a Monday means the
/// previous week rather than today.
fn last_weekday(reference_date: Date, weekday: Weekday) -> Date {
    let days_back = (reference_date.weekday().number_days_from_sunday() as i64
        - weekday.number_days_from_sunday() as i64)
        .rem_euclid(7);
    let days_back = if days_back == 0 { 7 } else { days_back };

    reference_date - Duration::days(days_back)
}

/// Resolve a numeric `month/day` token in the reference date's year.
///
/// An out-of-range month or day (e.g. "99/99") degrades to the reference date
/// so the result is always a valid calendar date.
fn month_day_date(captures: &Captures, reference_date: Date) -> Date {
    let month: u8 = captures[1].parse().unwrap_or(0);
    let day: u8 = captures[2].parse().unwrap_or(0);

    Month::try_from(month)
        .ok()
        .and_then(|month| Date::from_calendar_date(reference_date.year(), month, day).ok())
        .unwrap_or(reference_date)
}

/// Scan the keyword table in order and return the first matching rule.
fn matching_category_rule(lowercased: &str) -> Option<&'static super::rules::CategoryRule> {
    CATEGORY_RULES.iter().find(|rule| {
        rule.keywords
            .iter()
            .any(|keyword| lowercased.contains(keyword))
    })
}

/// Resolve a detected category name against the reference set, synthesizing a
/// placeholder when the name has no entry. The placeholder is transient and
/// is never added back into the reference set.
fn resolve_category(
    name: &str,
    icon: &'static str,
    categories: &[Category],
) -> ResolvedCategory {
    match categories
        .iter()
        .find(|category| category.name.as_ref() == name)
    {
        Some(category) => ResolvedCategory::Existing(category.clone()),
        None => ResolvedCategory::Placeholder {
            name: name.to_owned(),
            color: PLACEHOLDER_COLOR,
            icon,
        },
    }
}

/// Resolve the "Other" fallback: the reference set's "Other" entry if it has
/// one, otherwise a hardcoded placeholder.
fn resolve_other(categories: &[Category]) -> ResolvedCategory {
    match categories
        .iter()
        .find(|category| category.name.as_ref() == "Other")
    {
        Some(category) => ResolvedCategory::Existing(category.clone()),
        None => ResolvedCategory::Placeholder {
            name: "Other".to_owned(),
            color: OTHER_COLOR,
            icon: OTHER_ICON,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
