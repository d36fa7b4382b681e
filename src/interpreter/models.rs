//! Output types for the text interpreter.

use time::Date;

use crate::{
    category::{Category, CategoryId},
    transaction::TransactionKind,
};

/// The category assigned to a parsed transaction.
///
/// Either a category from the caller-supplied reference set, or a transient
/// placeholder synthesized when the detected category name has no entry in
/// that set. Placeholders are never written back to the reference set; they
/// exist only so the preview can show a name and icon.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCategory {
    /// A category from the reference set, carrying its real ID.
    Existing(Category),
    /// A synthesized stand-in for a name with no entry in the reference set.
    Placeholder {
        /// The detected category name.
        name: String,
        /// Default display color.
        color: &'static str,
        /// The icon from the matching keyword rule.
        icon: &'static str,
    },
}

impl ResolvedCategory {
    /// The category's display name.
    pub fn name(&self) -> &str {
        match self {
            ResolvedCategory::Existing(category) => category.name.as_ref(),
            ResolvedCategory::Placeholder { name, .. } => name,
        }
    }

    /// The category's display color.
    pub fn color(&self) -> &str {
        match self {
            ResolvedCategory::Existing(category) => &category.color,
            ResolvedCategory::Placeholder { color, .. } => color,
        }
    }

    /// The category's icon glyph.
    pub fn icon(&self) -> &str {
        match self {
            ResolvedCategory::Existing(category) => &category.icon,
            ResolvedCategory::Placeholder { icon, .. } => icon,
        }
    }

    /// The database ID, if this category exists in the reference set.
    pub fn id(&self) -> Option<CategoryId> {
        match self {
            ResolvedCategory::Existing(category) => Some(category.id),
            ResolvedCategory::Placeholder { .. } => None,
        }
    }
}

/// A best-effort structured reading of a free-text transaction description.
///
/// This is a transient value: the caller either discards it (the user
/// cancels) or converts it into a persisted transaction via the confirm
/// endpoint. Construction guarantees `amount >= 0` and `confidence` in
/// [0, 1], and `date` is always a valid calendar date (defaulting to the
/// reference date when no temporal phrase was found).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    /// The detected dollar amount, zero if no amount token was found.
    pub amount: f64,
    /// The detected description, derived from the input text.
    pub description: String,
    /// Whether this looks like money earned or money spent.
    pub kind: TransactionKind,
    /// The detected category, possibly a synthesized placeholder.
    pub category: ResolvedCategory,
    /// Heuristic certainty in [0, 1]. Not a calibrated probability: it counts
    /// how many independent signals corroborated the parse.
    pub confidence: f64,
    /// The detected transaction date.
    pub date: Date,
}
