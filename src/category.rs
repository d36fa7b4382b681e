//! Defines the spending category model and its database queries.
//!
//! Categories are a read-mostly reference set: the default catalog is seeded
//! when the database is initialized, and the text interpreter resolves
//! keyword matches against it. The interpreter never writes categories, it
//! only synthesizes transient placeholder values when a name has no entry
//! here (see [crate::interpreter]).

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a category.
pub type CategoryId = i64;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if the non-empty invariant is violated it will cause incorrect
    /// behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named spending bucket (e.g., 'Groceries', 'Entertainment').
///
/// `color` and `icon` are opaque display hints: a CSS hex color and an emoji
/// glyph, rendered as-is by the dashboard and transaction pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique display name.
    pub name: CategoryName,
    /// A CSS color used when charting this category.
    pub color: String,
    /// An emoji displayed next to the category name.
    pub icon: String,
}

/// The default category catalog seeded into new databases.
///
/// Tuples of (name, color, icon). The names line up with the interpreter's
/// keyword table so keyword matches resolve to real rows instead of
/// placeholders.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food & Dining", "#F59E0B", "🍽️"),
    ("Groceries", "#10B981", "🛒"),
    ("Transportation", "#6366F1", "🚗"),
    ("Shopping", "#EC4899", "🛍️"),
    ("Entertainment", "#8B5CF6", "🎬"),
    ("Electronics", "#0EA5E9", "📱"),
    ("Bills", "#EF4444", "🏠"),
    ("Healthcare", "#14B8A6", "🏥"),
    ("Fitness", "#F97316", "💪"),
    ("Income", "#22C55E", "💰"),
    ("Other", "#6B7280", "📄"),
];

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    color: &str,
    icon: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, color, icon) VALUES (?1, ?2, ?3);",
            (name.as_ref(), color, icon),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        color: color.to_owned(),
        icon: icon.to_owned(),
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, icon FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a single category by its unique name.
pub fn get_category_by_name(name: &str, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, icon FROM category WHERE name = :name;")?
        .query_row(&[(":name", &name)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, icon FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Insert the default category catalog, skipping names that already exist.
///
/// Safe to call on every start-up.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection
        .prepare("INSERT OR IGNORE INTO category (name, color, icon) VALUES (?1, ?2, ?3);")?;

    for (name, color, icon) in DEFAULT_CATEGORIES {
        statement.execute((name, color, icon))?;
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            icon TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let color = row.get(2)?;
    let icon = row.get(3)?;

    Ok(Category {
        id,
        name,
        color,
        icon,
    })
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category_name = CategoryName::new("\n\t \r");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("Food & Dining");

        assert!(category_name.is_ok())
    }
}
