//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryName, DEFAULT_CATEGORIES, NewCategory},
    database_id::CategoryId,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)
             RETURNING id, name, color",
        )?
        .query_row((category.name.as_ref(), &category.color), map_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(category.name.to_string()),
            error => error.into(),
        })
}

/// Create a category unless one with the same name already exists.
///
/// Returns `None` when the name is taken, leaving the existing category
/// untouched.
pub fn insert_category_if_absent(
    category: NewCategory,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)
             ON CONFLICT(name) DO NOTHING
             RETURNING id, name, color",
        )?
        .query_row((category.name.as_ref(), &category.color), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Insert the [DEFAULT_CATEGORIES] that are not in the database yet.
///
/// Returns the number of categories that were added.
pub fn seed_default_categories(connection: &Connection) -> Result<usize, Error> {
    let mut inserted = 0;

    for (name, color) in DEFAULT_CATEGORIES {
        let category = NewCategory::new(CategoryName::new_unchecked(name)).color(color);

        match insert_category_if_absent(category, connection)? {
            Some(category) => {
                tracing::debug!("Seeded category {} ({})", category.name, category.id);
                inserted += 1;
            }
            None => tracing::debug!("Category {name} already exists, skipping"),
        }
    }

    Ok(inserted)
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color FROM categories WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color FROM categories ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            color TEXT DEFAULT '#FF6B6B'
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let color: Option<String> = row.get(2)?;

    Ok(Category {
        id,
        name,
        color: color.unwrap_or_default(),
    })
}
