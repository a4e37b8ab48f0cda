//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CategoryId};

/// The color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#FF6B6B";

/// The categories seeded into every new ledger as (name, color) pairs.
pub const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("طعام", "#FF6B6B"),
    ("مواصلات", "#4ECDC4"),
    ("ترفيه", "#FFE66D"),
    ("صحة", "#95E1D3"),
    ("تعليم", "#C7CEEA"),
    ("مسكن", "#FFDAB9"),
    ("أخرى", "#BDB2FF"),
    ("دخل", "#52B788"),
];

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty
    /// or only whitespace.
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
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
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
        f.pad(&self.0)
    }
}

/// A named, colored grouping for transactions (e.g., 'Food', 'Transport').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
    /// A display color, usually a hex code such as `#4ECDC4`.
    pub color: String,
}

/// The data needed to create a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The unique name of the category.
    pub name: CategoryName,
    /// A display color, usually a hex code.
    pub color: String,
}

impl NewCategory {
    /// Create a category with the [DEFAULT_CATEGORY_COLOR].
    pub fn new(name: CategoryName) -> Self {
        Self {
            name,
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
        }
    }

    /// Set the display color.
    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_owned();
        self
    }
}
