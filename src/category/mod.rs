//! Categories for grouping transactions.

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, get_all_categories, get_category,
    insert_category_if_absent, seed_default_categories,
};
pub use domain::{Category, CategoryName, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, NewCategory};
