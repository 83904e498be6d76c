//! Row transformation
//!
//! Converts expanded XML rows into typed [`Record`](crate::domain::Record)s
//! using each entity's declarative field mapping.

pub mod row_mapper;

pub use row_mapper::{coerce_integer, map_row, row_action, ACTION_FIELD, INTEGER_COLUMN_SUFFIX};
