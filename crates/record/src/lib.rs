//! Ordered dynamic records.
//!
//! A [`Record`] is an ordered bag of named [`Value`]s: enumeration follows
//! insertion order, serialization emits keys in ascending lexicographic
//! order (a committed output contract). This crate is the leaf data model
//! consumed by the `datalist` list facade.

mod record;
mod value;

pub use record::Record;
pub use value::Value;
