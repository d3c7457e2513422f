//! Core data models for library items and identifiers.

mod identifier;
mod item;

pub use identifier::{IdType, Identifier};
pub use item::{Field, Item};
