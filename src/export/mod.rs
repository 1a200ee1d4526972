//! Export utilities for learned value tables

pub mod value_csv;

pub use value_csv::{ValueGridExporter, ValueTransform};
