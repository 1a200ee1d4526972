//! Ports (trait boundaries) for external collaborators.
//!
//! The episode driver reports progress through these traits; adapters in
//! [`crate::pipeline::observers`] implement them.

pub mod observer;

pub use observer::Observer;
