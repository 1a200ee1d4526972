//! CLI infrastructure for the Easy21 toolkit
//!
//! This module provides the command-line interface for training agents,
//! evaluating them, and exporting their learned values.

pub mod commands;
pub mod output;
