//! Subcommands of the `easy21` binary

pub mod evaluate;
pub mod export;
pub mod train;
