//! Command line interface for the tandem binary.

pub mod args;
pub mod commands;
pub mod output;
