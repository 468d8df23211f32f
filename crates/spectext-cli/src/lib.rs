//! spectext CLI library.
//!
//! Argument definitions, logging setup and the conversion command behind the
//! `spectext` binary.

pub mod cli_args;
pub mod commands;
pub mod logging;
