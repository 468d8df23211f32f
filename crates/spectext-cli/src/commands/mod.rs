//! Command implementations for the spectext CLI

pub mod convert;
