//! yarrow CLI library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `yarrow` is used as a binary (main.rs).

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod reporter;
