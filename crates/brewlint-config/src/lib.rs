//! Configuration management for brewlint.
//!
//! This crate handles loading `brewlint.yaml` files, discovering them by
//! walking up from the working directory, and turning them into the typed
//! settings the CLI and validator use.

pub mod config;
pub mod discovery;
