//! Core types for brewlint.
//!
//! A [`record::FormulaRecord`] describes how one published version of a
//! package is fetched, verified, built, and smoke-tested. This crate holds the
//! record model, checksum and version rules, validation, and the
//! [`runtime::PackageRuntime`] seam through which an external package manager
//! consumes records.

pub mod checksum;
pub mod record;
pub mod resolve;
pub mod runtime;
pub mod validation;
pub mod version;
