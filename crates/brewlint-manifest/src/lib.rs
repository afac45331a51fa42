//! Reading and writing formula files.
//!
//! The Ruby DSL is handled by [`dsl::parse_record`] and
//! [`render::render_record`]; TOML and JSON record files go through serde.
//! [`parser::load_record`] picks the right one by extension.

pub mod discover;
pub mod dsl;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;

pub use discover::{discover, discover_all};
pub use dsl::parse_record;
pub use error::{ParseError, Result};
pub use parser::{LoadFailure, RecordFormat, load_all, load_record};
pub use render::{check_renderable, render_record};
