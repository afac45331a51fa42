//! Command handlers, one module per subcommand.

pub mod bump;
pub mod completion;
pub mod digest;
pub mod latest;
pub mod render;
pub mod show;
pub mod validate;
pub mod version;
