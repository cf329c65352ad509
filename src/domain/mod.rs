//! Domain layer: flag model, metadata bag, parse errors
//!
//! This layer is independent of dispatch concerns (no hooks, no commands).

pub mod error;
pub mod flag;
pub mod metadata;

pub use error::ParseError;
pub use flag::{FlagKind, FlagSpec, FlagValue};
pub use metadata::Metadata;
