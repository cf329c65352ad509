//! Application layer: flag parsing, contexts, commands and dispatch
//!
//! This layer turns an argument list into hook calls and depends only on the domain.

pub mod app;
pub mod command;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod parser;

pub use app::{App, NotFoundHandler};
pub use command::{find_command, Command};
pub use context::Context;
pub use error::{
    aggregate, BoxError, DispatchError, DispatchResult, HookFailure, HookResult, Stage,
};
pub use lifecycle::{Hook, UsageErrorHandler};
pub use parser::{FlagParser, ParseOutcome, ParsedFlags};
