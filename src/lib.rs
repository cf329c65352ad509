//! Command-line application framework: flag parsing, subcommand dispatch and
//! before/action/after lifecycle hooks.
//!
//! ```ignore
//! use cliflow::{App, Command, FlagSpec};
//!
//! let app = App::new("foo").command(
//!     Command::new("bar")
//!         .flag(FlagSpec::int("flag"))
//!         .before(|c| { c.metadata_mut().insert("msg", "hello world"); Ok(()) })
//!         .action(|c| { println!("{:?}", c.metadata().get_str("msg")); Ok(()) }),
//! );
//! app.run(["bar", "--flag=3"])?;
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{
    App, BoxError, Command, Context, DispatchError, DispatchResult, HookFailure, HookResult,
    Stage,
};
pub use config::Settings;
pub use domain::{FlagKind, FlagSpec, FlagValue, Metadata, ParseError};
