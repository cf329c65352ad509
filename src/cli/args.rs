//! CLI argument definitions using clap

use clap::{ArgAction, Parser};

/// Demo application built on the cliflow dispatcher
#[derive(Parser, Debug)]
#[command(name = "cliflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Command and arguments, handed to the dispatcher unparsed
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
