//! Flag parsing errors (no external dependencies)

use thiserror::Error;

use crate::domain::FlagKind;

/// Errors produced while turning argument tokens into flag values.
/// Messages name flags with a single dash, whatever form was typed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("flag provided but not defined: -{name}")]
    UndefinedFlag { name: String },

    #[error("invalid value \"{value}\" for flag -{flag}: expected {kind} ({reason})")]
    InvalidValue {
        value: String,
        flag: String,
        kind: FlagKind,
        reason: String,
    },

    #[error("flag needs an argument: -{name}")]
    MissingValue { name: String },

    #[error("bad flag syntax: {token}")]
    BadSyntax { token: String },
}

impl ParseError {
    /// Name of the flag the error refers to, if any.
    pub fn flag_name(&self) -> Option<&str> {
        match self {
            ParseError::UndefinedFlag { name } | ParseError::MissingValue { name } => Some(name),
            ParseError::InvalidValue { flag, .. } => Some(flag),
            ParseError::BadSyntax { .. } => None,
        }
    }
}
