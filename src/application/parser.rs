//! Flag parser: splits argument tokens into typed flag values and positionals

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::trace;

use crate::domain::{FlagKind, FlagSpec, FlagValue, ParseError};

/// Flag values produced by a parse, keyed by the flag's primary name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFlags {
    values: HashMap<String, FlagValue>,
}

impl ParsedFlags {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn set(&mut self, spec: &FlagSpec, value: FlagValue) {
        match self.values.entry(spec.name.clone()) {
            Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
                (FlagValue::StringSlice(acc), FlagValue::StringSlice(more)) => acc.extend(more),
                (FlagValue::IntSlice(acc), FlagValue::IntSlice(more)) => acc.extend(more),
                (current, value) => *current = value,
            },
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub flags: ParsedFlags,
    pub args: Vec<String>,
    /// The reserved help flag was given.
    pub help_requested: bool,
}

/// Parses `-name value`, `-name=value`, `--name value` and `--name=value`.
///
/// `--` ends flag parsing; everything after it is positional. A lone `-` is positional.
/// With reordering (the default) flags may follow positionals; without it the first
/// positional ends flag parsing.
#[derive(Debug, Clone)]
pub struct FlagParser<'s> {
    specs: &'s [FlagSpec],
    help_names: &'s [String],
    reorder: bool,
}

impl<'s> FlagParser<'s> {
    pub fn new(specs: &'s [FlagSpec]) -> Self {
        Self {
            specs,
            help_names: &[],
            reorder: true,
        }
    }

    /// Names recognized as the implicit help flag when no spec claims them.
    pub fn with_help(mut self, names: &'s [String]) -> Self {
        self.help_names = names;
        self
    }

    pub fn reorder(mut self, reorder: bool) -> Self {
        self.reorder = reorder;
        self
    }

    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
        trace!("parse: tokens={}, specs={}", tokens.len(), self.specs.len());
        let mut outcome = ParseOutcome::default();
        let mut iter = tokens.iter().map(AsRef::<str>::as_ref);

        while let Some(token) = iter.next() {
            if token == "--" {
                outcome.args.extend(iter.by_ref().map(str::to_string));
                break;
            }
            if !is_flag_token(token) {
                outcome.args.push(token.to_string());
                if !self.reorder {
                    outcome.args.extend(iter.by_ref().map(str::to_string));
                    break;
                }
                continue;
            }

            let (name, inline) = split_flag(token)?;
            let Some(spec) = self.specs.iter().find(|s| s.matches(name)) else {
                if self.help_names.iter().any(|h| h == name) {
                    outcome.help_requested = match inline {
                        Some(raw) => parse_bool(raw).ok_or_else(|| ParseError::InvalidValue {
                            value: raw.to_string(),
                            flag: name.to_string(),
                            kind: FlagKind::Bool,
                            reason: "not a boolean".to_string(),
                        })?,
                        None => true,
                    };
                    continue;
                }
                return Err(ParseError::UndefinedFlag {
                    name: name.to_string(),
                });
            };

            let raw = match inline {
                Some(raw) => raw,
                None if !spec.kind.takes_value() => "true",
                None => iter.next().ok_or_else(|| ParseError::MissingValue {
                    name: name.to_string(),
                })?,
            };
            let value = coerce(spec, name, raw)?;
            trace!("parse: flag={}, value={:?}", spec.name, value);
            outcome.flags.set(spec, value);
        }

        Ok(outcome)
    }
}

fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

fn split_flag(token: &str) -> Result<(&str, Option<&str>), ParseError> {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
        return Err(ParseError::BadSyntax {
            token: token.to_string(),
        });
    }
    Ok(match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    })
}

/// Accepts 1, t, T, TRUE, true, True and their false counterparts.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn coerce(spec: &FlagSpec, typed_name: &str, raw: &str) -> Result<FlagValue, ParseError> {
    let invalid = |reason: String| ParseError::InvalidValue {
        value: raw.to_string(),
        flag: typed_name.to_string(),
        kind: spec.kind,
        reason,
    };

    match spec.kind {
        FlagKind::Bool => parse_bool(raw)
            .map(FlagValue::Bool)
            .ok_or_else(|| invalid("not a boolean".to_string())),
        FlagKind::Int => raw
            .parse::<i64>()
            .map(FlagValue::Int)
            .map_err(|e| invalid(e.to_string())),
        FlagKind::Uint => raw
            .parse::<u64>()
            .map(FlagValue::Uint)
            .map_err(|e| invalid(e.to_string())),
        FlagKind::Float => raw
            .parse::<f64>()
            .map(FlagValue::Float)
            .map_err(|e| invalid(e.to_string())),
        FlagKind::String => Ok(FlagValue::String(raw.to_string())),
        FlagKind::StringSlice => Ok(FlagValue::StringSlice(vec![raw.to_string()])),
        FlagKind::IntSlice => raw
            .parse::<i64>()
            .map(|i| FlagValue::IntSlice(vec![i]))
            .map_err(|e| invalid(e.to_string())),
    }
}
