//! Per-invocation context handed to every hook

use std::cell::{Ref, RefCell, RefMut};

use crate::application::parser::{ParseOutcome, ParsedFlags};
use crate::domain::{FlagSpec, FlagValue, Metadata};

/// Parsed flags and positionals of one command invocation.
///
/// Built fresh for every command (nested ones included) and dropped once its hooks
/// have run. The metadata bag is borrowed from the application, the parent is borrowed
/// from the enclosing invocation.
#[derive(Debug)]
pub struct Context<'a> {
    command: Option<&'a str>,
    specs: &'a [FlagSpec],
    flags: ParsedFlags,
    args: Vec<String>,
    help_requested: bool,
    metadata: &'a RefCell<Metadata>,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    pub fn new(
        metadata: &'a RefCell<Metadata>,
        specs: &'a [FlagSpec],
        outcome: ParseOutcome,
        parent: Option<&'a Context<'a>>,
        command: Option<&'a str>,
    ) -> Self {
        Self {
            command,
            specs,
            flags: outcome.flags,
            args: outcome.args,
            help_requested: outcome.help_requested,
            metadata,
            parent,
        }
    }

    /// Name of the command this context was built for; `None` for the application root.
    pub fn command_name(&self) -> Option<&str> {
        self.command
    }

    pub fn parent(&self) -> Option<&Context<'a>> {
        self.parent
    }

    /// This context followed by each enclosing one, innermost first.
    pub fn lineage(&self) -> impl Iterator<Item = &Context<'a>> {
        std::iter::successors(Some(self), |c| c.parent)
    }

    /// True when the enclosing context belongs to a command, i.e. this is a nested command.
    pub fn is_subcommand(&self) -> bool {
        self.parent.is_some_and(|p| p.command.is_some())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn flags(&self) -> &ParsedFlags {
        &self.flags
    }

    pub fn metadata(&self) -> Ref<'_, Metadata> {
        self.metadata.borrow()
    }

    /// Mutable access to the shared bag. Drop the guard before calling into other hooks.
    pub fn metadata_mut(&self) -> RefMut<'_, Metadata> {
        self.metadata.borrow_mut()
    }

    /// Flags declared for this context, in declaration order.
    pub fn specs(&self) -> &[FlagSpec] {
        self.specs
    }

    /// Spec declared on this context under `name` or one of its aliases.
    pub fn spec(&self, name: &str) -> Option<&FlagSpec> {
        self.specs.iter().find(|s| s.matches(name))
    }

    /// Value given for the flag, or its declared default.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        let spec = self.spec(name)?;
        self.flags.get(&spec.name).or(spec.default.as_ref())
    }

    /// Whether the flag was given on the command line (defaults do not count).
    pub fn is_set(&self, name: &str) -> bool {
        self.spec(name)
            .is_some_and(|spec| self.flags.is_set(&spec.name))
    }

    /// Value from the innermost context in the lineage that declares the flag.
    pub fn lookup(&self, name: &str) -> Option<&FlagValue> {
        self.lineage()
            .find(|c| c.spec(name).is_some())
            .and_then(|c| c.value(name))
    }

    pub fn bool(&self, name: &str) -> bool {
        self.value(name).and_then(FlagValue::as_bool).unwrap_or(false)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(FlagValue::as_int)
    }

    pub fn uint(&self, name: &str) -> Option<u64> {
        self.value(name).and_then(FlagValue::as_uint)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(FlagValue::as_float)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(FlagValue::as_str)
    }

    pub fn string_slice(&self, name: &str) -> Option<&[String]> {
        self.value(name).and_then(FlagValue::as_string_slice)
    }

    pub fn int_slice(&self, name: &str) -> Option<&[i64]> {
        self.value(name).and_then(FlagValue::as_int_slice)
    }
}
