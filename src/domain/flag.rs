//! Flag specifications and typed flag values

use std::fmt;

/// Semantic type of a flag; drives coercion of the raw string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    /// Repeatable; every occurrence appends one value.
    StringSlice,
    /// Repeatable; every occurrence appends one value.
    IntSlice,
}

impl FlagKind {
    /// Bool flags never consume the following token as their value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, FlagKind::Bool)
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self, FlagKind::StringSlice | FlagKind::IntSlice)
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlagKind::Bool => "bool",
            FlagKind::Int => "int",
            FlagKind::Uint => "uint",
            FlagKind::Float => "float",
            FlagKind::String => "string",
            FlagKind::StringSlice => "string slice",
            FlagKind::IntSlice => "int slice",
        };
        f.write_str(name)
    }
}

/// A coerced flag value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    StringSlice(Vec<String>),
    IntSlice(Vec<i64>),
}

impl FlagValue {
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::Uint(_) => FlagKind::Uint,
            FlagValue::Float(_) => FlagKind::Float,
            FlagValue::String(_) => FlagKind::String,
            FlagValue::StringSlice(_) => FlagKind::StringSlice,
            FlagValue::IntSlice(_) => FlagKind::IntSlice,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            FlagValue::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FlagValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_slice(&self) -> Option<&[String]> {
        match self {
            FlagValue::StringSlice(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_slice(&self) -> Option<&[i64]> {
        match self {
            FlagValue::IntSlice(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<u64> for FlagValue {
    fn from(value: u64) -> Self {
        FlagValue::Uint(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        FlagValue::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::String(value)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(value: Vec<String>) -> Self {
        FlagValue::StringSlice(value)
    }
}

impl From<Vec<i64>> for FlagValue {
    fn from(value: Vec<i64>) -> Self {
        FlagValue::IntSlice(value)
    }
}

/// Declaration of a single flag accepted by a command or application.
///
/// ```ignore
/// let spec = FlagSpec::int("count").alias("c").default_value(1i64);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub kind: FlagKind,
    pub default: Option<FlagValue>,
    pub usage: String,
}

impl FlagSpec {
    pub fn new(name: impl Into<String>, kind: FlagKind) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            kind,
            default: None,
            usage: String::new(),
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Bool)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Int)
    }

    pub fn uint(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Uint)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::String)
    }

    pub fn string_slice(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::StringSlice)
    }

    pub fn int_slice(name: impl Into<String>) -> Self {
        Self::new(name, FlagKind::IntSlice)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Default returned by lookups when the flag was not given.
    /// A default whose kind differs from the flag's kind is ignored by the typed accessors.
    pub fn default_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Exact, case-sensitive match against the name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// All names this flag answers to, primary name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
