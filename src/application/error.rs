//! Dispatch errors (wraps parse errors and hook failures)

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::domain::ParseError;

/// Error type returned by hooks and handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single hook call.
pub type HookResult = Result<(), BoxError>;

/// Lifecycle stage that produced a hook failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Before,
    Action,
    After,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Before => "before",
            Stage::Action => "action",
            Stage::After => "after",
        };
        f.write_str(name)
    }
}

/// Failure returned by one lifecycle hook, tagged with its stage.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct HookFailure {
    stage: Stage,
    source: BoxError,
}

impl HookFailure {
    pub fn new(stage: Stage, source: BoxError) -> Self {
        Self { stage, source }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

/// Terminal failure of a dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("command not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Hook(#[from] HookFailure),

    /// Two or more failures from one lifecycle, in before, action, after order.
    #[error("{}", .0.iter().join("\n"))]
    Composite(Vec<DispatchError>),

    /// Replacement produced by a usage-error handler.
    #[error("{0}")]
    Intercepted(BoxError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    pub(crate) fn hook(stage: Stage, source: BoxError) -> Self {
        Self::Hook(HookFailure::new(stage, source))
    }

    /// Constituent failures: the members of a composite, otherwise just `self`.
    pub fn failures(&self) -> &[DispatchError] {
        match self {
            DispatchError::Composite(all) => all,
            other => std::slice::from_ref(other),
        }
    }

    /// Stage of a hook failure, `None` for every other kind.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DispatchError::Hook(failure) => Some(failure.stage()),
            _ => None,
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            DispatchError::Parse(e) => Some(e),
            _ => None,
        }
    }

    /// Usage errors are the caller's fault: bad flags or an unknown command.
    pub fn is_usage(&self) -> bool {
        matches!(self, DispatchError::Parse(_) | DispatchError::NotFound(_))
    }
}

/// Collapse the failures of one lifecycle into a single outcome.
///
/// Nothing is dropped: two or more failures become a composite. Nested
/// composites are merged so every member keeps its own stage.
pub fn aggregate(failures: Vec<DispatchError>) -> DispatchResult<()> {
    let mut failures: Vec<DispatchError> = failures
        .into_iter()
        .flat_map(|failure| match failure {
            DispatchError::Composite(members) => members,
            other => vec![other],
        })
        .collect();
    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(DispatchError::Composite(failures)),
    }
}
