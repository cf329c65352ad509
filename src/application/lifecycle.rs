//! Before/action/after orchestration shared by commands and the application root

use tracing::debug;

use crate::application::error::{aggregate, DispatchError, DispatchResult, HookResult, Stage};
use crate::application::Context;
use crate::domain::ParseError;

/// Hook run before, as, or after a command's action.
pub type Hook = Box<dyn Fn(&Context<'_>) -> HookResult>;

/// Called when flag parsing fails: `(context, error, is_subcommand)`.
///
/// `Ok(())` suppresses the failure, `Err(e)` replaces it.
pub type UsageErrorHandler = Box<dyn Fn(&Context<'_>, &ParseError, bool) -> HookResult>;

/// Runs all three stages regardless of earlier failures and reports every failure.
pub(crate) fn run_lifecycle<F>(
    ctx: &Context<'_>,
    before: Option<&Hook>,
    action: F,
    after: Option<&Hook>,
) -> DispatchResult<()>
where
    F: FnOnce(&Context<'_>) -> DispatchResult<()>,
{
    let mut failures = Vec::new();

    if let Some(hook) = before {
        if let Err(e) = hook(ctx) {
            debug!("run_lifecycle: before failed: {}", e);
            failures.push(DispatchError::hook(Stage::Before, e));
        }
    }

    if let Err(e) = action(ctx) {
        debug!("run_lifecycle: action failed: {}", e);
        failures.push(e);
    }

    if let Some(hook) = after {
        if let Err(e) = hook(ctx) {
            debug!("run_lifecycle: after failed: {}", e);
            failures.push(DispatchError::hook(Stage::After, e));
        }
    }

    aggregate(failures)
}

/// Run an optional hook as the action stage.
pub(crate) fn run_action(ctx: &Context<'_>, action: Option<&Hook>) -> DispatchResult<()> {
    match action {
        Some(hook) => hook(ctx).map_err(|e| DispatchError::hook(Stage::Action, e)),
        None => Ok(()),
    }
}

/// Hand a parse failure to the usage-error handler, whose answer is final.
pub(crate) fn intercept(
    ctx: &Context<'_>,
    handler: Option<&UsageErrorHandler>,
    err: ParseError,
    is_subcommand: bool,
) -> DispatchResult<()> {
    match handler {
        Some(handler) => {
            debug!("intercept: err={}, is_subcommand={}", err, is_subcommand);
            handler(ctx, &err, is_subcommand).map_err(DispatchError::Intercepted)
        }
        None => Err(err.into()),
    }
}
