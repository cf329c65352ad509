//! Application root: command registry, metadata bag and top-level dispatch

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use tracing::{debug, instrument};

use crate::application::command::find_command;
use crate::application::error::{DispatchError, DispatchResult, HookResult, Stage};
use crate::application::lifecycle::{
    intercept, run_action, run_lifecycle, Hook, UsageErrorHandler,
};
use crate::application::parser::{FlagParser, ParseOutcome};
use crate::application::{Command, Context};
use crate::config::Settings;
use crate::domain::{FlagSpec, Metadata, ParseError};

/// Called with the unmatched command name; its result becomes the dispatch result.
pub type NotFoundHandler = Box<dyn Fn(&Context<'_>, &str) -> HookResult>;

/// The application: owns commands, application-level flags and hooks, and the
/// metadata bag every context of every run borrows.
#[derive(Default)]
pub struct App {
    pub settings: Settings,
    pub flags: Vec<FlagSpec>,
    pub commands: Vec<Command>,
    pub before: Option<Hook>,
    /// Runs when no command name is given, or with all positionals when no commands exist.
    pub action: Option<Hook>,
    pub after: Option<Hook>,
    pub on_usage_error: Option<UsageErrorHandler>,
    pub command_not_found: Option<NotFoundHandler>,
    /// Invoked instead of the lifecycle when the help flag is given.
    pub help: Option<Hook>,
    metadata: RefCell<Metadata>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            settings: Settings::new(name),
            ..Default::default()
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.settings.usage = usage.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.settings.version = Some(version.into());
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>) -> HookResult + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn action<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>) -> HookResult + 'static,
    {
        self.action = Some(Box::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>) -> HookResult + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn on_usage_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context<'_>, &ParseError, bool) -> HookResult + 'static,
    {
        self.on_usage_error = Some(Box::new(handler));
        self
    }

    pub fn command_not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context<'_>, &str) -> HookResult + 'static,
    {
        self.command_not_found = Some(Box::new(handler));
        self
    }

    pub fn help<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Context<'_>) -> HookResult + 'static,
    {
        self.help = Some(Box::new(hook));
        self
    }

    pub fn metadata(&self) -> Ref<'_, Metadata> {
        self.metadata.borrow()
    }

    pub fn metadata_mut(&self) -> RefMut<'_, Metadata> {
        self.metadata.borrow_mut()
    }

    pub(crate) fn metadata_cell(&self) -> &RefCell<Metadata> {
        &self.metadata
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        find_command(&self.commands, name)
    }

    /// Run with the argument list, program name excluded.
    ///
    /// Application flags are parsed up to the first positional, which names the command.
    #[instrument(level = "debug", skip_all, fields(app = %self.settings.name))]
    pub fn run<I, S>(&self, args: I) -> DispatchResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!("run: args={:?}", args);

        let parsed = FlagParser::new(&self.flags)
            .with_help(self.help_names())
            .reorder(false)
            .parse(&args);
        let outcome = match parsed {
            Ok(outcome) => outcome,
            Err(err) => {
                let ctx = Context::new(
                    &self.metadata,
                    &self.flags,
                    ParseOutcome {
                        args,
                        ..Default::default()
                    },
                    None,
                    None,
                );
                return intercept(&ctx, self.on_usage_error.as_ref(), err, false);
            }
        };

        let ctx = Context::new(&self.metadata, &self.flags, outcome, None, None);
        if ctx.help_requested() {
            debug!("run: help requested");
            return self.show_help(&ctx);
        }

        run_lifecycle(
            &ctx,
            self.before.as_ref(),
            |ctx| self.dispatch(ctx),
            self.after.as_ref(),
        )
    }

    /// Hand control to the help handler; without one, help is a no-op.
    pub(crate) fn show_help(&self, ctx: &Context<'_>) -> DispatchResult<()> {
        run_action(ctx, self.help.as_ref())
    }

    fn help_names(&self) -> &[String] {
        if self.settings.help_enabled {
            self.settings.help_names.as_slice()
        } else {
            &[]
        }
    }

    fn dispatch(&self, ctx: &Context<'_>) -> DispatchResult<()> {
        if self.commands.is_empty() {
            return run_action(ctx, self.action.as_ref());
        }
        let Some((name, rest)) = ctx.args().split_first() else {
            return run_action(ctx, self.action.as_ref());
        };
        match self.find_command(name) {
            Some(command) => command.run(self, ctx, rest),
            None => {
                debug!("dispatch: command not found: {}", name);
                match &self.command_not_found {
                    Some(handler) => handler(ctx, name.as_str())
                        .map_err(|e| DispatchError::hook(Stage::Action, e)),
                    None => Err(DispatchError::NotFound(name.clone())),
                }
            }
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("settings", &self.settings)
            .field("flags", &self.flags)
            .field("commands", &self.commands)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_flags_stop_at_command_name() {
        let app = App::new("foo")
            .flag(FlagSpec::bool("debug"))
            .command(Command::new("bar").flag(FlagSpec::int("flag")).action(|c| {
                assert_eq!(c.int("flag"), Some(3));
                assert!(c.lookup("debug").and_then(|v| v.as_bool()).unwrap_or(false));
                Ok(())
            }));

        app.run(["-debug", "bar", "-flag", "3"]).unwrap();
    }

    #[test]
    fn test_unknown_command_is_not_found() {
        let app = App::new("foo").command(Command::new("bar"));
        let err = app.run(["baz"]).unwrap_err();
        assert!(matches!(err, DispatchError::NotFound(ref n) if n == "baz"));
        assert_eq!(err.to_string(), "command not found: baz");
    }

    #[test]
    fn test_no_arguments_runs_app_action() {
        let app = App::new("foo")
            .command(Command::new("bar"))
            .action(|c| {
                c.metadata_mut().insert("ran", true);
                Ok(())
            });
        app.run(Vec::<String>::new()).unwrap();
        assert_eq!(app.metadata().get::<bool>("ran"), Some(&true));
    }
}
