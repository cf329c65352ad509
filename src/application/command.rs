//! Commands: named units of dispatch with flags and lifecycle hooks

use std::fmt;

use tracing::{debug, instrument};

use crate::application::error::{DispatchError, DispatchResult, HookResult};
use crate::application::lifecycle::{
    intercept, run_action, run_lifecycle, Hook, UsageErrorHandler,
};
use crate::application::parser::{FlagParser, ParseOutcome};
use crate::application::{App, Context};
use crate::domain::{FlagSpec, ParseError};

/// A named command with its own flags, hooks and optional nested commands.
///
/// ```ignore
/// let cmd = Command::new("bar")
///     .alias("b")
///     .flag(FlagSpec::int("flag"))
///     .before(|c| { c.metadata_mut().insert("msg", "hello"); Ok(()) })
///     .action(|c| { println!("{:?}", c.args()); Ok(()) });
/// ```
#[derive(Default)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub description: String,
    pub flags: Vec<FlagSpec>,
    /// Pass every token after the command name through as a positional.
    pub skip_flag_parsing: bool,
    /// Stop flag parsing at the first positional instead of scanning all tokens.
    /// Always the case for commands with subcommands, whose first positional names one.
    pub skip_arg_reorder: bool,
    /// Do not recognize the implicit help flag.
    pub hide_help: bool,
    pub before: Option<Hook>,
    pub action: Option<Hook>,
    pub after: Option<Hook>,
    pub on_usage_error: Option<UsageErrorHandler>,
    pub subcommands: Vec<Command>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn skip_flag_parsing(mut self, skip: bool) -> Self {
        self.skip_flag_parsing = skip;
        self
    }

    pub fn skip_arg_reorder(mut self, skip: bool) -> Self {
        self.skip_arg_reorder = skip;
        self
    }

    pub fn hide_help(mut self, hide: bool) -> Self {
        self.hide_help = hide;
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

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    /// Exact, case-sensitive match against the name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Parse `args` (the tokens after this command's name) and run the lifecycle.
    ///
    /// A parse failure ends the invocation before any hook runs; hook failures never do.
    #[instrument(level = "debug", skip_all, fields(command = %self.name))]
    pub fn run(&self, app: &App, parent: &Context<'_>, args: &[String]) -> DispatchResult<()> {
        debug!("run: command={}, args={:?}", self.name, args);

        let outcome = if self.skip_flag_parsing {
            ParseOutcome {
                args: args.to_vec(),
                ..Default::default()
            }
        } else {
            let help_names: &[String] = if self.hide_help || !app.settings.help_enabled {
                &[]
            } else {
                app.settings.help_names.as_slice()
            };
            let parsed = FlagParser::new(&self.flags)
                .with_help(help_names)
                .reorder(!self.skip_arg_reorder && self.subcommands.is_empty())
                .parse(args);
            match parsed {
                Ok(outcome) => outcome,
                Err(err) => {
                    let ctx = self.context(app, parent, ParseOutcome {
                        args: args.to_vec(),
                        ..Default::default()
                    });
                    let is_subcommand = ctx.is_subcommand();
                    return intercept(&ctx, self.on_usage_error.as_ref(), err, is_subcommand);
                }
            }
        };

        let ctx = self.context(app, parent, outcome);
        if ctx.help_requested() {
            debug!("run: help requested for {}", self.name);
            return app.show_help(&ctx);
        }

        run_lifecycle(
            &ctx,
            self.before.as_ref(),
            |ctx| self.run_action_stage(app, ctx),
            self.after.as_ref(),
        )
    }

    fn context<'c>(
        &'c self,
        app: &'c App,
        parent: &'c Context<'c>,
        outcome: ParseOutcome,
    ) -> Context<'c> {
        Context::new(
            app.metadata_cell(),
            &self.flags,
            outcome,
            Some(parent),
            Some(&self.name),
        )
    }

    /// Dispatch to a matching subcommand, else run this command's own action.
    fn run_action_stage(&self, app: &App, ctx: &Context<'_>) -> DispatchResult<()> {
        if self.subcommands.is_empty() {
            return run_action(ctx, self.action.as_ref());
        }
        match ctx.args().split_first() {
            Some((name, rest)) => match find_command(&self.subcommands, name) {
                Some(sub) => sub.run(app, ctx, rest),
                None if self.action.is_some() => run_action(ctx, self.action.as_ref()),
                None => Err(DispatchError::NotFound(name.clone())),
            },
            None => run_action(ctx, self.action.as_ref()),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("flags", &self.flags)
            .field("skip_flag_parsing", &self.skip_flag_parsing)
            .field("skip_arg_reorder", &self.skip_arg_reorder)
            .field("hide_help", &self.hide_help)
            .field("before", &self.before.is_some())
            .field("action", &self.action.is_some())
            .field("after", &self.after.is_some())
            .field("on_usage_error", &self.on_usage_error.is_some())
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// First sibling whose name or alias equals `name`.
pub fn find_command<'c>(commands: &'c [Command], name: &str) -> Option<&'c Command> {
    commands.iter().find(|c| c.matches(name))
}
