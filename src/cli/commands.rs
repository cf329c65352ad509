//! Demo application dispatched by the `cliflow` binary

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{App, Command, Context, HookResult};
use crate::cli::args::Cli;
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::FlagSpec;

const GREET_NAME: &str = "greet.name";
const REMOTES: &str = "remote.list";

#[instrument(skip(cli))]
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    debug!("execute_command: args={:?}", cli.args);
    let app = build_app();
    app.run(cli.args.iter().cloned())?;
    Ok(())
}

pub fn build_app() -> App {
    let app = App::new("cliflow")
        .usage("demo of flag parsing, dispatch and lifecycle hooks")
        .version(env!("CARGO_PKG_VERSION"));
    let settings = app.settings.clone();
    app.flag(
        FlagSpec::bool("quiet")
            .alias("q")
            .usage("suppress command output"),
    )
    .help(move |c| render_help(&settings, c))
    .command(greet())
        .command(exec())
        .command(remote())
}

fn quiet(ctx: &Context<'_>) -> bool {
    ctx.lookup("quiet")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// `name version - usage`, omitting the parts that are unset.
fn banner(settings: &Settings) -> String {
    let mut banner = settings.name.clone();
    if let Some(version) = &settings.version {
        banner.push(' ');
        banner.push_str(version);
    }
    if !settings.usage.is_empty() {
        banner.push_str(" - ");
        banner.push_str(&settings.usage);
    }
    banner
}

fn render_help(settings: &Settings, ctx: &Context<'_>) -> HookResult {
    if ctx.command_name().is_none() {
        output::info(&banner(settings));
    }
    let mut path: Vec<&str> = ctx.lineage().filter_map(|c| c.command_name()).collect();
    path.push(&settings.name);
    output::header(&format!(
        "usage: {} [flags] [args]",
        path.iter().rev().join(" ")
    ));
    for spec in ctx.specs() {
        let names = spec.names().map(|n| format!("-{}", n)).join(", ");
        output::detail(&format!("{:<16} {} ({})", names, spec.usage, spec.kind));
    }
    Ok(())
}

fn greet() -> Command {
    Command::new("greet")
        .alias("hi")
        .usage("print a greeting")
        .flag(
            FlagSpec::string("name")
                .alias("n")
                .default_value("world")
                .usage("who to greet"),
        )
        .flag(
            FlagSpec::int("count")
                .alias("c")
                .default_value(1i64)
                .usage("how many times"),
        )
        .before(|c| {
            let name = c.string("name").unwrap_or("world").to_string();
            c.metadata_mut().insert(GREET_NAME, name);
            Ok(())
        })
        .action(|c| {
            let count = c.int("count").unwrap_or(1);
            if count < 0 {
                return Err(format!("count must not be negative: {}", count).into());
            }
            let meta = c.metadata();
            let name = meta.get_str(GREET_NAME).unwrap_or("world");
            if !quiet(c) {
                for _ in 0..count {
                    output::info(&format!("hello, {}", name));
                }
            }
            Ok(())
        })
        .on_usage_error(|_, err, _| Err(format!("greet: {}", err).into()))
}

fn exec() -> Command {
    Command::new("exec")
        .usage("echo the raw arguments, flags included")
        .skip_flag_parsing(true)
        .action(|c| {
            if !quiet(c) {
                output::action("exec", &c.args().join(" "));
            }
            Ok(())
        })
}

fn remote() -> Command {
    Command::new("remote")
        .usage("manage remotes for this run")
        .before(|c| {
            let mut meta = c.metadata_mut();
            if !meta.contains_key(REMOTES) {
                meta.insert(REMOTES, Vec::<(String, String)>::new());
            }
            Ok(())
        })
        .subcommand(
            Command::new("add")
                .usage("add a remote: add <name> <url>")
                .action(|c| {
                    let (Some(name), Some(url)) = (c.arg(0), c.arg(1)) else {
                        return Err("add needs <name> and <url>".into());
                    };
                    let mut meta = c.metadata_mut();
                    if let Some(remotes) = meta.get_mut::<Vec<(String, String)>>(REMOTES) {
                        remotes.push((name.to_string(), url.to_string()));
                    }
                    drop(meta);
                    if !quiet(c) {
                        output::action("added", &format!("{} {}", name, url));
                    }
                    Ok(())
                }),
        )
        .subcommand(Command::new("list").alias("ls").action(|c| {
            let meta = c.metadata();
            let remotes = meta
                .get::<Vec<(String, String)>>(REMOTES)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for (name, url) in remotes {
                output::detail(&format!("{}\t{}", name, url));
            }
            Ok(())
        }))
}
