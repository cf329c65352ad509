//! Tests for application-level dispatch: app flags and hooks, nested commands, help

use std::cell::RefCell;
use std::rc::Rc;

use cliflow::util::testing;
use cliflow::{App, Command, DispatchError, FlagSpec, FlagValue, Settings, Stage};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn given_app_hooks_when_command_runs_then_order_is_app_before_command_app_after() {
    // Arrange
    let calls = log();
    let (ab, cb, ca, aa) = (calls.clone(), calls.clone(), calls.clone(), calls.clone());
    let app = App::new("foo")
        .before(move |_| {
            ab.borrow_mut().push("app before".into());
            Ok(())
        })
        .after(move |_| {
            aa.borrow_mut().push("app after".into());
            Ok(())
        })
        .command(
            Command::new("bar")
                .before(move |_| {
                    cb.borrow_mut().push("bar before".into());
                    Ok(())
                })
                .action(move |_| {
                    ca.borrow_mut().push("bar action".into());
                    Ok(())
                }),
        );

    // Act
    app.run(["bar"]).unwrap();

    // Assert
    assert_eq!(
        *calls.borrow(),
        vec!["app before", "bar before", "bar action", "app after"]
    );
}

#[test]
fn given_command_parse_failure_when_app_after_fails_then_both_reported() {
    // Arrange
    let app = App::new("foo")
        .after(|_| Err("cleanup failed".into()))
        .command(Command::new("bar"));

    // Act
    let err = app.run(["bar", "-x"]).unwrap_err();

    // Assert
    assert_eq!(err.failures().len(), 2);
    assert!(err.failures()[0].parse_error().is_some());
    assert_eq!(err.failures()[1].stage(), Some(Stage::After));
    assert_eq!(
        err.to_string(),
        "flag provided but not defined: -x\ncleanup failed"
    );
}

#[test]
fn given_command_composite_when_app_after_fails_then_failures_are_merged() {
    // Arrange
    let app = App::new("foo")
        .after(|_| Err("app after".into()))
        .command(
            Command::new("bar")
                .before(|_| Err("b".into()))
                .after(|_| Err("a".into())),
        );

    // Act
    let err = app.run(["bar"]).unwrap_err();

    // Assert
    assert_eq!(err.failures().len(), 3);
    let stages: Vec<_> = err.failures().iter().map(|f| f.stage()).collect();
    assert_eq!(
        stages,
        vec![Some(Stage::Before), Some(Stage::After), Some(Stage::After)]
    );
    assert_eq!(err.to_string(), "b\na\napp after");
}

#[test]
fn given_unknown_command_when_handler_set_then_handler_decides() {
    // Arrange
    let missing = log();
    let seen = missing.clone();
    let app = App::new("foo")
        .command(Command::new("bar"))
        .command_not_found(move |_, name| {
            seen.borrow_mut().push(name.to_string());
            Ok(())
        });

    // Act
    let result = app.run(["baz", "x"]);

    // Assert
    assert!(result.is_ok());
    assert_eq!(*missing.borrow(), vec!["baz"]);
}

#[test]
fn given_unknown_app_flag_when_app_interceptor_set_then_it_is_called_at_top_level() {
    // Arrange
    let app = App::new("foo")
        .command(Command::new("bar"))
        .on_usage_error(|c, err, is_subcommand| {
            assert!(!is_subcommand);
            assert_eq!(c.args(), ["-verbose", "bar"]);
            Err(format!("app: {}", err).into())
        });

    // Act
    let err = app.run(["-verbose", "bar"]).unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "app: flag provided but not defined: -verbose");
}

#[test]
fn given_nested_commands_when_running_then_child_sees_parent_flags() {
    // Arrange
    let seen = log();
    let out = seen.clone();
    let app = App::new("foo")
        .flag(FlagSpec::string("profile").default_value("default"))
        .command(
            Command::new("remote")
                .flag(FlagSpec::bool("verbose").alias("v"))
                .subcommand(Command::new("add").alias("a").action(move |c| {
                    let path: Vec<_> = c.lineage().filter_map(|l| l.command_name()).collect();
                    out.borrow_mut().push(path.join("<"));
                    let profile = c.lookup("profile").and_then(FlagValue::as_str);
                    out.borrow_mut().push(profile.unwrap_or("").to_string());
                    let verbose = c.lookup("v").and_then(FlagValue::as_bool);
                    out.borrow_mut().push(format!("{:?}", verbose));
                    out.borrow_mut().push(c.args().join(","));
                    Ok(())
                })),
        );

    // Act
    app.run(["-profile", "dev", "remote", "-v", "a", "origin", "url"])
        .unwrap();

    // Assert
    assert_eq!(
        *seen.borrow(),
        vec!["add<remote", "dev", "Some(true)", "origin,url"]
    );
}

#[test]
fn given_command_with_subcommands_and_action_when_no_match_then_action_runs() {
    // Arrange
    let seen = log();
    let out = seen.clone();
    let app = App::new("foo").command(
        Command::new("remote")
            .subcommand(Command::new("add"))
            .action(move |c| {
                out.borrow_mut().extend(c.args().iter().cloned());
                Ok(())
            }),
    );

    // Act
    app.run(["remote", "show", "origin"]).unwrap();

    // Assert
    assert_eq!(*seen.borrow(), vec!["show", "origin"]);
}

#[test]
fn given_help_flag_when_running_then_help_handler_replaces_lifecycle() {
    // Arrange
    let seen = log();
    let (help_out, action_out) = (seen.clone(), seen.clone());
    let app = App::new("foo")
        .help(move |c| {
            help_out
                .borrow_mut()
                .push(format!("help {}", c.command_name().unwrap_or("foo")));
            Ok(())
        })
        .command(Command::new("bar").action(move |_| {
            action_out.borrow_mut().push("action".into());
            Ok(())
        }));

    // Act
    app.run(["bar", "--help"]).unwrap();
    app.run(["-h"]).unwrap();

    // Assert
    assert_eq!(*seen.borrow(), vec!["help bar", "help foo"]);
}

#[test]
fn given_hidden_help_when_help_flag_given_then_it_is_undefined() {
    // Arrange
    let app = App::new("foo").command(Command::new("bar").hide_help(true));

    // Act
    let err = app.run(["bar", "-help"]).unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "flag provided but not defined: -help");
}

#[test]
fn given_help_disabled_in_settings_when_help_flag_given_then_it_is_undefined() {
    // Arrange
    let app = App::with_settings(Settings::new("foo").without_help()).command(Command::new("bar"));

    // Act
    let err = app.run(["bar", "-h"]).unwrap_err();

    // Assert
    assert!(err.is_usage());
}

#[test]
fn given_skip_arg_reorder_when_flag_follows_positional_then_it_stays_positional() {
    // Arrange
    let seen = log();
    let out = seen.clone();
    let app = App::new("foo").command(
        Command::new("run")
            .flag(FlagSpec::bool("dry"))
            .skip_arg_reorder(true)
            .action(move |c| {
                out.borrow_mut().push(c.bool("dry").to_string());
                out.borrow_mut().extend(c.args().iter().cloned());
                Ok(())
            }),
    );

    // Act
    app.run(["run", "-dry", "script", "-dry"]).unwrap();

    // Assert
    assert_eq!(*seen.borrow(), vec!["true", "script", "-dry"]);
}

#[test]
fn given_metadata_when_running_twice_then_bag_outlives_each_run() {
    // Arrange
    let app = App::new("foo").command(Command::new("count").action(|c| {
        let mut meta = c.metadata_mut();
        let next = meta.get::<u32>("runs").copied().unwrap_or(0) + 1;
        meta.insert("runs", next);
        Ok(())
    }));

    // Act
    app.run(["count"]).unwrap();
    app.run(["count"]).unwrap();

    // Assert
    assert_eq!(app.metadata().get::<u32>("runs"), Some(&2));
}

#[test]
fn given_no_commands_when_running_then_app_action_gets_all_positionals() {
    // Arrange
    let seen = log();
    let out = seen.clone();
    let app = App::new("foo")
        .flag(FlagSpec::int_slice("n"))
        .action(move |c| {
            let total: i64 = c.int_slice("n").unwrap_or_default().iter().sum();
            out.borrow_mut().push(total.to_string());
            out.borrow_mut().extend(c.args().iter().cloned());
            Ok(())
        });

    // Act
    app.run(["-n", "2", "-n=3", "a", "b"]).unwrap();

    // Assert
    assert_eq!(*seen.borrow(), vec!["5", "a", "b"]);
}

#[test]
fn given_empty_args_without_action_when_running_then_ok() {
    let app = App::new("foo").command(Command::new("bar"));
    assert!(app.run(Vec::<String>::new()).is_ok());
}

#[test]
fn given_not_found_error_then_it_is_a_usage_error() {
    let app = App::new("foo").command(Command::new("bar"));
    let err = app.run(["Bar"]).unwrap_err();
    assert!(matches!(err, DispatchError::NotFound(ref n) if n == "Bar"));
    assert!(err.is_usage());
}
