use std::sync::{Arc, Mutex};

use cmdtree_core::{
    Binding, Command, CommandError, CommandTree, OptionError, OptionSet, OptionSpec, ParseContext,
    ParseError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Bound {
    flag: Binding<bool>,
    s: Binding<String>,
}

fn flag_and_string() -> (Bound, OptionSet) {
    let bound = Bound {
        flag: Binding::new(false),
        s: Binding::new(String::new()),
    };
    let options = OptionSet::from(vec![
        OptionSpec::boolean(&bound.flag, "flag", Some('f'), "a boolean option"),
        OptionSpec::string(&bound.s, "str", Some('s'), "a string option"),
    ]);
    (bound, options)
}

type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

fn recording(name: &str, calls: &Calls) -> Command {
    let calls = Arc::clone(calls);
    let label = name.to_string();
    Command::new(name).with_exec(move |args| {
        calls.lock().unwrap().push((label.clone(), args.to_vec()));
        Ok(())
    })
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

// ---------------------------------------------------------------------------
// Option parsing end to end
// ---------------------------------------------------------------------------

#[test]
fn test_prefix_example_leaves_positional() {
    let (bound, mut options) = flag_and_string();
    let args = ["--s", "foo", "--fl", "bar"];
    let outcome = options.parse(&args, &mut ParseContext::default());
    assert_eq!(outcome.consumed, 3);
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(bound.s.get(), "foo");
    assert!(bound.flag.get());
    assert_eq!(&args[outcome.consumed..], ["bar"]);
}

#[test]
fn test_missing_parameter_example() {
    let (_bound, mut options) = flag_and_string();
    let outcome = options.parse(&["-s"], &mut ParseContext::default());
    assert_eq!(outcome.consumed, 1);
    assert_eq!(
        outcome.result,
        Err(ParseError::Single(OptionError::MissingParameter { option: "s".into() }))
    );
}

#[test]
fn test_terminator_stops_at_any_position() {
    let args = ["-f", "--str", "x", "-f", "--flag"];
    for k in 0..=args.len() {
        let mut with_dd: Vec<&str> = args.to_vec();
        with_dd.insert(k, "--");
        let (_bound, mut options) = flag_and_string();
        let outcome = options.parse(&with_dd, &mut ParseContext::default());
        assert_eq!(outcome.consumed, k + 1, "`--` inserted at {k}");
    }
}

#[test]
fn test_reset_is_idempotent() {
    let (bound, mut options) = flag_and_string();
    options.parse(&["-f", "-s", "value"], &mut ParseContext::default());
    assert!(bound.flag.get());

    options.reset().unwrap();
    let once = (bound.flag.get(), bound.s.get());
    options.reset().unwrap();
    assert_eq!((bound.flag.get(), bound.s.get()), once);
    assert_eq!(once, (false, String::new()));
}

#[test]
fn test_reset_reports_bad_default() {
    let n = Binding::new(0_i64);
    let mut options = OptionSet::from(vec![OptionSpec::int(&n, "jobs", Some('j'), "").with_default("lots")]);
    let err = options.reset().unwrap_err();
    assert!(err.has_error_for("jobs"));
}

// ---------------------------------------------------------------------------
// Tree resolution and running
// ---------------------------------------------------------------------------

#[test]
fn test_version_prefix_example() {
    let mut tree = CommandTree::new(Command::new("root"));
    let root = tree.root();
    let version = tree.add_subcommand(root, Command::new("version"));
    let resolution = tree.resolve(&["ver"]);
    assert!(resolution.is_ok());
    assert_eq!(resolution.path, vec![root, version]);
}

#[test]
fn test_run_passes_remaining_arguments() {
    let calls: Calls = Arc::default();
    let verbose = Binding::new(false);
    let mut tree = CommandTree::new(
        Command::new("tool").with_option(OptionSpec::boolean(&verbose, "verbose", Some('v'), "")),
    );
    let root = tree.root();
    let remote = tree.add_subcommand(root, Command::new("remote"));
    tree.add_subcommand(remote, recording("add", &calls));
    tree.add_subcommand(remote, recording("remove", &calls));

    tree.run(&["-v", "remote", "add", "origin", "-x"], &mut Vec::new()).unwrap();
    assert!(verbose.get());
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("add".to_string(), vec!["origin".to_string(), "-x".to_string()])]
    );

    let err = tree.run(&["remote"], &mut Vec::new()).unwrap_err();
    assert!(matches!(err, CommandError::NoExecutableCommand { .. }));

    let err = tree.run(&["remote", ""], &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "remote: couldn't find executable subcommand");
}

#[test]
fn test_descent_stops_at_failed_level() {
    let calls: Calls = Arc::default();
    let quiet = Binding::new(false);
    let mut tree = CommandTree::new(Command::new("tool"));
    let root = tree.root();
    let sub = tree.add_subcommand(
        root,
        Command::new("sub").with_option(OptionSpec::boolean(&quiet, "quiet", Some('q'), "")),
    );
    tree.add_subcommand(sub, recording("leaf", &calls));

    let resolution = tree.resolve(&["sub", "-x", "-y", "leaf"]);
    assert_eq!(resolution.path, vec![root, sub]);
    let err = resolution.error.unwrap();
    let parse = err.parse_error().unwrap();
    assert_eq!(parse.len(), 2);
    assert!(parse.has_error_for("-x"));
    assert!(parse.has_error_for("-y"));
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_help_option_prints_doc_instead_of_running() {
    let calls: Calls = Arc::default();
    let mut tree = CommandTree::new(Command::new("tool").with_info("does things"));
    let root = tree.root();
    tree.add_subcommand(root, recording("build", &calls).with_info("builds"));
    tree.add_help_option_to_all();

    let mut out = Vec::new();
    tree.run(&["build", "--help"], &mut out).unwrap();
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(
        output(out),
        "NAME\n    build - builds\n\nOPTIONS\n    -h, --help\n        prints help message for command\n"
    );

    tree.run(&["build", "x"], &mut Vec::new()).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn test_help_command_documents_deepest_command() {
    let mut tree = CommandTree::new(Command::new("tool").with_info("does things"));
    let root = tree.root();
    let remote = tree.add_subcommand(root, Command::new("remote").with_info("manages remotes"));
    tree.add_subcommand(remote, Command::new("add").with_info("adds a remote"));
    assert!(tree.add_help_command());

    let mut out = Vec::new();
    tree.run(&["help", "rem", "a"], &mut out).unwrap();
    assert_eq!(output(out), "NAME\n    add - adds a remote\n");

    let mut out = Vec::new();
    tree.run(&["help"], &mut out).unwrap();
    let doc = output(out);
    assert!(doc.starts_with("NAME\n    tool - does things\n"));
    assert!(doc.contains("SUBCOMMANDS\n    help   - prints help messages\n    remote - manages remotes\n"));

    let mut out = Vec::new();
    tree.run(&["he", "remote"], &mut out).unwrap();
    assert!(output(out).contains("    add - adds a remote"));
}
