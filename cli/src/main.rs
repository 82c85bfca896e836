use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdtree_surface::{CommandDef, Surface, validate_definition};
use cmdtree_text::{DEFAULT_WIDTH, reflow};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format of parse reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Parse arguments and render help for declared command trees")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an argument list against a definition and print the result.
    Parse(ParseArgs),
    /// Print the documentation of a command of a definition.
    Doc(DocArgs),
    /// Reflow prose from a file or stdin.
    Reflow(ReflowArgs),
    /// Validate one or more definition files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Definition file (YAML, or JSON by `.json` extension).
    #[arg(long)]
    definition: PathBuf,
    /// Report format.
    #[arg(long, default_value = "json")]
    format: ReportFormat,
    /// Arguments to parse; put them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct DocArgs {
    /// Definition file (YAML, or JSON by `.json` extension).
    #[arg(long)]
    definition: PathBuf,
    /// Subcommand names leading to the command to document.
    commands: Vec<String>,
}

#[derive(Debug, Args)]
struct ReflowArgs {
    /// Line width.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Prefix of every output line.
    #[arg(long, default_value = "")]
    indent: String,
    /// Input file; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Doc(args) => run_doc(args),
        Command::Reflow(args) => run_reflow(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

fn load_surface(path: &Path) -> Result<Surface, String> {
    let def = CommandDef::load(path).map_err(|err| format!("failed to load '{}': {err}", path.display()))?;
    Surface::build(&def).map_err(|err| format!("'{}': {err}", path.display()))
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let mut surface = load_surface(&args.definition)?;
    let report = surface.parse(&args.args);
    debug!(path = ?report.path, consumed = report.consumed, "parsed arguments");

    let rendered = match args.format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|err| format!("failed to serialize report: {err}"))?,
        ReportFormat::Yaml => {
            serde_yaml::to_string(&report).map_err(|err| format!("failed to serialize report: {err}"))?
        }
    };
    println!("{}", rendered.trim_end());

    match report.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn run_doc(args: DocArgs) -> Result<(), String> {
    let surface = load_surface(&args.definition)?;
    let doc = surface.doc(&args.commands).map_err(|err| err.to_string())?;
    print!("{doc}");
    Ok(())
}

fn run_reflow(args: ReflowArgs) -> Result<(), String> {
    if args.indent.contains('\t') {
        return Err("--indent must not contain tab characters".to_string());
    }
    let text = match &args.input {
        Some(path) => {
            fs::read_to_string(path).map_err(|err| format!("failed to read '{}': {err}", path.display()))?
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            text
        }
    };
    print!("{}", reflow(&text, args.width, &args.indent));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut invalid = 0usize;
    for path in &args.inputs {
        let def = match CommandDef::load(path) {
            Ok(def) => def,
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                invalid += 1;
                continue;
            }
        };
        let errors = validate_definition(&def);
        if errors.is_empty() {
            println!("{}: ok", path.display());
            continue;
        }
        invalid += 1;
        for err in &errors {
            eprintln!("{}: {err}", path.display());
        }
    }

    if invalid > 0 {
        return Err(format!("{invalid} of {} definitions invalid", args.inputs.len()));
    }
    Ok(())
}
