use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_args_core::parse_duration;
use command_args_parser::InteractionOption;
use command_args_registry::{BotConfig, CommandRegistry, Context, Invocation};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "args-parse")]
#[command(about = "Check chat bot command definitions and parse invocations offline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a command definition file.
    Validate(ValidateArgs),
    /// List the commands of a definition file with their usage lines.
    List(ListArgs),
    /// Parse an argument string against one command.
    Parse(ParseArgs),
    /// Dispatch a full chat message (prefix or bot mention included).
    Dispatch(DispatchArgs),
    /// Dispatch every line of a file in parallel.
    Batch(BatchArgs),
    /// Evaluate a duration expression such as `1d12h`.
    Duration(DurationArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Command definition files (YAML, or JSON with a `.json` extension).
    #[arg(required = true)]
    configs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Command definition file.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Command definition file.
    #[arg(long)]
    config: PathBuf,
    /// Command name or alias.
    #[arg(long)]
    command: String,
    /// JSON file with slash-command options, parsed instead of text input.
    #[arg(long, conflicts_with = "input")]
    interaction: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Argument string. Read from stdin when omitted.
    input: Option<String>,
}

#[derive(Debug, Args)]
struct DispatchArgs {
    /// Command definition file.
    #[arg(long)]
    config: PathBuf,
    /// Override the prefix from the definition file.
    #[arg(long)]
    prefix: Option<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Full chat message.
    message: String,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Command definition file.
    #[arg(long)]
    config: PathBuf,
    /// File with one chat message per line.
    #[arg(long)]
    input: PathBuf,
    /// Number of worker threads (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct DurationArgs {
    /// Expression made of `<n><unit>` groups (units s, m, h, d, w, y).
    expression: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::List(args) => run_list(args),
        Command::Parse(args) => run_parse(args),
        Command::Dispatch(args) => run_dispatch(args),
        Command::Batch(args) => run_batch(args),
        Command::Duration(args) => run_duration(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut total = 0usize;
    for path in &args.configs {
        let (_, registry) = load_registry(path)?;
        total += registry.len();
    }
    println!(
        "Validated {} definition file(s) with {total} command(s).",
        args.configs.len()
    );
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let (_, registry) = load_registry(&args.config)?;
    for info in registry.commands() {
        let mut line = info.usage();
        if !info.aliases.is_empty() {
            line.push_str(&format!("  (aliases: {})", info.aliases.join(", ")));
        }
        if !info.description.is_empty() {
            line.push_str(&format!("  - {}", info.description));
        }
        println!("{line}");
    }
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let (_, registry) = load_registry(&args.config)?;

    let ctx = match &args.interaction {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            let options: Vec<InteractionOption> = serde_json::from_str(&raw)
                .map_err(|err| format!("Invalid interaction options in '{}': {err}", path.display()))?;
            registry
                .dispatch_interaction(&args.command, &options)
                .map_err(|err| err.to_string())?
        }
        None => {
            let input = match args.input {
                Some(input) => input,
                None => read_stdin()?,
            };
            let invocation = Invocation {
                trigger: args.command.to_lowercase(),
                args: input.trim_end_matches(['\r', '\n']).to_string(),
            };
            registry
                .dispatch_invocation(&invocation)
                .map_err(|err| err.to_string())?
        }
    };

    print_output(&ctx.args, args.format)
}

fn run_dispatch(args: DispatchArgs) -> Result<(), String> {
    let (config, registry) = load_registry(&args.config)?;
    let prefix = args.prefix.as_deref().unwrap_or(&config.prefix);

    let ctx = registry
        .dispatch(&args.message, prefix, config.bot_id.as_deref())
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "Message is not a command invocation".to_string())?;

    print_output(&ctx, args.format)
}

#[derive(Serialize)]
struct BatchEntry<'a> {
    line: usize,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Context<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let (config, registry) = load_registry(&args.config)?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;

    let messages: Vec<(usize, &str)> = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let bot_id = config.bot_id.as_deref();
    let entries: Vec<BatchEntry<'_>> = pool.install(|| {
        messages
            .par_iter()
            .map(|&(line, message)| {
                match registry.dispatch(message, &config.prefix, bot_id) {
                    Ok(Some(ctx)) => BatchEntry {
                        line,
                        message,
                        result: Some(ctx),
                        error: None,
                    },
                    Ok(None) => BatchEntry {
                        line,
                        message,
                        result: None,
                        error: Some("not a command invocation".to_string()),
                    },
                    Err(err) => BatchEntry {
                        line,
                        message,
                        result: None,
                        error: Some(err.to_string()),
                    },
                }
            })
            .collect()
    });

    let failures = entries.iter().filter(|e| e.error.is_some()).count();
    print_output(&entries, args.format)?;
    if failures > 0 {
        eprintln!("{failures} of {} message(s) were not dispatched.", entries.len());
    }
    Ok(())
}

fn run_duration(args: DurationArgs) -> Result<(), String> {
    let expr = parse_duration(&args.expression)
        .ok_or_else(|| format!("No duration found in '{}'", args.expression))?;
    println!("{} ({}s)", expr.display, expr.duration.as_secs());
    Ok(())
}

/// Loads a definition file and registers its commands.
fn load_registry(path: &Path) -> Result<(BotConfig, CommandRegistry), String> {
    let config = BotConfig::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    let registry = CommandRegistry::from_config(&config)
        .map_err(|err| format!("Invalid definitions in '{}': {err}", path.display()))?;
    debug!(path = %path.display(), commands = registry.len(), "Loaded command definitions");
    Ok((config, registry))
}

fn read_stdin() -> Result<String, String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    Ok(input)
}

fn print_output<T: Serialize + ?Sized>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}
