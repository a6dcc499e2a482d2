//! ShellPilot - drive a scripted command sequence through a real shell
//!
//! Reads a command sequence (JSON, the generator wire format) or a single
//! command, executes it against the configured shell, streams output to
//! stdout, and answers password/confirmation prompts interactively from
//! stdin.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use shellpilot::config::ConfigLoader;
use shellpilot::events::{ChannelSink, SessionEvent};
use shellpilot::models::PromptKind;
use shellpilot::{CommandSequence, EngineConfig, SequenceExecutor, SessionOutcome, ShellProfile};

/// Parsed command line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Path to a sequence JSON file
    sequence_path: Option<PathBuf>,
    /// Single command to run instead of a sequence file
    command: Option<String>,
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Shell program override
    shell: Option<String>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => {
                    print_help();
                    process::exit(0);
                }
                "-V" | "--version" => {
                    println!("shellpilot {}", shellpilot::VERSION);
                    process::exit(0);
                }
                "--debug" => {
                    app_args.debug = true;
                }
                "-c" | "--command" => {
                    i += 1;
                    let value = args.get(i).context("--command requires a value")?;
                    app_args.command = Some(value.clone());
                }
                "--config" => {
                    i += 1;
                    let value = args.get(i).context("--config requires a path")?;
                    app_args.config_path = Some(PathBuf::from(value));
                }
                "--shell" => {
                    i += 1;
                    let value = args.get(i).context("--shell requires a program")?;
                    app_args.shell = Some(value.clone());
                }
                other if !other.starts_with('-') => {
                    app_args.sequence_path = Some(PathBuf::from(other));
                }
                other => {
                    anyhow::bail!("unknown option: {}", other);
                }
            }
            i += 1;
        }

        Ok(app_args)
    }
}

fn print_help() {
    println!("shellpilot {}", shellpilot::VERSION);
    println!("Drive a scripted command sequence through an interactive shell");
    println!();
    println!("USAGE:");
    println!("    shellpilot [OPTIONS] [SEQUENCE.json]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --command <CMD>    Run a single command instead of a sequence file");
    println!("        --config <PATH>    Load configuration from PATH");
    println!("        --shell <PROGRAM>  Shell program to drive");
    println!("        --debug            Enable debug logging");
    println!("    -h, --help             Print help");
    println!("    -V, --version          Print version");
}

fn load_config(args: &AppArgs) -> Result<EngineConfig> {
    let mut config = match &args.config_path {
        Some(path) => {
            let config = ConfigLoader::load_from_path(path)?;
            config.validate()?;
            config
        }
        None => ConfigLoader::load()?,
    };

    if let Some(shell) = &args.shell {
        config.shell = ShellProfile::for_program(shell.clone());
    }

    Ok(config)
}

fn load_sequence(args: &AppArgs) -> Result<CommandSequence> {
    if let Some(command) = &args.command {
        return Ok(CommandSequence::single(command.clone()));
    }

    let path = args
        .sequence_path
        .as_ref()
        .context("expected a sequence file or --command; see --help")?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let sequence = CommandSequence::from_json(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(sequence)
}

async fn run(args: AppArgs) -> Result<i32> {
    let config = load_config(&args)?;
    let sequence = load_sequence(&args)?;
    debug!("executing {} command(s)", sequence.total_commands);

    let (sink, mut events) = ChannelSink::new();
    let executor = SequenceExecutor::spawn(config, sequence, Box::new(sink))?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut outcome: Option<SessionOutcome> = None;

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Output { text, .. } => {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            SessionEvent::Prompt { prompt, .. } => {
                match prompt.kind {
                    PromptKind::Password => eprint!("{} ", prompt.message),
                    PromptKind::Confirmation => {
                        let options = prompt
                            .options
                            .as_deref()
                            .map(|opts| opts.join("/"))
                            .unwrap_or_default();
                        eprint!("{} ({}) ", prompt.message, options);
                    }
                }
                let answer = stdin
                    .next_line()
                    .await
                    .context("failed to read response from stdin")?
                    .unwrap_or_default();
                executor.submit_response(answer);
            }
            SessionEvent::Finished { outcome: result, .. } => {
                outcome = Some(result);
                break;
            }
        }
    }

    let outcome = match outcome {
        Some(outcome) => outcome,
        None => executor.wait().await,
    };

    match outcome {
        SessionOutcome::Completed(output) => {
            if output.is_empty() {
                eprintln!("completed (no output)");
            }
            Ok(0)
        }
        SessionOutcome::Failed(reason) => {
            error!("sequence failed: {}", reason);
            eprintln!("failed: {}", reason);
            Ok(1)
        }
        SessionOutcome::Cancelled => {
            eprintln!("cancelled");
            Ok(130)
        }
    }
}

#[tokio::main]
async fn main() {
    let args = match AppArgs::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let filter = if args.debug {
        EnvFilter::new("shellpilot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shellpilot=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(2);
        }
    }
}
