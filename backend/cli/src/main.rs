mod input;
mod runtime;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::info;

use taskpilot_commands::{build_default_dispatcher, CommandContext, CommandDispatcher};
use taskpilot_config::{config_dir, config_file_path, load_and_prepare, redacted_json};
use taskpilot_logging::init_logger;

use input::DirectiveReader;
use terminal_output::{echo_directive, note_error, note_info, print_result};

#[derive(Parser)]
#[command(name = "taskpilot")]
#[command(about = "TaskPilot: execute agent directives against built-in commands")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.taskpilot/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single directive and print its result
    Exec {
        /// Directive text; read from stdin when neither this nor --file is given
        directive: Option<String>,
        /// Read the directive from a file
        #[arg(short, long, conflicts_with = "directive")]
        file: Option<PathBuf>,
    },
    /// Execute directives from stdin until EOF or task_complete
    Repl,
    /// Print the command listing used in the model prompt
    Commands,
    /// Print the effective config with secrets redacted
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            note_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::Config { path: true } = cli.command {
        println!("{}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_and_prepare(&path).await?;
    init_logger(&runtime::log_options(&config, cli.log_level.as_deref()));
    runtime::log_config_warnings(&config);

    match cli.command {
        Commands::Config { .. } => {
            println!("{}", serde_json::to_string_pretty(&redacted_json(&config)?)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Commands => {
            println!("{}", build_default_dispatcher().registry().prompt_listing());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Exec { directive, file } => {
            let text = match (directive, file) {
                (Some(text), _) => text,
                (None, Some(file)) => tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read directive file: {}", file.display()))?,
                (None, None) => read_stdin().await?,
            };
            let ctx = runtime::build_context(&config).await?;
            let dispatcher = build_default_dispatcher();
            let result = dispatcher.execute_text(&ctx, &text).await;
            print_result(&result);
            Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Repl => {
            let ctx = runtime::build_context(&config).await?;
            repl(&build_default_dispatcher(), &ctx).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read directive from stdin")?;
    Ok(text)
}

/// Returns `true` when a directive asked for shutdown.
async fn run_directive(dispatcher: &CommandDispatcher, ctx: &CommandContext, text: &str) -> bool {
    echo_directive(text);
    let result = dispatcher.execute_text(ctx, text).await;
    print_result(&result);
    matches!(result, Ok(ref outcome) if outcome.is_shutdown())
}

async fn repl(dispatcher: &CommandDispatcher, ctx: &CommandContext) -> Result<()> {
    note_info("Reading directives from stdin (Ctrl-D to stop)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reader = DirectiveReader::new();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if let Some(text) = reader.push_line(&line) {
            if run_directive(dispatcher, ctx, &text).await {
                info!(session = %ctx.session_id, "Session ended by task_complete");
                return Ok(());
            }
        }
    }
    if let Some(text) = reader.finish() {
        run_directive(dispatcher, ctx, &text).await;
    }
    info!(session = %ctx.session_id, "Input closed");
    Ok(())
}
