// ABOUTME: Entry point for ctxfork: captures workspace state and prints restoration prompts.
// ABOUTME: Parses CLI args, initializes logging, loads config, and dispatches to the app.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use context_fork::app::App;
use context_fork::cli::{Cli, Commands};
use context_fork::config::Config;

fn main() {
    if let Err(error) = run() {
        eprintln!("ctxfork error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level())?;

    let config = Config::load()?;
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let workspace = resolve_workspace(cli.workspace.clone(), &cwd)?;
    let app = App::new(config, workspace, cwd);

    match cli.resolved_command() {
        Commands::Capture => {
            let (_, path) = app.capture_session_with_path()?;
            println!("{}", path.display());
        }
        Commands::Prompt(args) => {
            print!("{}", app.restoration_prompt(args.conversation.as_deref()));
        }
        Commands::List => {
            for path in app.history()? {
                println!("{}", path.display());
            }
        }
        Commands::Restore(args) => {
            app.capture_session()?;
            println!("Session state captured");
            println!("\nRestoration prompt:");
            print!("{}", app.restoration_prompt(args.conversation.as_deref()));
        }
    }

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("CTXFORK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_workspace(explicit: Option<PathBuf>, cwd: &std::path::Path) -> anyhow::Result<PathBuf> {
    let path = match explicit {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => return Ok(cwd.to_path_buf()),
    };
    path.canonicalize()
        .with_context(|| format!("workspace {} does not exist", path.display()))
}
