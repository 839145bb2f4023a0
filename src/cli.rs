// ABOUTME: Command-line interface definition for the ctxfork binary.
// ABOUTME: Global workspace/verbosity flags plus capture, prompt, list, and restore subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `ctxfork` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ctxfork",
    version,
    about = "Snapshot workspace state and build context restoration prompts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture the current workspace state and store it
    Capture,
    /// Print the restoration prompt for the latest stored session
    Prompt(ConversationArgs),
    /// List stored session files, oldest first
    List,
    /// Capture, then print the restoration prompt (the default)
    Restore(ConversationArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConversationArgs {
    /// Conversation ID to resume
    #[arg(short, long)]
    pub conversation: Option<String>,
}

impl Cli {
    /// The subcommand to run, with no subcommand meaning `restore`.
    pub fn resolved_command(&self) -> Commands {
        match &self.command {
            Some(Commands::Capture) => Commands::Capture,
            Some(Commands::Prompt(args)) => Commands::Prompt(args.clone()),
            Some(Commands::List) => Commands::List,
            Some(Commands::Restore(args)) => Commands::Restore(args.clone()),
            None => Commands::Restore(ConversationArgs::default()),
        }
    }

    /// Filter level for the tracing subscriber.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
