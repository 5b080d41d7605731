//! Command-line argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fvm - Flutter Version Management
#[derive(Parser, Debug)]
#[command(name = "fvm")]
#[command(version, about = "Manage multiple Flutter SDK versions side by side")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Arguments available to every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the installed SDK versions
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Link that points at the active SDK
    #[arg(long, global = true, value_name = "PATH")]
    pub active_link: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List installed versions
    #[command(visible_alias = "ls")]
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Activate a version, installing it first if needed
    Use {
        /// Channel name or release version
        #[arg(id = "version_arg", value_name = "VERSION")]
        version: String,
    },

    /// Remove an installed version
    #[command(visible_alias = "rm")]
    Remove {
        /// Installed version name
        #[arg(id = "version_arg", value_name = "VERSION")]
        version: String,
    },

    /// Remove every installed version except the active one
    #[command(alias = "shake")]
    Prune,

    /// List releases available upstream, newest first
    Releases {
        /// Only show this many releases
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show the release channels and which are installed
    Channels,

    /// Print the workspace and active link locations
    Dir,
}
