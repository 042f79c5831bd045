use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tenzro",
    about = "Tenzro Store: file-backed document storage for ledger nodes",
    version,
)]
pub struct Cli {
    /// Store directory
    #[arg(short, long, global = true, default_value = "ledger_data")]
    pub dir: PathBuf,

    /// Node identifier
    #[arg(short, long, global = true, default_value = "node1")]
    pub node: String,

    /// TOML file with store configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a JSON document under a key
    Put(PutArgs),
    /// Print the document stored under a key
    Get(GetArgs),
    /// List stored keys
    List,
    /// Copy every entry into another directory
    Replicate(ReplicateArgs),
    /// Remove every entry
    Clear,
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    /// Document as JSON text
    pub document: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct ReplicateArgs {
    /// Follower directory
    pub target: PathBuf,
}
