use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nexus",
    version,
    about = "Compile C# code structure and architectural rules into LLM context",
    after_help = r#"Examples:
  nexus compile --path ./src --target OrderService --target FN:1234
  nexus index --path ./src
  nexus request --method compile_context --params '{"path":"./src","targets":[]}'
  nexus serve
"#
)]
pub struct Args {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run JSONL RPC server over stdin/stdout.
    Serve,
    /// Compile context for a path and print the DSL.
    Compile {
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// Node id (e.g. FN:123) or free text matched against path and summary.
        #[arg(long = "target")]
        targets: Vec<String>,
        /// Print the full JSON result instead of the DSL only.
        #[arg(long)]
        json: bool,
    },
    /// Index a path and print the nodes as JSON.
    Index {
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Run a single JSONL request and exit.
    Request {
        #[arg(long)]
        method: String,
        #[arg(long, default_value = "{}")]
        params: String,
        #[arg(long, value_name = "PATH")]
        params_file: Option<PathBuf>,
        #[arg(long, default_value = "1")]
        id: String,
    },
}
