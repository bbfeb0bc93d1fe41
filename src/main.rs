use anyhow::Result;
use clap::Parser;
use nexus::config::Config;
use nexus::indexer::{SourceIndexer, scan};
use nexus::{cli, logging, rpc};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(args.verbose);
    let config = Config::from_env();

    match args.command {
        cli::Command::Serve => rpc::serve(config),
        cli::Command::Compile {
            path,
            targets,
            json,
        } => {
            let app = rpc::App::new(config);
            let result = app.context().compile(&path, &targets);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", result.bytecode);
                eprintln!("{}", result.summary);
            }
            Ok(())
        }
        cli::Command::Index { path } => {
            let indexer = SourceIndexer::new(scan::ScanOptions::new(config.respect_ignore));
            let (nodes, stats) = indexer.index_with_stats(&path);
            if stats.errors > 0 {
                eprintln!(
                    "nexus: {} of {} files failed to index",
                    stats.errors, stats.scanned
                );
            }
            println!("{}", serde_json::to_string_pretty(&nodes)?);
            Ok(())
        }
        cli::Command::Request {
            method,
            params,
            params_file,
            id,
        } => {
            let params_raw = if let Some(path) = params_file {
                std::fs::read_to_string(&path)?
            } else {
                params
            };
            let response = rpc::call(config, method, &params_raw, &id)?;
            println!("{response}");
            Ok(())
        }
    }
}
