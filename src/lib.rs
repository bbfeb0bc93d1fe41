pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod context;
pub mod fetch;
pub mod filter;
pub mod indexer;
pub mod logging;
pub mod model;
pub mod rpc;
pub mod rules;
pub mod util;
