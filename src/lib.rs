pub mod cli;
pub mod config;
pub mod data;
pub mod ingest;
pub mod query;
pub mod server;
pub mod stats;
pub mod template;
