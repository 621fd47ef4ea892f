pub mod cli;
pub mod config;
pub mod filter;
pub mod ingest;
pub mod mapper;
pub mod query;
pub mod schema;
pub mod source;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{LoadConfig, ProvisionMode, QueryConfig};
