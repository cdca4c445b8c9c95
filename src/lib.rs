pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod warehouse;

pub use catalog::{Catalog, Statement, StatementKind};
pub use cli::{Cli, Commands};
pub use config::DwhConfig;
pub use error::{ErrorKind, EtlError, Result};
pub use pipeline::{EtlRun, RunState};
pub use warehouse::{RedshiftSession, Session};
