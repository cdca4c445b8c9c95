use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "songplays-dwh")]
#[command(version, about = "Load song play logs from S3 into a Redshift star schema")]
pub struct Cli {
    /// Config file (default: ./dwh.toml, then the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Defaults to `etl` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Bulk-load the staging tables, then fill the star schema
    Etl,

    /// Drop and recreate all tables
    CreateTables,

    /// List every statement name, grouped in execution order
    ListStatements,

    /// Print the SQL of one statement
    ShowSql {
        /// Statement name, e.g. staging_events_copy
        name: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Etl)
    }
}
