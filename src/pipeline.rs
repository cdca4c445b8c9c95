//! Runs catalog statement groups against a warehouse session.
//!
//! Every statement is committed as soon as it succeeds. The first failure
//! aborts the group; statements already committed stay committed.

use std::fmt;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::catalog::{Catalog, Statement, StatementKind};
use crate::config::DwhConfig;
use crate::error::Result;
use crate::warehouse::{RedshiftSession, Session};

/// Progress of one ETL run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Disconnected,
    Connected,
    StagingLoaded,
    TransformComplete,
    Closed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Disconnected => write!(f, "disconnected"),
            RunState::Connected => write!(f, "connected"),
            RunState::StagingLoaded => write!(f, "staging loaded"),
            RunState::TransformComplete => write!(f, "transform complete"),
            RunState::Closed => write!(f, "closed"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Execute statements in order, committing after each one.
/// Bulk loads also log the row count the warehouse reports.
pub fn execute_group<S: Session>(
    session: &mut S,
    group: &str,
    statements: &[Statement],
) -> Result<()> {
    info!(group, statements = statements.len(), "running statement group");

    for (idx, statement) in statements.iter().enumerate() {
        let start = Instant::now();
        debug!(group, statement = %statement, "executing");

        let outcome = session
            .execute(statement)
            .and_then(|_| session.commit())
            .and_then(|_| match statement.kind {
                StatementKind::Copy => session.last_copy_count(),
                _ => Ok(None),
            });

        let rows_loaded = match outcome {
            Ok(rows) => rows,
            Err(e) => {
                error!(group, statement = %statement, error = %e, "statement failed");
                return Err(e);
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let step = idx + 1;
        match rows_loaded {
            Some(rows) => {
                info!(group, statement = %statement, step, elapsed_ms, rows, "committed")
            }
            None => info!(group, statement = %statement, step, elapsed_ms, "committed"),
        }
    }

    Ok(())
}

/// Drop and recreate every table
pub fn create_tables<S: Session>(session: &mut S, catalog: &Catalog) -> Result<()> {
    execute_group(session, "drop", catalog.drop_table_statements())?;
    execute_group(session, "create", catalog.create_table_statements())
}

/// Bulk-load the staging tables from object storage
pub fn run_bulk_load<S: Session>(session: &mut S, catalog: &Catalog) -> Result<()> {
    execute_group(session, "copy", catalog.copy_table_statements())
}

/// Fill the fact and dimension tables from the staging tables
pub fn run_transform<S: Session>(session: &mut S, catalog: &Catalog) -> Result<()> {
    execute_group(session, "insert", catalog.insert_table_statements())
}

/// One ETL run over an owned session.
///
/// Moves Disconnected → Connected → StagingLoaded → TransformComplete →
/// Closed, or to Failed on the first error. Nothing runs after a failure.
pub struct EtlRun<S: Session> {
    session: S,
    state: RunState,
}

impl<S: Session> EtlRun<S> {
    /// Acquire the session the run will own
    pub fn open<F>(connect: F) -> Result<Self>
    where
        F: FnOnce() -> Result<S>,
    {
        info!(state = %RunState::Disconnected, "etl run starting");
        match connect() {
            Ok(session) => {
                info!(state = %RunState::Connected, "etl run connected");
                Ok(Self {
                    session,
                    state: RunState::Connected,
                })
            }
            Err(e) => {
                error!(state = %RunState::Failed, error = %e, "etl run could not connect");
                Err(e)
            }
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Bulk load, then transform
    pub fn run(&mut self, catalog: &Catalog) -> Result<()> {
        let loaded = run_bulk_load(&mut self.session, catalog);
        self.advance(loaded, RunState::StagingLoaded)?;

        let transformed = run_transform(&mut self.session, catalog);
        self.advance(transformed, RunState::TransformComplete)
    }

    fn advance(&mut self, outcome: Result<()>, next: RunState) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.state = next;
                info!(state = %next, "etl run advanced");
                Ok(())
            }
            Err(e) => {
                self.state = RunState::Failed;
                error!(state = %self.state, "etl run aborted");
                Err(e)
            }
        }
    }

    /// Give up ownership of the session, ending the run
    pub fn into_session(mut self) -> (RunState, S) {
        if self.state != RunState::Failed {
            self.state = RunState::Closed;
        }
        (self.state, self.session)
    }
}

/// Connect, load staging, transform, disconnect
pub fn run_etl(config: &DwhConfig) -> Result<()> {
    let catalog = Catalog::new(config);
    let mut run = EtlRun::open(|| RedshiftSession::connect(&config.cluster))?;
    let outcome = run.run(&catalog);
    let (state, session) = run.into_session();

    match outcome {
        Ok(()) => {
            session.close()?;
            info!(state = %state, "etl run finished");
            Ok(())
        }
        // Dropping the session closes the connection
        Err(e) => Err(e),
    }
}

/// Connect, drop and recreate every table, disconnect
pub fn run_create_tables(config: &DwhConfig) -> Result<()> {
    let catalog = Catalog::new(config);
    let mut session = RedshiftSession::connect(&config.cluster)?;
    create_tables(&mut session, &catalog)?;
    session.close()
}
