pub mod redshift;

pub use redshift::*;

use crate::catalog::Statement;
use crate::error::Result;

/// A single connection to the warehouse.
///
/// Statements run inside an open transaction until [`Session::commit`] is
/// called. Dropping a session closes it and discards uncommitted work.
pub trait Session {
    /// Run one statement
    fn execute(&mut self, statement: &Statement) -> Result<()>;

    /// Commit everything executed since the last commit
    fn commit(&mut self) -> Result<()>;

    /// Rows loaded by the most recent COPY, when the warehouse reports it
    fn last_copy_count(&mut self) -> Result<Option<i64>> {
        Ok(None)
    }
}
