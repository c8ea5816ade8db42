mod sqlite;

pub use sqlite::SqliteConnection;

use crate::{
    catalog::Schema,
    error::LoaderError,
    tuple::{Field, Tuple},
};

/// The driver seam. Statements use positional `?` placeholders and every
/// statement runs on its own; nothing here opens a transaction.
pub trait SqlConnection {
    /// Run statement text with no parameters (DDL, pragmas).
    fn execute_ddl(&mut self, sql: &str) -> Result<(), LoaderError>;

    /// Run one parameterized statement. Returns the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Field]) -> Result<usize, LoaderError>;

    /// Run one parameterized statement once per row. Stops at the first
    /// failing row; rows inserted before it stay inserted.
    fn execute_many(&mut self, sql: &str, rows: &[Tuple]) -> Result<usize, LoaderError>;

    /// Run a query and decode every row against `schema`.
    fn query(&mut self, sql: &str, schema: &Schema) -> Result<Vec<Tuple>, LoaderError>;

    fn close(self) -> Result<(), LoaderError>
    where
        Self: Sized;
}

/// Run `f` against `conn` and close the connection afterwards, whether `f`
/// succeeded or not. An error from `f` wins over an error from closing.
pub fn with_connection<C, T, F>(mut conn: C, f: F) -> Result<T, LoaderError>
where
    C: SqlConnection,
    F: FnOnce(&mut C) -> Result<T, LoaderError>,
{
    let result = f(&mut conn);
    let closed = conn.close();
    let value = result?;
    closed?;
    Ok(value)
}
