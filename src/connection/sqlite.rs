use rusqlite::{params_from_iter, Connection, OpenFlags};

use super::SqlConnection;
use crate::{
    catalog::Schema,
    config::ConnectionConfig,
    error::LoaderError,
    log_debug, log_info, log_warn,
    tuple::{Field, Tuple},
};

pub const IN_MEMORY: &str = ":memory:";

/// SQLite through rusqlite. SQLite has no server or accounts, so the
/// database name is the file path and host/username/password are unused.
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Open `config.database`. Unless `create` is set a missing database
    /// file is an error, the same way an unknown database name is on a server.
    pub fn open(config: &ConnectionConfig, create: bool) -> Result<Self, LoaderError> {
        config.validate()?;
        let conn = if config.database == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            if create {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
            Connection::open_with_flags(&config.database, flags)?
        };
        log_info!("Connected: {}", config);
        log_warn!(
            "SQLite has no accounts: host {} and user {} are not checked",
            config.host,
            config.username
        );
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, LoaderError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, LoaderError> {
        // Off by default in SQLite; the bakery schema relies on it.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(SqliteConnection { conn })
    }
}

impl SqlConnection for SqliteConnection {
    fn execute_ddl(&mut self, sql: &str) -> Result<(), LoaderError> {
        log_debug!("{}", sql);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[Field]) -> Result<usize, LoaderError> {
        log_debug!("{} {:?}", sql, params);
        let count = self.conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(count)
    }

    fn execute_many(&mut self, sql: &str, rows: &[Tuple]) -> Result<usize, LoaderError> {
        log_debug!("{} x {}", sql, rows.len());
        let mut stmt = self.conn.prepare(sql)?;
        let mut count = 0;
        for row in rows {
            count += stmt.execute(params_from_iter(row.fields().iter()))?;
        }
        Ok(count)
    }

    fn query(&mut self, sql: &str, schema: &Schema) -> Result<Vec<Tuple>, LoaderError> {
        log_debug!("{}", sql);
        let columns = schema.columns();
        let mut stmt = self.conn.prepare(sql)?;
        if stmt.column_count() != columns.len() {
            return Err(LoaderError::InvalidField(format!(
                "Query returns {} columns, schema has {}",
                stmt.column_count(),
                columns.len()
            )));
        }
        let mut rows = stmt.query([])?;
        let mut tuples = Vec::new();
        while let Some(row) = rows.next()? {
            let mut tuple = Tuple::with_capacity(columns.len());
            for (i, col_def) in columns.iter().enumerate() {
                tuple.push(Field::from_value_ref(col_def, row.get_ref(i)?)?);
            }
            tuples.push(tuple);
        }
        Ok(tuples)
    }

    fn close(self) -> Result<(), LoaderError> {
        self.conn.close().map_err(|(_, e)| LoaderError::Database(e))
    }
}
