#[cfg(feature = "dataframe")]
pub mod frame;

use std::cmp::Ordering;

use crate::{
    catalog::Table,
    connection::SqlConnection,
    error::LoaderError,
    log_info,
    tuple::{Field, Tuple},
};

/// Outcome of reading a table back and comparing it with the rows that were
/// written to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub table: String,
    pub expected: usize,
    pub fetched: usize,
    /// Source rows with no matching fetched row.
    pub missing: Vec<Tuple>,
    /// Fetched rows with no matching source row.
    pub unexpected: Vec<Tuple>,
}

impl Verification {
    pub fn is_exact(&self) -> bool {
        self.expected == self.fetched && self.missing.is_empty() && self.unexpected.is_empty()
    }

    pub fn ensure_exact(&self) -> Result<(), LoaderError> {
        if self.is_exact() {
            return Ok(());
        }
        Err(LoaderError::Verification(format!(
            "{}: expected {} rows, fetched {} ({} missing, {} unexpected)",
            self.table,
            self.expected,
            self.fetched,
            self.missing.len(),
            self.unexpected.len()
        )))
    }
}

/// Select every row of `table` and compare the result with `source` as a
/// multiset: order does not matter, duplicates do.
pub fn verify_table<C: SqlConnection>(
    conn: &mut C,
    table: &Table,
    source: &[Tuple],
) -> Result<Verification, LoaderError> {
    let fetched = conn.query(&table.select_all_sql(), &table.schema())?;
    let verification = compare(table.name(), source, fetched);
    log_info!(
        "Verified {}: {} expected, {} fetched",
        verification.table,
        verification.expected,
        verification.fetched
    );
    Ok(verification)
}

pub fn compare(table: &str, source: &[Tuple], fetched: Vec<Tuple>) -> Verification {
    let expected = source.len();
    let fetched_len = fetched.len();
    let mut source = source.to_vec();
    let mut fetched = fetched;
    source.sort();
    fetched.sort();

    let mut missing = Vec::new();
    let mut unexpected = Vec::new();
    let mut src_iter = source.into_iter().peekable();
    let mut out_iter = fetched.into_iter().peekable();
    loop {
        let step = match (src_iter.peek(), out_iter.peek()) {
            (Some(s), Some(o)) => s.cmp(o),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match step {
            Ordering::Equal => {
                src_iter.next();
                out_iter.next();
            }
            Ordering::Less => missing.extend(src_iter.next()),
            Ordering::Greater => unexpected.extend(out_iter.next()),
        }
    }
    Verification {
        table: table.to_string(),
        expected,
        fetched: fetched_len,
        missing,
        unexpected,
    }
}

/// Compare a single fetched field with the value it was loaded from.
pub fn spot_check(fetched: &[Tuple], row: usize, col: usize, expected: &Field) -> bool {
    fetched
        .get(row)
        .filter(|t| col < t.len())
        .map(|t| t.get(col) == expected)
        .unwrap_or(false)
}
