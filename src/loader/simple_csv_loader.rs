use std::path::Path;

use super::DataLoader;

use crate::{
    catalog::Schema,
    error::LoaderError,
    tuple::{Field, Tuple},
};

pub struct SimpleCsvLoader<R: std::io::Read> {
    rdr: csv::Reader<R>,
}

impl<R: std::io::Read> SimpleCsvLoader<R> {
    pub fn new(rdr: csv::Reader<R>) -> Self {
        Self { rdr }
    }
}

impl SimpleCsvLoader<std::fs::File> {
    /// Comma separated, header line skipped, whitespace around cells trimmed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let rdr = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;
        Ok(Self::new(rdr))
    }
}

impl<R: std::io::Read> DataLoader for SimpleCsvLoader<R> {
    fn tuples(&mut self, schema: &Schema) -> Result<Vec<Tuple>, LoaderError> {
        let columns = schema.columns();
        let mut tuples = Vec::new();
        for result in self.rdr.records() {
            let rec = result?;
            if rec.len() != columns.len() {
                return Err(LoaderError::InvalidField(format!(
                    "Expected {} fields, found {} at line {}",
                    columns.len(),
                    rec.len(),
                    rec.position().map(|p| p.line()).unwrap_or(0)
                )));
            }
            let mut tuple = Tuple::with_capacity(columns.len());
            for (col_def, field) in columns.iter().zip(rec.iter()) {
                tuple.push(Field::from_str(col_def, field)?);
            }
            tuples.push(tuple);
        }
        Ok(tuples)
    }
}
