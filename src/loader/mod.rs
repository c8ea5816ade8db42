#[cfg(feature = "dataframe")]
mod frame_loader;
mod simple_csv_loader;

#[cfg(feature = "dataframe")]
pub use frame_loader::DataFrameLoader;
pub use simple_csv_loader::SimpleCsvLoader;

use crate::{
    catalog::{Schema, Table},
    connection::SqlConnection,
    error::LoaderError,
    log_info,
    tuple::Tuple,
};

pub mod prelude {
    #[cfg(feature = "dataframe")]
    pub use super::DataFrameLoader;
    pub use super::{DataLoader, SimpleCsvLoader};
}

pub trait DataLoader {
    /// Every source row converted to the schema's column types.
    fn tuples(&mut self, schema: &Schema) -> Result<Vec<Tuple>, LoaderError>;

    /// Insert the first row on its own through a scalar statement, then the
    /// rest through one batch statement. Returns the rows that were written
    /// so the caller can verify the table against them.
    fn load_data<C: SqlConnection>(
        &mut self,
        conn: &mut C,
        table: &Table,
    ) -> Result<Vec<Tuple>, LoaderError> {
        let tuples = self.tuples(&table.schema())?;
        println!("Loading data into table: {}", table.name());
        let insert = table.insert_sql();
        let mut count = 0;
        if let Some((first, rest)) = tuples.split_first() {
            count += conn.execute(&insert, first.fields())?;
            log_info!("Inserted first row of {}: {}", table.name(), first);
            count += conn.execute_many(&insert, rest)?;
        }
        println!("Inserted {} tuples in total", count);
        Ok(tuples)
    }
}
