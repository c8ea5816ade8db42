pub mod bakery;
pub mod iris;

use std::path::{Path, PathBuf};

pub use bakery::reformat_date;
pub use iris::{read_iris_records, IrisRecord};

use crate::{catalog::Catalog, error::LoaderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Iris,
    Bakery,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Iris => "iris",
            Dataset::Bakery => "bakery",
        }
    }

    pub fn catalog(&self) -> Result<Catalog, LoaderError> {
        match self {
            Dataset::Iris => iris::catalog(),
            Dataset::Bakery => bakery::catalog(),
        }
    }

    /// Location of the CSV feeding `table_name`, relative to `data_dir`.
    pub fn csv_path(&self, data_dir: &Path, table_name: &str) -> Result<PathBuf, LoaderError> {
        let file = match self {
            Dataset::Iris if table_name == "iris" => Some(iris::IRIS_CSV),
            Dataset::Iris => None,
            Dataset::Bakery => bakery::csv_file(table_name),
        };
        file.map(|f| data_dir.join(f)).ok_or_else(|| {
            LoaderError::Catalog(format!(
                "No CSV source for table {} in dataset {}",
                table_name,
                self.name()
            ))
        })
    }
}
