use std::{path::Path, sync::Arc};

use serde::Deserialize;

use crate::{
    catalog::{Catalog, ColumnDef, DataType, Schema, Table},
    error::LoaderError,
};

pub const IRIS_CSV: &str = "iris.csv";

const MEASUREMENT: DataType = DataType::Decimal {
    precision: 5,
    scale: 2,
};

/// One line of the raw iris CSV, read independently of the catalog so the
/// spot-check compares against what is actually in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrisRecord {
    #[serde(rename = "Sepal.Length")]
    pub sepal_length: f64,
    #[serde(rename = "Sepal.Width")]
    pub sepal_width: f64,
    #[serde(rename = "Petal.Length")]
    pub petal_length: f64,
    #[serde(rename = "Petal.Width")]
    pub petal_width: f64,
    #[serde(rename = "Species")]
    pub species: String,
}

pub fn catalog() -> Result<Catalog, LoaderError> {
    let schema = Schema::new(
        vec![
            ColumnDef::new("SepalLength", MEASUREMENT, true),
            ColumnDef::new("SepalWidth", MEASUREMENT, true),
            ColumnDef::new("PetalLength", MEASUREMENT, true),
            ColumnDef::new("PetalWidth", MEASUREMENT, true),
            ColumnDef::new("Species", DataType::Varchar(50), true),
        ],
        vec![],
    );
    let mut catalog = Catalog::new();
    catalog.add_table(Arc::new(Table::new("iris", Arc::new(schema))))?;
    Ok(catalog)
}

pub fn read_iris_records<P: AsRef<Path>>(path: P) -> Result<Vec<IrisRecord>, LoaderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let records = rdr.deserialize().collect::<Result<Vec<IrisRecord>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_iris_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Sepal.Length,Sepal.Width,Petal.Length,Petal.Width,Species\n\
             5.1,3.5,1.4,0.2,setosa\n\
             7,3.2,4.7,1.4,versicolor\n"
        )
        .unwrap();
        let records = read_iris_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            IrisRecord {
                sepal_length: 5.1,
                sepal_width: 3.5,
                petal_length: 1.4,
                petal_width: 0.2,
                species: "setosa".to_string(),
            }
        );
        assert_eq!(records[1].sepal_length, 7.0);
    }

    #[test]
    fn test_catalog() {
        let catalog = catalog().unwrap();
        let iris = catalog.get_table("iris").unwrap();
        assert_eq!(
            iris.create_sql(),
            "create table iris( SepalLength decimal(5,2), SepalWidth decimal(5,2), \
             PetalLength decimal(5,2), PetalWidth decimal(5,2), Species varchar(50) );"
        );
    }
}
