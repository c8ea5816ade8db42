use std::path::Path;

use polars::prelude::*;
use polars::prelude::DataType as PlDataType;

use super::DataLoader;

use crate::{
    catalog::{ColumnDef, DataType, Schema},
    error::LoaderError,
    tuple::{Field, Tuple},
};

/// Reads the whole CSV into a `DataFrame` first and builds rows from its
/// columns, matched to the schema by position since the CSV headers do not
/// have to match the table's column names.
pub struct DataFrameLoader {
    df: DataFrame,
}

impl DataFrameLoader {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        Ok(Self::new(read_csv_frame(path)?))
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }
}

pub fn read_csv_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path.as_ref())
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()?;
    Ok(df)
}

impl DataLoader for DataFrameLoader {
    fn tuples(&mut self, schema: &Schema) -> Result<Vec<Tuple>, LoaderError> {
        let columns = schema.columns();
        if self.df.width() != columns.len() {
            return Err(LoaderError::InvalidField(format!(
                "Dataframe has {} columns, schema has {}",
                self.df.width(),
                columns.len()
            )));
        }
        let cells = columns
            .iter()
            .zip(self.df.get_columns())
            .map(|(col_def, column)| column_fields(col_def, column.as_materialized_series()))
            .collect::<Result<Vec<_>, _>>()?;

        let tuples = (0..self.df.height())
            .map(|row| Tuple::from_fields(cells.iter().map(|col| col[row].clone()).collect()))
            .collect();
        Ok(tuples)
    }
}

/// Convert one dataframe column into fields of the column's type.
fn column_fields(col_def: &ColumnDef, series: &Series) -> Result<Vec<Field>, LoaderError> {
    let fields = match col_def.data_type() {
        DataType::Int => {
            ensure_integral(col_def, series)?;
            cast_checked(col_def, series, &PlDataType::Int64)?
                .i64()?
                .into_iter()
                .map(|val| match val {
                    Some(val) => Ok(Field::Int(Some(val))),
                    None => Field::from_str(col_def, ""),
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        DataType::Decimal { precision, scale } => cast_checked(col_def, series, &PlDataType::Float64)?
            .f64()?
            .into_iter()
            .map(|val| match val {
                Some(val) => Field::decimal(val, *precision, *scale).map_err(|e| {
                    LoaderError::InvalidField(format!("{} (col: {})", e, col_def.name()))
                }),
                None => Field::from_str(col_def, ""),
            })
            .collect::<Result<Vec<_>, _>>()?,
        DataType::Varchar(_) | DataType::Char(_) | DataType::Date => series
            .cast(&PlDataType::String)?
            .str()?
            .into_iter()
            .map(|val| Field::from_str(col_def, val.unwrap_or("")))
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(fields)
}

/// Cast `series`, failing on the first non-null cell the cast turned into null.
fn cast_checked(
    col_def: &ColumnDef,
    series: &Series,
    to: &PlDataType,
) -> Result<Series, LoaderError> {
    let cast = series.cast(to)?;
    if cast.null_count() == series.null_count() {
        return Ok(cast);
    }
    let raw = series.cast(&PlDataType::String)?;
    let bad = raw
        .str()?
        .into_iter()
        .zip(cast.is_null().into_iter())
        .find_map(|(raw, is_null)| match (raw, is_null) {
            (Some(raw), Some(true)) => Some(raw.to_string()),
            _ => None,
        })
        .unwrap_or_default();
    Err(LoaderError::InvalidField(format!(
        "Error: not a valid {} parsing field: {:?} (col: {})",
        col_def.data_type(),
        bad,
        col_def.name()
    )))
}

/// Reject floating point cells with a fractional part in an integer column.
fn ensure_integral(col_def: &ColumnDef, series: &Series) -> Result<(), LoaderError> {
    if !series.dtype().is_float() {
        return Ok(());
    }
    let floats = series.cast(&PlDataType::Float64)?;
    let fractional = floats.f64()?.into_iter().flatten().find(|val| val.fract() != 0.0);
    match fractional {
        Some(val) => Err(LoaderError::InvalidField(format!(
            "Error: not an integer parsing field: \"{}\" (col: {})",
            val,
            col_def.name()
        ))),
        None => Ok(()),
    }
}
