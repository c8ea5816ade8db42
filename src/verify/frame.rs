use polars::prelude::*;
use polars::prelude::DataType as PlDataType;

use crate::{
    catalog::{DataType, Schema, Table},
    connection::SqlConnection,
    error::LoaderError,
    tuple::{Field, Tuple},
};

/// `select *` into a `DataFrame` whose columns carry the table's names.
pub fn read_table_frame<C: SqlConnection>(
    conn: &mut C,
    table: &Table,
) -> Result<DataFrame, LoaderError> {
    let tuples = conn.query(&table.select_all_sql(), &table.schema())?;
    tuples_to_frame(&table.schema(), &tuples)
}

pub fn tuples_to_frame(schema: &Schema, tuples: &[Tuple]) -> Result<DataFrame, LoaderError> {
    let columns = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(i, col_def)| {
            let name = col_def.name().into();
            let series = match col_def.data_type() {
                DataType::Int => Series::new(
                    name,
                    tuples
                        .iter()
                        .map(|t| match t.get(i) {
                            Field::Int(val) => *val,
                            _ => None,
                        })
                        .collect::<Vec<Option<i64>>>(),
                ),
                DataType::Decimal { .. } => Series::new(
                    name,
                    tuples
                        .iter()
                        .map(|t| match t.get(i) {
                            Field::Decimal(val) => *val,
                            _ => None,
                        })
                        .collect::<Vec<Option<f64>>>(),
                ),
                DataType::Varchar(_) | DataType::Char(_) | DataType::Date => Series::new(
                    name,
                    tuples
                        .iter()
                        .map(|t| match t.get(i) {
                            Field::String(val) => val.clone(),
                            _ => None,
                        })
                        .collect::<Vec<Option<String>>>(),
                ),
            };
            series.into()
        })
        .collect::<Vec<Column>>();
    Ok(DataFrame::new(columns)?)
}

/// Fraction of positions where the two columns hold the same value, relative
/// to the length of `expected`. Values are compared through their string
/// form so an integer column can be checked against an integer column read
/// back from another source. Two empty columns match fully.
pub fn column_match_ratio(expected: &Column, actual: &Column) -> Result<f64, LoaderError> {
    let expected = string_values(expected)?;
    let actual = string_values(actual)?;
    if expected.is_empty() {
        return Ok(if actual.is_empty() { 1.0 } else { 0.0 });
    }
    let matches = expected
        .iter()
        .zip(actual.iter())
        .filter(|(e, a)| e == a)
        .count();
    Ok(matches as f64 / expected.len() as f64)
}

fn string_values(column: &Column) -> Result<Vec<Option<String>>, LoaderError> {
    let values = column
        .as_materialized_series()
        .cast(&PlDataType::String)?
        .str()?
        .into_iter()
        .map(|val| val.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Sort `df` by the columns at positions `key`, leaving it as is when the
/// key is empty. Positions are used since source headers need not match the
/// table's column names.
pub fn sort_by_key(df: &DataFrame, key: &[usize]) -> Result<DataFrame, LoaderError> {
    if key.is_empty() {
        return Ok(df.clone());
    }
    let columns = df.get_columns();
    let names = key
        .iter()
        .map(|idx| {
            columns.get(*idx).map(|c| c.name().clone()).ok_or_else(|| {
                LoaderError::Verification(format!("key column {} missing from dataframe", idx))
            })
        })
        .collect::<Result<Vec<PlSmallStr>, _>>()?;
    let sorted = df.sort(names, SortMultipleOptions::default().with_maintain_order(true))?;
    Ok(sorted)
}

/// Check column `col` of the frame read from the database against the same
/// column of the source frame, element by element.
pub fn ensure_column_matches(
    table: &str,
    source: &DataFrame,
    fetched: &DataFrame,
    col: usize,
) -> Result<f64, LoaderError> {
    let (Some(expected), Some(actual)) =
        (source.get_columns().get(col), fetched.get_columns().get(col))
    else {
        return Err(LoaderError::Verification(format!(
            "{}: column {} missing from dataframe",
            table, col
        )));
    };
    let ratio = column_match_ratio(expected, actual)?;
    println!(
        "{}: {} == {} for {:.0}% of {} rows",
        table,
        expected.name(),
        actual.name(),
        ratio * 100.0,
        source.height()
    );
    if ratio != 1.0 {
        return Err(LoaderError::Verification(format!(
            "{}: only {:.4} of column {} matches",
            table,
            ratio,
            expected.name()
        )));
    }
    Ok(ratio)
}
