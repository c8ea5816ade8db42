use std::cmp::Ordering;

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

use crate::{
    catalog::{ColumnDef, DataType},
    datasets::reformat_date,
    error::LoaderError,
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tuple {
    fields: Vec<Field>,
}

impl Tuple {
    pub fn to_pretty_string(&self) -> String {
        // Each field has a fixed width of 20 characters.
        let width = 20;
        let mut res = String::new();
        for field in &self.fields {
            let field_str = format!("{}", field);
            let len = field_str.chars().count();
            if len > width {
                res.extend(field_str.chars().take(width - 3));
                res.push_str("...");
            } else {
                res.push_str(&field_str);
                res.extend(std::iter::repeat(' ').take(width - len));
            }
            res.push_str(" | ");
        }
        res
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tuple {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        Tuple { fields }
    }

    pub fn fields(&self) -> &Vec<Field> {
        &self.fields
    }

    pub fn get(&self, field_idx: usize) -> &Field {
        &self.fields[field_idx]
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|field| field.to_string())
            .collect::<Vec<_>>();
        write!(f, "({})", fields.join(", "))
    }
}

#[derive(Debug, Clone)]
pub enum Field {
    Int(Option<i64>),
    Decimal(Option<f64>), // Quantized to the column scale, never NaN.
    String(Option<String>),
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Field {}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Field::Int(val1), Field::Int(val2)) => val1.cmp(val2),
            (Field::Decimal(val1), Field::Decimal(val2)) => match (val1, val2) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            },
            (Field::String(val1), Field::String(val2)) => val1.cmp(val2),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Field {
    fn rank(&self) -> u8 {
        match self {
            Field::Int(_) => 0,
            Field::Decimal(_) => 1,
            Field::String(_) => 2,
        }
    }

    pub fn null(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int => Field::Int(None),
            DataType::Decimal { .. } => Field::Decimal(None),
            DataType::Varchar(_) | DataType::Char(_) | DataType::Date => Field::String(None),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Field::Int(val) => val.is_none(),
            Field::Decimal(val) => val.is_none(),
            Field::String(val) => val.is_none(),
        }
    }

    /// Parse one CSV cell into a field of the column's type.
    pub fn from_str(column_def: &ColumnDef, field: &str) -> Result<Self, LoaderError> {
        let data_type = column_def.data_type();
        let field = field.trim();
        if field.is_empty() || field == "NULL" || field == "null" {
            if column_def.is_nullable() {
                return Ok(Field::null(data_type));
            }
            return Err(LoaderError::InvalidField(format!(
                "Column {} is not nullable",
                column_def.name()
            )));
        }
        match data_type {
            DataType::Int => {
                let val = field
                    .parse::<i64>()
                    .map_err(|e| invalid(column_def, field, e))?;
                Ok(Field::Int(Some(val)))
            }
            DataType::Decimal { precision, scale } => {
                let val = field
                    .parse::<f64>()
                    .map_err(|e| invalid(column_def, field, e))?;
                Field::decimal(val, *precision, *scale)
                    .map_err(|e| invalid(column_def, field, e))
            }
            DataType::Varchar(len) | DataType::Char(len) => {
                if field.chars().count() > *len {
                    return Err(invalid(column_def, field, format!("longer than {}", len)));
                }
                Ok(Field::String(Some(field.to_string())))
            }
            DataType::Date => Ok(Field::String(Some(reformat_date(field)?))),
        }
    }

    /// Round to `scale` digits and reject values that do not fit `precision`.
    pub fn decimal(val: f64, precision: u32, scale: u32) -> Result<Self, String> {
        if !val.is_finite() {
            return Err("not a finite number".to_string());
        }
        let factor = 10f64.powi(scale as i32);
        let quantized = non_negative_zero((val * factor).round() / factor);
        let limit = 10f64.powi(precision.saturating_sub(scale) as i32);
        if quantized.abs() >= limit {
            return Err(format!("does not fit decimal({},{})", precision, scale));
        }
        Ok(Field::Decimal(Some(quantized)))
    }

    /// Rebuild a field from a fetched value. SQLite may hand back an integer
    /// for a decimal column when the value has no fractional part.
    pub fn from_value_ref(column_def: &ColumnDef, value: ValueRef<'_>) -> Result<Self, LoaderError> {
        match (column_def.data_type(), value) {
            (data_type, ValueRef::Null) => Ok(Field::null(data_type)),
            (DataType::Int, ValueRef::Integer(val)) => Ok(Field::Int(Some(val))),
            (DataType::Decimal { .. }, ValueRef::Integer(val)) => Ok(Field::Decimal(Some(val as f64))),
            (DataType::Decimal { .. }, ValueRef::Real(val)) => {
                Ok(Field::Decimal(Some(non_negative_zero(val))))
            }
            (DataType::Varchar(_) | DataType::Char(_) | DataType::Date, ValueRef::Text(bytes)) => {
                let val = std::str::from_utf8(bytes)
                    .map_err(|e| LoaderError::InvalidField(e.to_string()))?;
                Ok(Field::String(Some(val.to_string())))
            }
            (data_type, other) => Err(LoaderError::InvalidField(format!(
                "Column {} ({}) cannot hold a {:?} value",
                column_def.name(),
                data_type,
                other.data_type()
            ))),
        }
    }
}

/// SQLite stores `-0.0` in a numeric column as integer `0`.
fn non_negative_zero(val: f64) -> f64 {
    if val == 0.0 {
        0.0
    } else {
        val
    }
}

fn invalid(column_def: &ColumnDef, field: &str, reason: impl std::fmt::Display) -> LoaderError {
    LoaderError::InvalidField(format!(
        "Error: {} parsing field: {:?} (col: {})",
        reason,
        field,
        column_def.name()
    ))
}

impl ToSql for Field {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Field::Int(Some(val)) => ToSqlOutput::Owned(Value::Integer(*val)),
            Field::Decimal(Some(val)) => ToSqlOutput::Owned(Value::Real(*val)),
            Field::String(Some(val)) => ToSqlOutput::Borrowed(ValueRef::Text(val.as_bytes())),
            Field::Int(None) | Field::Decimal(None) | Field::String(None) => {
                ToSqlOutput::Owned(Value::Null)
            }
        })
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Int(Some(val)) => write!(f, "{}", val),
            Field::Decimal(Some(val)) => write!(f, "{}", val),
            Field::String(Some(val)) => write!(f, "{}", val),
            Field::Int(None) | Field::Decimal(None) | Field::String(None) => write!(f, "NULL"),
        }
    }
}

impl From<i64> for Field {
    fn from(val: i64) -> Self {
        Field::Int(Some(val))
    }
}

impl From<f64> for Field {
    fn from(val: f64) -> Self {
        Field::Decimal(Some(non_negative_zero(val)))
    }
}

impl From<String> for Field {
    fn from(val: String) -> Self {
        Field::String(Some(val))
    }
}

impl From<&str> for Field {
    fn from(val: &str) -> Self {
        Field::String(Some(val.to_string()))
    }
}
