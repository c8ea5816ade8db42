mod schema;

use std::sync::Arc;

pub use schema::{ColumnDef, DataType, ForeignKey, Schema, SchemaRef};

use crate::error::LoaderError;

pub mod prelude {
    pub use super::*;
}

#[derive(Debug)]
pub struct Table {
    name: String,
    schema: SchemaRef,
}

impl Table {
    pub fn new(name: &str, schema: SchemaRef) -> Self {
        Table {
            name: name.to_string(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn drop_sql(&self) -> String {
        format!("drop table if exists {};", self.name)
    }

    pub fn create_sql(&self) -> String {
        let mut clauses = self
            .schema
            .columns()
            .iter()
            .map(|c| c.to_sql())
            .collect::<Vec<_>>();
        let pk = self.schema.primary_key_indices();
        if !pk.is_empty() {
            let names = pk
                .iter()
                .map(|idx| self.schema.get_column(*idx).name())
                .collect::<Vec<_>>();
            clauses.push(format!("primary key ({})", names.join(", ")));
        }
        for fk in self.schema.foreign_keys() {
            clauses.push(fk.to_sql());
        }
        format!("create table {}( {} );", self.name, clauses.join(", "))
    }

    /// Insert with one positional `?` placeholder per column.
    pub fn insert_sql(&self) -> String {
        let columns = self.column_names();
        let placeholders = vec!["?"; columns.len()];
        format!(
            "insert into {}( {} ) values({})",
            self.name,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    pub fn select_all_sql(&self) -> String {
        format!("select {} from {}", self.column_names().join(", "), self.name)
    }

    fn column_names(&self) -> Vec<&str> {
        self.schema.columns().iter().map(|c| c.name()).collect()
    }
}

pub type TableRef = Arc<Table>;

/// Tables of one dataset, kept in creation order: a table is only accepted
/// after every table its foreign keys reference.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Vec<TableRef>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { tables: Vec::new() }
    }

    pub fn add_table(&mut self, table: TableRef) -> Result<(), LoaderError> {
        if self.is_valid_table(table.name()) {
            return Err(LoaderError::Catalog(format!(
                "Table {} already exists",
                table.name()
            )));
        }
        for fk in table.schema().foreign_keys() {
            if table.schema().column_index(fk.column()).is_none() {
                return Err(LoaderError::Catalog(format!(
                    "Foreign key column {} not found in {}",
                    fk.column(),
                    table.name()
                )));
            }
            if !self.is_valid_column(fk.table(), fk.referenced_column()) {
                return Err(LoaderError::Catalog(format!(
                    "Table {} references unknown column {}.{}",
                    table.name(),
                    fk.table(),
                    fk.referenced_column()
                )));
            }
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn get_table(&self, table_name: &str) -> Option<TableRef> {
        self.tables.iter().find(|t| t.name == table_name).cloned()
    }

    pub fn tables(&self) -> &Vec<TableRef> {
        &self.tables
    }

    /// Children before parents.
    pub fn drop_order(&self) -> impl Iterator<Item = &TableRef> {
        self.tables.iter().rev()
    }

    pub fn is_valid_table(&self, table_name: &str) -> bool {
        self.get_table(table_name).is_some()
    }

    pub fn is_valid_column(&self, table_name: &str, column_name: &str) -> bool {
        self.get_table(table_name)
            .map(|t| t.schema().column_index(column_name).is_some())
            .unwrap_or(false)
    }
}
