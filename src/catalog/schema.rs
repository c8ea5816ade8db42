use std::sync::Arc;

pub type SchemaRef = Arc<Schema>;

#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    primary_key: Vec<usize>,
    foreign_keys: Vec<ForeignKey>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>, primary_key: Vec<usize>) -> Self {
        Schema {
            columns,
            primary_key,
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn columns(&self) -> &Vec<ColumnDef> {
        &self.columns
    }

    pub fn get_column(&self, idx: usize) -> &ColumnDef {
        &self.columns[idx]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn primary_key_indices(&self) -> &Vec<usize> {
        &self.primary_key
    }

    pub fn foreign_keys(&self) -> &Vec<ForeignKey> {
        &self.foreign_keys
    }
}

impl std::fmt::Display for Schema {
    /// `(CId Int!, LastName Varchar(30)) pk(CId)`, `!` marking not null.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let marker = if c.is_nullable() { "" } else { "!" };
                format!("{} {}{}", c.name(), c.data_type(), marker)
            })
            .collect::<Vec<_>>();
        write!(f, "({})", columns.join(", "))?;
        if !self.primary_key.is_empty() {
            let pk = self
                .primary_key
                .iter()
                .map(|idx| self.columns[*idx].name())
                .collect::<Vec<_>>();
            write!(f, " pk({})", pk.join(", "))?;
        }
        for fk in &self.foreign_keys {
            write!(f, " fk({} -> {}.{})", fk.column, fk.table, fk.referenced_column)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    data_type: DataType,
    is_nullable: bool,
}

impl ColumnDef {
    /// Create a new column definition.
    /// name: Name of the column.
    /// data_type: Data type of the column.
    /// is_nullable: Whether the column is nullable.
    pub fn new(name: &str, data_type: DataType, is_nullable: bool) -> Self {
        ColumnDef {
            name: name.to_string(),
            data_type,
            is_nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Column clause of a `create table` statement, e.g. `SepalLength decimal(5,2)`.
    pub fn to_sql(&self) -> String {
        if self.is_nullable {
            format!("{} {}", self.name, self.data_type.to_sql())
        } else {
            format!("{} {} not null", self.name, self.data_type.to_sql())
        }
    }
}

/// `foreign key (column) references table(referenced_column)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    column: String,
    table: String,
    referenced_column: String,
}

impl ForeignKey {
    pub fn new(column: &str, table: &str, referenced_column: &str) -> Self {
        ForeignKey {
            column: column.to_string(),
            table: table.to_string(),
            referenced_column: referenced_column.to_string(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn referenced_column(&self) -> &str {
        &self.referenced_column
    }

    pub fn to_sql(&self) -> String {
        format!(
            "foreign key ({}) references {}({})",
            self.column, self.table, self.referenced_column
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Decimal { precision: u32, scale: u32 },
    Varchar(usize),
    Char(usize),
    /// `DD-Mon-YYYY` in the source, stored as `char(8)` holding `YYYYMMDD`.
    Date,
}

impl DataType {
    pub fn to_sql(&self) -> String {
        match self {
            DataType::Int => "integer".to_string(),
            DataType::Decimal { precision, scale } => format!("decimal({},{})", precision, scale),
            DataType::Varchar(len) => format!("varchar({})", len),
            DataType::Char(len) => format!("char({})", len),
            DataType::Date => "char(8)".to_string(),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataType::Int => write!(f, "Int"),
            DataType::Decimal { precision, scale } => write!(f, "Decimal({}, {})", precision, scale),
            DataType::Varchar(len) => write!(f, "Varchar({})", len),
            DataType::Char(len) => write!(f, "Char({})", len),
            DataType::Date => write!(f, "Date"),
        }
    }
}
