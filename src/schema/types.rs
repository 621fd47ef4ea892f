use std::collections::HashSet;

/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// Stored as INTEGER 0/1; mapped rows default missing flags to false
    Boolean,
    /// Coordinate pair stored as a `(x,y)` text literal
    Point,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Point => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }

    /// Boolean flag; always written, false when absent from the source
    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Boolean,
            nullable: false,
        }
    }
}

/// Foreign key reference, possibly spanning several columns
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub columns: &'static [&'static str],
    pub references_table: &'static str,
    pub references_columns: &'static [&'static str],
}

impl ForeignKey {
    /// Single-column reference to a column of the same name in the parent
    pub const fn new(column: &'static [&'static str], references_table: &'static str) -> Self {
        Self {
            columns: column,
            references_table,
            references_columns: column,
        }
    }

    pub const fn to(
        columns: &'static [&'static str],
        references_table: &'static str,
        references_columns: &'static [&'static str],
    ) -> Self {
        Self {
            columns,
            references_table,
            references_columns,
        }
    }
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub columns: &'static [&'static str],
}

impl Index {
    pub const fn on(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    /// Source document pattern, relative to the data directory
    pub source_file: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
    /// Explicit index definitions
    pub indexes: &'static [Index],
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .collect()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
