/// Redshift column type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    BigInt,
    Float,
    Timestamp,
    /// Fixed-width character column
    Char(u16),
    /// Variable-width character column with a byte limit
    Varchar(u16),
    /// `VARCHAR(MAX)`, used for free-form text from the source files
    VarcharMax,
}

impl ColumnType {
    /// SQL spelling of the type
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Integer => "INT".to_string(),
            ColumnType::BigInt => "BIGINT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Char(n) => format!("CHAR({})", n),
            ColumnType::Varchar(n) => format!("VARCHAR({})", n),
            ColumnType::VarcharMax => "VARCHAR(MAX)".to_string(),
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    /// Warehouse-generated surrogate key, `IDENTITY(0,1)`
    pub identity: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            primary_key: false,
            identity: false,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            nullable: false,
            ..Self::new(name, col_type)
        }
    }

    /// Create a natural-key primary key column
    pub const fn key(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            nullable: false,
            primary_key: true,
            ..Self::new(name, col_type)
        }
    }

    /// Create an auto-incrementing surrogate primary key
    pub const fn surrogate_key(name: &'static str) -> Self {
        Self {
            identity: true,
            ..Self::key(name, ColumnType::Integer)
        }
    }
}

/// Where a table sits in the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// Landing table filled by a bulk load, mirrors the source files
    Staging,
    Fact,
    Dimension,
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub role: TableRole,
    pub columns: &'static [Column],
}
