use derive_more::{Constructor, Display};

/// Fully qualified table identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Constructor)]
#[display("{keyspace}.{table}")]
pub struct TableName {
    pub keyspace: String,
    pub table: String,
}

impl From<(&str, &str)> for TableName {
    fn from((keyspace, table): (&str, &str)) -> Self {
        TableName::new(keyspace.into(), table.into())
    }
}
