//! Requests as seen by the routing layer. Only the parts needed to derive a routing key are
//! modelled here: the opcode, prepared statement metadata and bound value buffers.

mod table_name;
mod value;

pub use self::table_name::TableName;
pub use self::value::{Value, VALUE_LENGTH_PREFIX_LEN};

use bytes::Bytes;
use derive_more::{Constructor, Display};
use std::sync::Arc;

/// Request opcodes relevant to routing.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Display)]
pub enum Opcode {
    Query,
    Prepare,
    Execute,
    Batch,
}

impl Opcode {
    /// Checks if requests with this opcode carry bound primary key values.
    #[inline]
    pub fn carries_bound_values(self) -> bool {
        matches!(self, Opcode::Execute | Opcode::Batch)
    }
}

/// Metadata returned when a statement gets prepared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor)]
pub struct PreparedMetadata {
    /// Table targeted by the statement.
    pub table: TableName,
    /// Bind marker positions of primary key columns, in primary key order.
    pub pk_indexes: Vec<i16>,
}

/// Prepared statement with its values bound and serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundStatement {
    /// Prepared metadata. Can be missing if the statement was prepared without result metadata.
    pub metadata: Option<Arc<PreparedMetadata>>,
    /// Length-prefixed value buffers, in bind marker order.
    pub values: Vec<Bytes>,
}

impl BoundStatement {
    /// Binds given values by serializing them.
    pub fn new(metadata: Option<Arc<PreparedMetadata>>, values: Vec<Value>) -> Self {
        BoundStatement {
            metadata,
            values: values.iter().map(Value::serialize).collect(),
        }
    }

    /// Creates a statement from already serialized value buffers.
    pub fn with_serialized_values(
        metadata: Option<Arc<PreparedMetadata>>,
        values: Vec<Bytes>,
    ) -> Self {
        BoundStatement { metadata, values }
    }
}

/// Single statement inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    Query(String),
    Prepared(BoundStatement),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Constructor)]
pub struct BatchStatement {
    pub statements: Vec<BatchEntry>,
}

/// A request about to be sent to the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Query(String),
    Prepare(String),
    Execute(BoundStatement),
    Batch(BatchStatement),
}

impl Request {
    #[inline]
    pub fn opcode(&self) -> Opcode {
        match self {
            Request::Query(_) => Opcode::Query,
            Request::Prepare(_) => Opcode::Prepare,
            Request::Execute(_) => Opcode::Execute,
            Request::Batch(_) => Opcode::Batch,
        }
    }
}
