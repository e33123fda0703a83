//! Derivation of routing keys from bound requests.
//!
//! The routing key of a row is the [`hash64`](crate::hash::hash64) of its serialized primary key
//! columns (concatenated in primary key order, without their length prefixes), folded into 16
//! bits. Only prepared statements carry enough information to compute it; for batches, the first
//! statement which yields a key determines the routing of the whole batch.

use bytes::Bytes;
use tracing::*;

use crate::request::{BatchEntry, BoundStatement, Request, TableName, VALUE_LENGTH_PREFIX_LEN};
use crate::token::{RoutingKey, Token};

/// Returns the routing key and target table of a request, if they can be determined.
pub fn routing_key(request: &Request) -> Option<(RoutingKey, TableName)> {
    routing_key_bytes(request)
        .map(|(key_bytes, table)| (RoutingKey::from_key_bytes(&key_bytes), table))
}

/// Returns the routing key in token form, along with the target table of a request.
pub fn token(request: &Request) -> Option<(Token, TableName)> {
    routing_key(request).map(|(key, table)| (key.to_token(), table))
}

/// Returns concatenated primary key bytes and the target table of a request, if they can be
/// determined.
pub fn routing_key_bytes(request: &Request) -> Option<(Bytes, TableName)> {
    if !request.opcode().carries_bound_values() {
        trace!(opcode = %request.opcode(), "Request does not carry bound values.");
        return None;
    }

    match request {
        Request::Execute(statement) => statement_key_bytes(statement),
        Request::Batch(batch) => batch.statements.iter().find_map(|entry| match entry {
            BatchEntry::Prepared(statement) => statement_key_bytes(statement),
            BatchEntry::Query(_) => None,
        }),
        _ => None,
    }
}

fn statement_key_bytes(statement: &BoundStatement) -> Option<(Bytes, TableName)> {
    let metadata = match &statement.metadata {
        Some(metadata) => metadata,
        None => {
            trace!("Statement has no prepared metadata.");
            return None;
        }
    };

    if metadata.pk_indexes.is_empty() {
        return None;
    }

    let mut values = Vec::with_capacity(metadata.pk_indexes.len());
    for index in &metadata.pk_indexes {
        let value = usize::try_from(*index)
            .ok()
            .and_then(|index| statement.values.get(index));

        match value {
            // null and unset values carry no bytes past the prefix, so they hash as empty keys
            Some(value) if value.len() >= VALUE_LENGTH_PREFIX_LEN => {
                values.push(value.slice(VALUE_LENGTH_PREFIX_LEN..))
            }
            _ => {
                trace!(index, table = %metadata.table, "Missing or malformed primary key value.");
                return None;
            }
        }
    }

    let key_bytes = if values.len() == 1 {
        values.swap_remove(0)
    } else {
        Bytes::from(values.concat())
    };

    Some((key_bytes, metadata.table.clone()))
}
