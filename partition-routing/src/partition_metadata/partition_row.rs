use bytes::Bytes;
use derive_more::Display;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::request::TableName;
use crate::token::RoutingKey;

const PARTITION_KEY_LEN: usize = 2;

/// Role of a replica within a partition.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Display)]
pub enum ReplicaRole {
    Leader,
    Follower,
    ReadReplica,
}

impl FromStr for ReplicaRole {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.eq_ignore_ascii_case("LEADER") {
            Ok(ReplicaRole::Leader)
        } else if value.eq_ignore_ascii_case("FOLLOWER") {
            Ok(ReplicaRole::Follower)
        } else if value.eq_ignore_ascii_case("READ_REPLICA") {
            Ok(ReplicaRole::ReadReplica)
        } else {
            Err(Error::UnknownReplicaRole(value.into()))
        }
    }
}

/// A single row of partition ownership information, as returned by the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRow {
    pub keyspace_name: String,
    pub table_name: String,
    /// Inclusive start of the partition. Empty for the first partition of a table.
    pub start_key: Bytes,
    /// Exclusive end of the partition. Empty for the last partition of a table.
    pub end_key: Bytes,
    /// Replica addresses with their roles, in the order reported by the cluster.
    pub replica_addresses: Vec<(IpAddr, String)>,
}

impl PartitionRow {
    #[inline]
    pub fn table(&self) -> TableName {
        TableName::new(self.keyspace_name.clone(), self.table_name.clone())
    }

    /// Returns the routing key range covered by this partition.
    pub fn key_range(&self) -> Result<(RoutingKey, Option<RoutingKey>)> {
        let start = decode_partition_key(&self.start_key)?.unwrap_or_default();
        let end = decode_partition_key(&self.end_key)?;

        match end {
            Some(end) if end <= start => Err(format!(
                "Empty partition range [{}, {}) for {}.{}",
                start, end, self.keyspace_name, self.table_name
            )
            .into()),
            _ => Ok((start, end)),
        }
    }

    /// Returns replica addresses with parsed roles.
    pub fn replicas(&self) -> Result<Vec<(IpAddr, ReplicaRole)>> {
        self.replica_addresses
            .iter()
            .map(|(address, role)| role.parse::<ReplicaRole>().map(|role| (*address, role)))
            .collect()
    }
}

/// Decodes a partition boundary: either empty (open bound) or a big-endian routing key.
pub fn decode_partition_key(key: &[u8]) -> Result<Option<RoutingKey>> {
    match key.len() {
        0 => Ok(None),
        PARTITION_KEY_LEN => Ok(Some(RoutingKey::new(u16::from_be_bytes([key[0], key[1]])))),
        length => Err(Error::InvalidPartitionKey { length }),
    }
}
