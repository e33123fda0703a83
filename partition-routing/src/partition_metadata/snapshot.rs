use fxhash::FxHashMap;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::*;

use crate::error::Result;
use crate::partition_metadata::{PartitionRow, ReplicaRole};
use crate::request::TableName;
use crate::token::RoutingKey;

/// Replicas of a single partition. The leader never appears among the followers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplicaSet {
    pub leader: Option<IpAddr>,
    pub followers: Vec<IpAddr>,
}

impl ReplicaSet {
    /// Builds a replica set from replicas in cluster-reported order. The first leader wins; all
    /// other replicas become followers, in order and without duplicates.
    pub fn from_replicas(replicas: impl IntoIterator<Item = (IpAddr, ReplicaRole)>) -> Self {
        let mut leader = None;
        let mut followers = Vec::new();

        for (address, role) in replicas {
            if role == ReplicaRole::Leader && leader.is_none() {
                leader = Some(address);
            } else {
                followers.push(address);
            }
        }

        let followers = followers
            .into_iter()
            .filter(|address| Some(*address) != leader)
            .unique()
            .collect();

        ReplicaSet { leader, followers }
    }

    #[inline]
    pub fn contains(&self, address: IpAddr) -> bool {
        self.leader == Some(address) || self.followers.contains(&address)
    }
}

/// A partition covering routing keys from its start key (map key) up to `end`, exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRange {
    /// End of the range or `None` if it spans to the end of key space.
    pub end: Option<RoutingKey>,
    pub replicas: ReplicaSet,
}

impl PartitionRange {
    #[inline]
    fn contains(&self, key: RoutingKey) -> bool {
        self.end.map_or(true, |end| key < end)
    }
}

/// Partitions of a single table, ordered by their start keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePartitions {
    ranges: BTreeMap<RoutingKey, PartitionRange>,
}

impl TablePartitions {
    /// Finds replicas of the partition owning given key.
    pub fn replicas(&self, key: RoutingKey) -> Option<&ReplicaSet> {
        self.ranges
            .range(..=key)
            .next_back()
            .filter(|(_, range)| range.contains(key))
            .map(|(_, range)| &range.replicas)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Immutable snapshot of partition ownership of all known tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionMetadata {
    tables: FxHashMap<TableName, TablePartitions>,
}

impl PartitionMetadata {
    /// Builds a snapshot from control channel rows. Malformed rows are skipped.
    pub fn from_rows(rows: &[PartitionRow]) -> Self {
        let mut tables: FxHashMap<TableName, TablePartitions> = Default::default();

        for row in rows {
            match Self::parse_row(row) {
                Ok((start, range)) => {
                    tables
                        .entry(row.table())
                        .or_default()
                        .ranges
                        .insert(start, range);
                }
                Err(error) => {
                    warn!(
                        %error,
                        keyspace = %row.keyspace_name,
                        table = %row.table_name,
                        "Skipping malformed partition row."
                    );
                }
            }
        }

        PartitionMetadata { tables }
    }

    fn parse_row(row: &PartitionRow) -> Result<(RoutingKey, PartitionRange)> {
        let (start, end) = row.key_range()?;
        let replicas = ReplicaSet::from_replicas(row.replicas()?);

        Ok((start, PartitionRange { end, replicas }))
    }

    /// Finds replicas of the partition of given table, which owns given key.
    #[inline]
    pub fn replicas(&self, table: &TableName, key: RoutingKey) -> Option<&ReplicaSet> {
        self.tables
            .get(table)
            .and_then(|partitions| partitions.replicas(key))
    }

    /// Returns partitions of given table, if known.
    #[inline]
    pub fn table(&self, table: &TableName) -> Option<&TablePartitions> {
        self.tables.get(table)
    }

    /// Returns the number of tables with known partitions.
    #[inline]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
