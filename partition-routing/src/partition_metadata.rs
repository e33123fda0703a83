//! Partition ownership metadata: which replicas own which routing key ranges of which tables.

mod cache;
mod partition_row;
mod snapshot;

pub use self::cache::{PartitionMetadataCache, PartitionMetadataSource};
pub use self::partition_row::{decode_partition_key, PartitionRow, ReplicaRole};
pub use self::snapshot::{PartitionMetadata, PartitionRange, ReplicaSet, TablePartitions};

#[cfg(test)]
pub(crate) use self::cache::MockPartitionMetadataSource;
