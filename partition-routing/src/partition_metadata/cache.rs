use arc_swap::ArcSwapOption;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::*;

#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};
use crate::partition_metadata::{PartitionMetadata, PartitionRow};

/// Control channel capable of fetching current partition ownership from the cluster.
#[cfg_attr(test, automock)]
pub trait PartitionMetadataSource {
    /// Fetches ownership rows of all partitions of all tables.
    fn fetch_partitions(&self) -> BoxFuture<'static, Result<Vec<PartitionRow>>>;
}

/// Holds the most recent partition metadata snapshot. Refreshing builds a new snapshot and swaps
/// it in atomically, so lookups never block and never see a partially built table.
#[derive(Debug, Default)]
pub struct PartitionMetadataCache {
    metadata: ArcSwapOption<PartitionMetadata>,
}

impl PartitionMetadataCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns current snapshot or `None`, if no refresh has completed yet.
    #[inline]
    pub fn snapshot(&self) -> Option<Arc<PartitionMetadata>> {
        self.metadata.load_full()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.metadata.load().is_some()
    }

    /// Replaces current snapshot.
    #[inline]
    pub fn store(&self, metadata: PartitionMetadata) {
        self.metadata.store(Some(Arc::new(metadata)));
    }

    /// Fetches partition ownership and replaces current snapshot. On error, the previous snapshot
    /// stays in effect.
    pub async fn refresh(
        &self,
        source: &(dyn PartitionMetadataSource + Send + Sync),
        refresh_timeout: Duration,
    ) -> Result<()> {
        let rows = timeout(refresh_timeout, source.fetch_partitions())
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "Partition metadata not fetched within {:?}.",
                    refresh_timeout
                ))
            })??;

        let metadata = PartitionMetadata::from_rows(&rows);
        debug!(
            rows = rows.len(),
            tables = metadata.table_count(),
            "Refreshed partition metadata."
        );

        self.store(metadata);
        Ok(())
    }
}

//noinspection DuplicatedCode
#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::FutureExt;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::*;
    use crate::request::TableName;
    use crate::token::RoutingKey;

    fn rows(leader: u8) -> Vec<PartitionRow> {
        vec![PartitionRow {
            keyspace_name: "ks".into(),
            table_name: "users".into(),
            start_key: Bytes::new(),
            end_key: Bytes::new(),
            replica_addresses: vec![(
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, leader)),
                "LEADER".into(),
            )],
        }]
    }

    fn leader(cache: &PartitionMetadataCache) -> Option<IpAddr> {
        cache.snapshot().and_then(|metadata| {
            metadata
                .replicas(&TableName::from(("ks", "users")), RoutingKey::new(7))
                .and_then(|replicas| replicas.leader)
        })
    }

    #[tokio::test]
    async fn should_store_refreshed_snapshot() {
        let mut source = MockPartitionMetadataSource::new();
        source
            .expect_fetch_partitions()
            .times(1)
            .returning(|| async { Ok(rows(1)) }.boxed());

        let cache = PartitionMetadataCache::new();
        assert!(!cache.is_initialized());

        cache.refresh(&source, Duration::from_secs(1)).await.unwrap();

        assert!(cache.is_initialized());
        assert_eq!(leader(&cache), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    }

    #[tokio::test]
    async fn should_keep_previous_snapshot_on_error() {
        let mut source = MockPartitionMetadataSource::new();
        source
            .expect_fetch_partitions()
            .times(1)
            .returning(|| async { Err(Error::General("control channel closed".into())) }.boxed());

        let cache = PartitionMetadataCache::new();
        cache.store(PartitionMetadata::from_rows(&rows(2)));
        let before = cache.snapshot().unwrap();

        assert!(cache.refresh(&source, Duration::from_secs(1)).await.is_err());
        assert!(Arc::ptr_eq(&before, &cache.snapshot().unwrap()));
    }

    #[tokio::test]
    async fn should_time_out_slow_refresh() {
        let mut source = MockPartitionMetadataSource::new();
        source.expect_fetch_partitions().times(1).returning(|| {
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(rows(3))
            }
            .boxed()
        });

        let cache = PartitionMetadataCache::new();
        let result = cache.refresh(&source, Duration::from_millis(20)).await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        assert!(!cache.is_initialized());
    }

    #[test]
    fn should_keep_old_snapshot_for_readers() {
        let cache = PartitionMetadataCache::new();
        cache.store(PartitionMetadata::from_rows(&rows(1)));

        let reader_snapshot = cache.snapshot().unwrap();
        cache.store(PartitionMetadata::from_rows(&rows(2)));

        assert_eq!(
            reader_snapshot
                .replicas(&TableName::from(("ks", "users")), RoutingKey::new(7))
                .and_then(|replicas| replicas.leader),
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_eq!(leader(&cache), Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
    }
}
