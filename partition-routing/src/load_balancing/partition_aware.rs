use derivative::Derivative;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::*;

use crate::config::PartitionAwareConfig;
use crate::error::Result;
use crate::host::{Host, HostDistance, HostRegistry};
use crate::load_balancing::{LoadBalancingPolicy, PartitionAwareQueryPlan, QueryPlan};
use crate::partition_metadata::{PartitionMetadataCache, PartitionMetadataSource};
use crate::periodic_task::PeriodicTask;
use crate::request::{Request, TableName};
use crate::routing_key::routing_key;
use crate::token::RoutingKey;

/// Load balancing policy which sends requests to replicas owning the partition of the target row,
/// preferring the partition leader. Requests whose partition can't be determined are routed by the
/// wrapped child policy, which also supplies the tail of every plan.
///
/// The policy stays inert (behaves exactly like the child) until partition metadata is fetched for
/// the first time. Metadata is kept up to date by a periodic task started with
/// [`activate`](PartitionAwarePolicy::activate).
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PartitionAwarePolicy {
    #[derivative(Debug = "ignore")]
    child: Box<dyn LoadBalancingPolicy + Send + Sync>,
    hosts: HostRegistry,
    partitions: Arc<PartitionMetadataCache>,
    index: AtomicUsize,
    config: PartitionAwareConfig,
    refresh_task: Mutex<Option<PeriodicTask>>,
}

impl PartitionAwarePolicy {
    pub fn new(
        child: Box<dyn LoadBalancingPolicy + Send + Sync>,
        config: PartitionAwareConfig,
    ) -> Self {
        PartitionAwarePolicy {
            child,
            hosts: Default::default(),
            partitions: Default::default(),
            index: AtomicUsize::new(0),
            config,
            refresh_task: Mutex::new(None),
        }
    }

    #[inline]
    pub fn config(&self) -> &PartitionAwareConfig {
        &self.config
    }

    /// Partition metadata used for routing.
    #[inline]
    pub fn partitions(&self) -> &Arc<PartitionMetadataCache> {
        &self.partitions
    }

    /// Returns the routing key and target table of given request, if they can be determined.
    #[inline]
    pub fn routing_key(&self, request: &Request) -> Option<(RoutingKey, TableName)> {
        routing_key(request)
    }

    /// Starts periodic partition metadata refresh, with the first refresh happening immediately.
    /// A previously started refresh is stopped. Must be called within a tokio runtime.
    pub fn activate(&self, source: Arc<dyn PartitionMetadataSource + Send + Sync>) {
        let partitions = self.partitions.clone();
        let refresh_timeout = self.config.refresh_timeout;

        let task = PeriodicTask::start(self.config.refresh_interval, move || {
            let partitions = partitions.clone();
            let source = source.clone();

            async move {
                if let Err(error) = partitions.refresh(source.as_ref(), refresh_timeout).await {
                    error!(%error, "Error refreshing partition metadata.");
                }
            }
        });

        let previous = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);

        if let Some(previous) = previous {
            previous.stop();
        }
    }

    /// Stops periodic metadata refresh. An in-flight refresh is abandoned; the last fetched
    /// metadata stays in use.
    pub fn deactivate(&self) {
        let task = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            task.stop();
        }
    }

    /// Checks if periodic metadata refresh is running.
    pub fn is_active(&self) -> bool {
        self.refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    /// Refreshes partition metadata once, independently of the periodic task.
    pub async fn refresh(&self, source: &(dyn PartitionMetadataSource + Send + Sync)) -> Result<()> {
        self.partitions
            .refresh(source, self.config.refresh_timeout)
            .await
    }

    fn replica_plan(&self, request: &Request, child_plan: QueryPlan) -> QueryPlan {
        let (key, table) = match routing_key(request) {
            Some(routing) => routing,
            None => {
                trace!("Cannot determine routing key - using child plan.");
                return child_plan;
            }
        };

        let metadata = match self.partitions.snapshot() {
            Some(metadata) => metadata,
            None => return child_plan,
        };

        let replicas = match metadata.replicas(&table, key) {
            Some(replicas) => replicas,
            None => {
                warn!(%table, key = %key, "No partition found - using child plan.");
                return child_plan;
            }
        };

        let hosts = self.hosts.snapshot();
        let leader = replicas
            .leader
            .and_then(|leader| HostRegistry::find_by_ip(&hosts, leader));
        let followers = replicas
            .followers
            .iter()
            .filter_map(|follower| HostRegistry::find_by_ip(&hosts, *follower))
            .collect();

        Box::new(PartitionAwareQueryPlan::new(
            leader,
            followers,
            self.index.fetch_add(1, Ordering::SeqCst),
            child_plan,
        ))
    }
}

impl LoadBalancingPolicy for PartitionAwarePolicy {
    fn init(&self, hosts: &[Arc<Host>]) {
        if !hosts.iter().any(|host| host.is_up()) {
            error!(
                hosts = hosts.len(),
                "No valid hosts available for partition-aware routing."
            );
        }

        self.hosts.reset(hosts.to_vec());
        self.child.init(hosts);
    }

    #[inline]
    fn distance(&self, host: &Host) -> HostDistance {
        self.child.distance(host)
    }

    fn new_query_plan(&self, keyspace: Option<&str>, request: Option<&Request>) -> QueryPlan {
        let child_plan = self.child.new_query_plan(keyspace, request);
        match request {
            Some(request) => self.replica_plan(request, child_plan),
            None => child_plan,
        }
    }

    fn on_add(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
        self.child.on_add(host);
    }

    fn on_remove(&self, host: &Arc<Host>) {
        self.hosts.remove(host.address());
        self.child.on_remove(host);
    }

    fn on_up(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
        self.child.on_up(host);
    }

    fn on_down(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
        self.child.on_down(host);
    }

    fn new_instance(&self) -> Box<dyn LoadBalancingPolicy + Send + Sync> {
        Box::new(PartitionAwarePolicy::new(
            self.child.new_instance(),
            self.config,
        ))
    }
}
