mod partition_aware;
mod partition_aware_plan;
mod round_robin;

pub use self::partition_aware::PartitionAwarePolicy;
pub use self::partition_aware_plan::PartitionAwareQueryPlan;
pub use self::round_robin::RoundRobinPolicy;

use std::sync::Arc;

use crate::host::{Host, HostDistance};
use crate::request::Request;

/// Single-use, lazily computed sequence of hosts to try for a request, in order of preference.
pub type QueryPlan = Box<dyn Iterator<Item = Arc<Host>> + Send>;

/// Load balancing policy, deciding which hosts should receive requests. Policies can be chained:
/// a decorating policy owns the next policy in the chain and forwards lifecycle events to it.
pub trait LoadBalancingPolicy {
    /// Initializes the policy with all hosts known at session start.
    fn init(&self, hosts: &[Arc<Host>]);

    /// Returns the distance of given host, as seen by this policy.
    fn distance(&self, host: &Host) -> HostDistance;

    /// Returns a query plan for given request. If no request is given, returns a generic plan for
    /// establishing connection(s) to host(s).
    fn new_query_plan(&self, keyspace: Option<&str>, request: Option<&Request>) -> QueryPlan;

    fn on_add(&self, host: &Arc<Host>);

    fn on_remove(&self, host: &Arc<Host>);

    fn on_up(&self, host: &Arc<Host>);

    fn on_down(&self, host: &Arc<Host>);

    /// Creates a new, uninitialized policy with the same configuration.
    fn new_instance(&self) -> Box<dyn LoadBalancingPolicy + Send + Sync>;
}
