use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::host::{Host, HostDistance, HostRegistry};
use crate::load_balancing::{LoadBalancingPolicy, QueryPlan};
use crate::request::Request;

/// Simple round-robin load balancing over all hosts which are up.
#[derive(Debug, Default)]
pub struct RoundRobinPolicy {
    hosts: HostRegistry,
    prev_idx: AtomicUsize,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Default::default()
    }
}

impl LoadBalancingPolicy for RoundRobinPolicy {
    fn init(&self, hosts: &[Arc<Host>]) {
        self.hosts.reset(hosts.to_vec());
    }

    fn distance(&self, _host: &Host) -> HostDistance {
        HostDistance::Local
    }

    fn new_query_plan(&self, _keyspace: Option<&str>, _request: Option<&Request>) -> QueryPlan {
        let mut hosts: Vec<_> = self
            .hosts
            .snapshot()
            .iter()
            .filter(|host| host.is_up())
            .cloned()
            .collect();

        if !hosts.is_empty() {
            let cur_idx = self.prev_idx.fetch_add(1, Ordering::SeqCst) % hosts.len();
            hosts.rotate_left(cur_idx);
        }

        Box::new(hosts.into_iter())
    }

    fn on_add(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
    }

    fn on_remove(&self, host: &Arc<Host>) {
        self.hosts.remove(host.address());
    }

    fn on_up(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
    }

    fn on_down(&self, host: &Arc<Host>) {
        self.hosts.insert(host);
    }

    fn new_instance(&self) -> Box<dyn LoadBalancingPolicy + Send + Sync> {
        Box::new(RoundRobinPolicy::new())
    }
}
