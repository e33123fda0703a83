use derivative::Derivative;
use fxhash::FxHashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::host::Host;
use crate::load_balancing::QueryPlan;

/// Query plan which yields the partition leader (if up), then each follower which is up - starting
/// at a rotating position - and finally hosts from the fallback plan which are not replicas of the
/// partition. No host is yielded twice.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PartitionAwareQueryPlan {
    leader: Option<Arc<Host>>,
    followers: Vec<Arc<Host>>,
    next_follower: usize,
    remaining_followers: usize,
    #[derivative(Debug = "ignore")]
    child_plan: QueryPlan,
    offered: FxHashSet<SocketAddr>,
}

impl PartitionAwareQueryPlan {
    pub fn new(
        leader: Option<Arc<Host>>,
        followers: Vec<Arc<Host>>,
        start_index: usize,
        child_plan: QueryPlan,
    ) -> Self {
        let offered = leader
            .iter()
            .chain(followers.iter())
            .map(|host| host.address())
            .collect();

        let next_follower = if followers.is_empty() {
            0
        } else {
            start_index % followers.len()
        };

        PartitionAwareQueryPlan {
            leader,
            remaining_followers: followers.len(),
            followers,
            next_follower,
            child_plan,
            offered,
        }
    }

    fn next_follower(&mut self) -> Option<Arc<Host>> {
        while self.remaining_followers > 0 {
            let follower = &self.followers[self.next_follower];
            self.next_follower = (self.next_follower + 1) % self.followers.len();
            self.remaining_followers -= 1;

            if follower.is_up() {
                return Some(follower.clone());
            }
        }

        None
    }
}

impl Iterator for PartitionAwareQueryPlan {
    type Item = Arc<Host>;

    fn next(&mut self) -> Option<Self::Item> {
        // the leader gets exactly one chance, even if it's down
        if let Some(leader) = self.leader.take() {
            if leader.is_up() {
                return Some(leader);
            }
        }

        if let Some(follower) = self.next_follower() {
            return Some(follower);
        }

        let offered = &mut self.offered;
        self.child_plan.find(|host| offered.insert(host.address()))
    }
}
