//! **partition-routing** is the routing core of a driver for hash-partitioned, replicated
//! databases. It sends each request straight to the replicas owning the partition of the target
//! row, with the partition leader tried first.
//!
//! ## Getting started
//!
//! The partition-aware policy wraps another policy, which is used whenever the partition of a
//! request can't be determined and which supplies the remaining hosts of every query plan.
//!
//! ```no_run
//! use partition_routing::config::PartitionAwareConfigBuilder;
//! use partition_routing::load_balancing::{
//!     LoadBalancingPolicy, PartitionAwarePolicy, RoundRobinPolicy,
//! };
//! use partition_routing::partition_metadata::PartitionMetadataSource;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn control_channel() -> Arc<dyn PartitionMetadataSource + Send + Sync> { unimplemented!() }
//! #[tokio::main]
//! async fn main() {
//!     let config = PartitionAwareConfigBuilder::new()
//!         .with_refresh_interval(Duration::from_secs(30))
//!         .build();
//!
//!     let policy = PartitionAwarePolicy::new(Box::new(RoundRobinPolicy::new()), config);
//!     policy.init(&[]);
//!     policy.activate(control_channel());
//!
//!     for host in policy.new_query_plan(None, None) {
//!         println!("{}", host.address());
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! Routing keys are derived from bound primary key values of prepared statements (see
//! [`routing_key`](crate::routing_key)) and looked up in periodically refreshed
//! [partition metadata](crate::partition_metadata). Requests without a routing key, requests for
//! unknown partitions and all requests sent before the first metadata refresh are routed by the
//! wrapped policy alone.

pub mod config;
pub mod error;
pub mod hash;
pub mod host;
pub mod load_balancing;
pub mod partition_metadata;
pub mod periodic_task;
pub mod request;
pub mod routing_key;
pub mod token;

pub type Error = error::Error;
pub type Result<T> = error::Result<T>;
