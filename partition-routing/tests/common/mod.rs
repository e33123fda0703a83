#![allow(dead_code)]

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use partition_routing::error::{Error, Result};
use partition_routing::host::Host;
use partition_routing::load_balancing::QueryPlan;
use partition_routing::partition_metadata::{PartitionMetadataSource, PartitionRow};
use partition_routing::request::{BoundStatement, PreparedMetadata, Request, TableName, Value};

pub const KEYSPACE: &str = "ks";
pub const TABLE: &str = "users";

pub fn ip(last_octet: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, last_octet))
}

pub fn hosts(count: u8) -> Vec<Arc<Host>> {
    (1..=count)
        .map(|last_octet| Arc::new(Host::new(SocketAddr::new(ip(last_octet), 9042))))
        .collect()
}

pub fn octets(plan: QueryPlan) -> Vec<u8> {
    plan.map(|host| match host.ip() {
        IpAddr::V4(ip) => ip.octets()[3],
        IpAddr::V6(_) => unreachable!(),
    })
    .collect()
}

pub fn row(start_key: Option<u16>, end_key: Option<u16>, replicas: &[(u8, &str)]) -> PartitionRow {
    let encode = |key: Option<u16>| {
        key.map(|key| Bytes::copy_from_slice(&key.to_be_bytes()))
            .unwrap_or_default()
    };

    PartitionRow {
        keyspace_name: KEYSPACE.into(),
        table_name: TABLE.into(),
        start_key: encode(start_key),
        end_key: encode(end_key),
        replica_addresses: replicas
            .iter()
            .map(|(last_octet, role)| (ip(*last_octet), role.to_string()))
            .collect(),
    }
}

/// Four equal ranges, led by hosts 1 to 4 respectively, with the next two hosts as followers.
pub fn quarter_rows() -> Vec<PartitionRow> {
    (0..4u8)
        .map(|quarter| {
            let start = (quarter > 0).then(|| quarter as u16 * 0x4000);
            let end = (quarter < 3).then(|| (quarter as u16 + 1) * 0x4000);
            let leader = quarter + 1;

            row(
                start,
                end,
                &[
                    (leader, "LEADER"),
                    (leader % 6 + 1, "FOLLOWER"),
                    ((leader + 1) % 6 + 1, "READ_REPLICA"),
                ],
            )
        })
        .collect()
}

pub fn execute(key: impl Into<Value>) -> Request {
    Request::Execute(BoundStatement::new(
        Some(Arc::new(PreparedMetadata::new(
            TableName::new(KEYSPACE.into(), TABLE.into()),
            vec![0],
        ))),
        vec![key.into()],
    ))
}

/// Control channel stand-in serving configurable rows.
#[derive(Default)]
pub struct FakeSource {
    rows: Mutex<Vec<PartitionRow>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new(rows: Vec<PartitionRow>) -> Self {
        FakeSource {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn set_rows(&self, rows: Vec<PartitionRow>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PartitionMetadataSource for FakeSource {
    fn fetch_partitions(&self) -> BoxFuture<'static, Result<Vec<PartitionRow>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let result = if self.failing.load(Ordering::SeqCst) {
            Err(Error::General("Control connection unavailable.".into()))
        } else {
            Ok(self.rows.lock().unwrap().clone())
        };

        futures::future::ready(result).boxed()
    }
}
