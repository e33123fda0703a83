use arc_swap::ArcSwap;
use atomic::Atomic;
use bytemuck::NoUninit;
use derive_more::Display;
use std::fmt::{Debug, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// The liveness of a host, as viewed from the driver.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, NoUninit)]
#[repr(u8)]
pub enum HostState {
    Up,
    Down,
}

/// Determines how the driver treats a host, as decided by a load balancing policy.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Display)]
pub enum HostDistance {
    /// Preferred host, e.g. in the local datacenter.
    Local,
    /// Less preferred host.
    Remote,
    /// Host which should never be used for queries.
    Ignored,
}

/// A database host known to the driver. Hosts are shared with the rest of the driver, which
/// updates their liveness when up/down events arrive.
pub struct Host {
    address: SocketAddr,
    state: Atomic<HostState>,
}

impl Debug for Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("address", &self.address)
            .field("state", &self.state())
            .finish()
    }
}

impl Host {
    /// Creates a new host in the [`HostState::Up`] state.
    pub fn new(address: SocketAddr) -> Self {
        Self::with_state(address, HostState::Up)
    }

    pub fn with_state(address: SocketAddr, state: HostState) -> Self {
        Host {
            address,
            state: Atomic::new(state),
        }
    }

    #[inline]
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.address.ip()
    }

    #[inline]
    pub fn state(&self) -> HostState {
        self.state.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.state() == HostState::Up
    }

    #[inline]
    pub fn mark_up(&self) {
        self.state.store(HostState::Up, Ordering::Relaxed);
    }

    #[inline]
    pub fn mark_down(&self) {
        self.state.store(HostState::Down, Ordering::Relaxed);
    }
}

/// Copy-on-write collection of known hosts. Every update publishes a brand new snapshot, so
/// readers never observe a partially modified collection.
#[derive(Debug)]
pub struct HostRegistry {
    hosts: ArcSwap<Vec<Arc<Host>>>,
}

impl Default for HostRegistry {
    fn default() -> Self {
        HostRegistry {
            hosts: ArcSwap::from_pointee(Vec::new()),
        }
    }
}

impl HostRegistry {
    pub fn new(hosts: Vec<Arc<Host>>) -> Self {
        HostRegistry {
            hosts: ArcSwap::from_pointee(hosts),
        }
    }

    /// Returns the current snapshot.
    #[inline]
    pub fn snapshot(&self) -> Arc<Vec<Arc<Host>>> {
        self.hosts.load_full()
    }

    /// Replaces all known hosts.
    pub fn reset(&self, hosts: Vec<Arc<Host>>) {
        self.hosts.store(Arc::new(hosts));
    }

    /// Adds a host or replaces a known one with the same address.
    pub fn insert(&self, host: &Arc<Host>) {
        self.hosts.rcu(|hosts| {
            let mut hosts = Vec::clone(hosts);
            match hosts
                .iter()
                .position(|known| known.address() == host.address())
            {
                Some(index) => hosts[index] = host.clone(),
                None => hosts.push(host.clone()),
            }

            hosts
        });
    }

    /// Removes a host with the given address.
    pub fn remove(&self, address: SocketAddr) {
        self.hosts.rcu(|hosts| {
            hosts
                .iter()
                .filter(|known| known.address() != address)
                .cloned()
                .collect::<Vec<_>>()
        });
    }

    /// Finds a host by its ip address, ignoring the port.
    pub fn find_by_ip(hosts: &[Arc<Host>], ip: IpAddr) -> Option<Arc<Host>> {
        hosts.iter().find(|host| host.ip() == ip).cloned()
    }
}
