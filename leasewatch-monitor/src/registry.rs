//! Registry Module
//!
//! Tracks allocated client addresses per monitored prefix and derives
//! utilization and alert state from them.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

/// Raised exactly once per upward threshold crossing; re-arms when the
/// prefix drops back below the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtilizationAlert {
    pub address: Ipv4Addr,
    pub mask: u8,
    pub utilization: f32,
}

/// Immutable per-prefix view handed to the render callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrefixSnapshot {
    pub address: Ipv4Addr,
    pub mask: u8,
    pub broadcast: Ipv4Addr,
    pub max_clients: u32,
    pub allocated: u32,
    pub utilization: f32,
}

/// Bookkeeping for one monitored prefix. Created at startup, lives for the
/// process lifetime.
#[derive(Debug)]
struct PrefixStats {
    /// Network address, host byte order, host bits zero.
    address: u32,
    mask: u8,
    /// Derived at construction, never mutated afterwards.
    broadcast: u32,
    max_clients: u32,
    allocated: HashSet<u32>,
    utilization: f32,
    alerted: bool,
}

impl PrefixStats {
    fn new(network: Ipv4Network) -> Self {
        let mask = network.prefix();
        // Network and broadcast addresses are never usable; a /31 or /32 has
        // no usable hosts at all.
        let max_clients = (1u64 << (32 - u32::from(mask))).saturating_sub(2) as u32;
        Self {
            address: u32::from(network.network()),
            mask,
            broadcast: u32::from(network.broadcast()),
            max_clients,
            allocated: HashSet::new(),
            utilization: 0.0,
            alerted: false,
        }
    }

    /// Shifted-prefix membership: discard the host bits of both addresses
    /// and compare what remains. The network and broadcast addresses are
    /// excluded outright.
    fn accepts(&self, client: u32) -> bool {
        if self.max_clients == 0 {
            return false;
        }
        if client == self.address || client == self.broadcast {
            return false;
        }
        let shift = 32 - u32::from(self.mask);
        (client >> shift) == (self.address >> shift)
    }

    /// Recomputes utilization and the alert flag after a mutation. Returns
    /// true on the false→true transition, the moment the one-shot
    /// notification is due.
    fn recompute(&mut self, threshold: f32) -> bool {
        self.utilization = if self.max_clients == 0 {
            0.0
        } else {
            self.allocated.len() as f32 / self.max_clients as f32 * 100.0
        };
        let newly_crossed = !self.alerted && self.utilization >= threshold;
        self.alerted = self.utilization >= threshold;
        newly_crossed
    }

    fn snapshot(&self) -> PrefixSnapshot {
        PrefixSnapshot {
            address: Ipv4Addr::from(self.address),
            mask: self.mask,
            broadcast: Ipv4Addr::from(self.broadcast),
            max_clients: self.max_clients,
            allocated: self.allocated.len() as u32,
            utilization: self.utilization,
        }
    }
}

/// Owns all monitored prefixes. Mutated only from the capture thread.
#[derive(Debug)]
pub struct PrefixRegistry {
    prefixes: Vec<PrefixStats>,
    alert_threshold: f32,
}

impl PrefixRegistry {
    /// Builds the registry from the validated prefix list, preserving
    /// registration order.
    pub fn new(networks: &[Ipv4Network], alert_threshold: f32) -> Self {
        Self {
            prefixes: networks.iter().copied().map(PrefixStats::new).collect(),
            alert_threshold,
        }
    }

    /// Records a lease assignment. Every prefix the address belongs to is
    /// updated independently, so overlapping prefixes each count it once.
    /// Re-allocating an address already held by a prefix is a no-op for
    /// that prefix. Returns the alerts that fired during this call.
    pub fn allocate(&mut self, client: Ipv4Addr) -> Vec<UtilizationAlert> {
        let client = u32::from(client);
        let mut alerts = Vec::new();
        for prefix in &mut self.prefixes {
            if !prefix.accepts(client) || !prefix.allocated.insert(client) {
                continue;
            }
            if prefix.recompute(self.alert_threshold) {
                alerts.push(UtilizationAlert {
                    address: Ipv4Addr::from(prefix.address),
                    mask: prefix.mask,
                    utilization: prefix.utilization,
                });
            }
        }
        alerts
    }

    /// Records a lease release. The address is removed from the first prefix
    /// (in registration order) holding it; unknown addresses are a no-op.
    pub fn release(&mut self, client: Ipv4Addr) {
        let client = u32::from(client);
        if let Some(prefix) = self
            .prefixes
            .iter_mut()
            .find(|p| p.allocated.contains(&client))
        {
            prefix.allocated.remove(&client);
            prefix.recompute(self.alert_threshold);
        }
    }

    pub fn snapshot(&self) -> Vec<PrefixSnapshot> {
        self.prefixes.iter().map(PrefixStats::snapshot).collect()
    }
}
