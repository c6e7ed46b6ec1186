//! Round robin algorithm.

use crate::core::cloudlet::Cloudlet;
use crate::core::config::parse_options;
use crate::core::placement::{LoadLedger, PlacementAlgorithm};
use crate::core::vm::VmPool;

/// Cycles through the pool in id order ignoring VM load, used as a baseline
/// for comparison with deadline-aware placement.
pub struct RoundRobin {
    next: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Creates the algorithm from an options string, e.g. `start=1`.
    pub fn from_options(options: Option<&str>) -> Self {
        let start = options
            .map(parse_options)
            .and_then(|opts| opts.get("start").and_then(|v| v.parse::<usize>().ok()))
            .unwrap_or(0);
        Self { next: start }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementAlgorithm for RoundRobin {
    fn select_vm(&mut self, _cloudlet: &Cloudlet, _ledger: &LoadLedger, pool: &VmPool) -> Option<u32> {
        if pool.is_empty() {
            return None;
        }
        let vm_id = pool.vms()[self.next % pool.len()].id;
        self.next += 1;
        Some(vm_id)
    }
}
