//! Deadline-aware binding of cloudlets to VMs.

use std::collections::BTreeMap;

use sugars::boxed;

use crate::core::cloudlet::{Cloudlet, CloudletQueue};
use crate::core::common::Assignment;
use crate::core::config::parse_config_value;
use crate::core::logger::Logger;
use crate::core::placement_algorithms::least_finish_time::LeastFinishTime;
use crate::core::placement_algorithms::round_robin::RoundRobin;
use crate::core::vm::VmPool;
use crate::error::ConfigurationError;

/// Per-VM running total of assigned cloudlet lengths.
///
/// Rebuilt at the start of each scheduling pass and grown as cloudlets are
/// bound, used only for finish time estimation during placement. For every VM
/// the total equals the sum of lengths of all cloudlets currently bound to it.
pub struct LoadLedger {
    load: BTreeMap<u32, u64>,
}

impl LoadLedger {
    /// Creates a ledger with zero load for every VM in the pool.
    pub fn new(pool: &VmPool) -> Self {
        Self {
            load: pool.iter().map(|vm| (vm.id, 0)).collect(),
        }
    }

    /// Adds the length of a newly bound cloudlet to the VM total.
    pub fn add(&mut self, vm_id: u32, length: u64) {
        if let Some(load) = self.load.get_mut(&vm_id) {
            *load += length;
        }
    }

    /// Returns the cumulative assigned length for the VM.
    pub fn load(&self, vm_id: u32) -> u64 {
        self.load.get(&vm_id).copied().unwrap_or(0)
    }
}

/// Trait for implementation of task placement algorithms.
///
/// The algorithm is defined as a function of the cloudlet being placed, the
/// current load ledger and the VM pool, which returns an id of the VM
/// selected for the cloudlet or `None` if no VM is suitable.
pub trait PlacementAlgorithm {
    fn select_vm(&mut self, cloudlet: &Cloudlet, ledger: &LoadLedger, pool: &VmPool) -> Option<u32>;
}

/// Resolves a placement algorithm from its config string, e.g.
/// `LeastFinishTime` or `RoundRobin[start=1]`.
pub fn placement_algorithm_resolver(config_str: &str) -> Result<Box<dyn PlacementAlgorithm>, ConfigurationError> {
    let (algorithm_name, options) = parse_config_value(config_str);
    match algorithm_name.as_str() {
        "LeastFinishTime" => Ok(boxed!(LeastFinishTime::new())),
        "RoundRobin" => Ok(boxed!(RoundRobin::from_options(options.as_deref()))),
        _ => Err(ConfigurationError::UnknownAlgorithm(config_str.to_string())),
    }
}

/// Binds every accepted cloudlet to exactly one VM before execution starts.
///
/// Cloudlets are processed in the order produced by
/// [`CloudletQueue::ordered_view`], i.e. earliest deadline first with ties in
/// submission order. The binding is static: no re-assignment happens once the
/// simulation engine runs.
pub struct Scheduler {
    algorithm: Box<dyn PlacementAlgorithm>,
    ledger: LoadLedger,
    unassigned: Vec<u32>,
}

impl Scheduler {
    pub fn new(pool: &VmPool, algorithm: Box<dyn PlacementAlgorithm>) -> Self {
        Self {
            algorithm,
            ledger: LoadLedger::new(pool),
            unassigned: Vec::new(),
        }
    }

    /// Produces assignments for all accepted cloudlets in the queue.
    ///
    /// An unplaceable cloudlet is recorded as unassigned and never aborts the
    /// batch. An empty pool is a configuration error instead. Each call
    /// schedules the queue from scratch, so repeated calls with the same
    /// inputs produce the same assignments.
    pub fn schedule(
        &mut self,
        queue: &CloudletQueue,
        pool: &VmPool,
        logger: &mut dyn Logger,
    ) -> Result<Vec<Assignment>, ConfigurationError> {
        if pool.is_empty() {
            return Err(ConfigurationError::EmptyVmPool);
        }
        self.ledger = LoadLedger::new(pool);
        self.unassigned.clear();
        let mut assignments = Vec::new();
        for cloudlet in queue.ordered_view() {
            match self.algorithm.select_vm(cloudlet, &self.ledger, pool) {
                Some(vm_id) => {
                    logger.log_debug(
                        0.,
                        "scheduler",
                        format!("decided to place task {} on vm {}", cloudlet.id, vm_id),
                    );
                    self.ledger.add(vm_id, cloudlet.length as u64);
                    assignments.push(Assignment {
                        task_id: cloudlet.id,
                        vm_id,
                    });
                }
                None => {
                    logger.log_warn(0., "scheduler", format!("failed to place task {}", cloudlet.id));
                    self.unassigned.push(cloudlet.id);
                }
            }
        }
        Ok(assignments)
    }

    pub fn ledger(&self) -> &LoadLedger {
        &self.ledger
    }

    /// Ids of cloudlets for which no VM was available.
    pub fn unassigned(&self) -> &[u32] {
        &self.unassigned
    }
}
