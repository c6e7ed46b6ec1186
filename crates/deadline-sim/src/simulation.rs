//! Top-level simulation pipeline.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use sugars::{rc, refcell};

use crate::core::cloudlet::{Cloudlet, CloudletQueue};
use crate::core::common::Assignment;
use crate::core::config::SimulationConfig;
use crate::core::engine::SimulationEngine;
use crate::core::evaluator::{evaluate, Verdict};
use crate::core::host::{HostSpec, ResourceCatalog};
use crate::core::logger::{Logger, StdoutLogger};
use crate::core::placement::{placement_algorithm_resolver, Scheduler};
use crate::core::vm::VmPool;
use crate::error::ConfigurationError;

const DEFAULT_HOST_PE_COUNT: u32 = 1;
const DEFAULT_HOST_MEMORY: u64 = 4096;
const DEFAULT_HOST_BANDWIDTH: u64 = 10000;
const DEFAULT_HOST_STORAGE: u64 = 1000000;
const DEFAULT_TASK_PE_COUNT: u32 = 1;

/// Session id used for all VMs created by the simulation.
const SESSION_ID: u32 = 0;

/// Glues the pipeline stages together: resource catalog, VM pool, cloudlet
/// queue, scheduler, engine and evaluator.
///
/// Data flows strictly downstream through explicit values, each stage is
/// built from the previous one at setup. Fatal configuration errors surface
/// from [`DatacenterSimulation::new`] before any scheduling happens; per-task
/// errors are collected and reported in the final verdict list instead.
pub struct DatacenterSimulation {
    catalog: ResourceCatalog,
    pool: VmPool,
    queue: CloudletQueue,
    scheduler: Scheduler,
    engine: SimulationEngine,
    assignments: Vec<Assignment>,
    logger: Rc<RefCell<dyn Logger>>,
}

impl DatacenterSimulation {
    /// Builds all pipeline stages from the config, logging to stdout.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigurationError> {
        Self::with_logger(config, rc!(refcell!(StdoutLogger::new())))
    }

    /// Builds all pipeline stages from the config with a custom logger.
    pub fn with_logger(
        config: &SimulationConfig,
        logger: Rc<RefCell<dyn Logger>>,
    ) -> Result<Self, ConfigurationError> {
        let catalog = ResourceCatalog::new(Self::expand_hosts(config))?;
        let pool = VmPool::create(config.vms.count, config.vms.speed, SESSION_ID)?;
        let (queue, validation_errors) = CloudletQueue::submit(Self::expand_tasks(config));
        {
            let mut logger = logger.borrow_mut();
            for error in &validation_errors {
                logger.log_warn(0., "queue", error.to_string());
            }
            logger.log_info(
                0.,
                "simulation",
                format!(
                    "catalog: {} hosts with total speed {}, pool: {} vms, queue: {} tasks ({} rejected)",
                    catalog.host_count(),
                    catalog.total_speed(),
                    pool.len(),
                    queue.submitted().len(),
                    queue.rejected_count()
                ),
            );
        }
        let algorithm = placement_algorithm_resolver(&config.scheduler.algorithm)?;
        let scheduler = Scheduler::new(&pool, algorithm);
        Ok(Self {
            catalog,
            pool,
            queue,
            scheduler,
            engine: SimulationEngine::new(),
            assignments: Vec::new(),
            logger,
        })
    }

    fn expand_hosts(config: &SimulationConfig) -> Vec<HostSpec> {
        let mut hosts = Vec::new();
        for host in &config.hosts {
            for _ in 0..host.count.unwrap_or(1) {
                hosts.push(HostSpec {
                    speed: host.speed,
                    pe_count: host.pe_count.unwrap_or(DEFAULT_HOST_PE_COUNT),
                    memory: host.memory.unwrap_or(DEFAULT_HOST_MEMORY),
                    bandwidth: host.bandwidth.unwrap_or(DEFAULT_HOST_BANDWIDTH),
                    storage: host.storage.unwrap_or(DEFAULT_HOST_STORAGE),
                });
            }
        }
        hosts
    }

    fn expand_tasks(config: &SimulationConfig) -> Vec<Cloudlet> {
        let mut tasks = Vec::new();
        for task in &config.tasks {
            for _ in 0..task.count.unwrap_or(1) {
                tasks.push(Cloudlet {
                    id: tasks.len() as u32,
                    length: task.length,
                    pe_count: task.pe_count.unwrap_or(DEFAULT_TASK_PE_COUNT),
                    deadline: task.deadline,
                });
            }
        }
        tasks
    }

    /// Runs the pipeline: schedule, execute, evaluate.
    ///
    /// Returns one verdict per submitted task in submission order.
    pub fn run(&mut self) -> Result<Vec<Verdict>, ConfigurationError> {
        let mut logger = self.logger.borrow_mut();
        self.assignments = self.scheduler.schedule(&self.queue, &self.pool, &mut *logger)?;
        let results = self.engine.run(&self.pool, &self.queue, &self.assignments, &mut *logger);
        let tasks_by_id: BTreeMap<u32, Cloudlet> =
            self.queue.submitted().iter().map(|c| (c.id, c.clone())).collect();
        let verdicts = evaluate(&results, &tasks_by_id);
        let met = verdicts.iter().filter(|v| v.met_deadline).count();
        logger.log_info(
            0.,
            "simulation",
            format!("{} of {} tasks met their deadline", met, verdicts.len()),
        );
        Ok(verdicts)
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn pool(&self) -> &VmPool {
        &self.pool
    }

    pub fn queue(&self) -> &CloudletQueue {
        &self.queue
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Assignments produced by the last [`DatacenterSimulation::run`] call,
    /// in scheduling order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Saves the collected log if the configured logger supports it.
    pub fn save_log(&self, path: &str) -> Result<(), std::io::Error> {
        self.logger.borrow().save_log(path)
    }
}
