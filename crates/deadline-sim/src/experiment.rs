//! Tools for running experiments with multiple simulation runs.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use dyn_clone::{clone_trait_object, DynClone};
use indexmap::map::IndexMap;
use log::Level;
use sugars::{rc, refcell};
use threadpool::ThreadPool;

use crate::core::common::TaskStatus;
use crate::core::config::SimulationConfig;
use crate::core::evaluator::Verdict;
use crate::core::logger::{FileLogger, Logger, StdoutLogger};
use crate::error::ConfigurationError;
use crate::simulation::DatacenterSimulation;

/// Trait for implementing custom callbacks for simulation runs within an experiment.
pub trait SimulationCallbacks: DynClone + Send {
    /// Runs before starting a simulation run.
    fn on_simulation_start(&mut self, _sim: &mut DatacenterSimulation) {}

    /// Runs upon the completion of a simulation run, returns results of this run.
    fn on_simulation_finish(
        &mut self,
        _sim: &mut DatacenterSimulation,
        _verdicts: &[Verdict],
    ) -> IndexMap<String, String> {
        IndexMap::new()
    }
}

clone_trait_object!(SimulationCallbacks);

/// Default callbacks producing deadline compliance counters per run.
#[derive(Clone)]
pub struct DeadlineStats;

impl SimulationCallbacks for DeadlineStats {
    fn on_simulation_finish(
        &mut self,
        _sim: &mut DatacenterSimulation,
        verdicts: &[Verdict],
    ) -> IndexMap<String, String> {
        let met = verdicts.iter().filter(|v| v.met_deadline).count();
        let rejected = verdicts.iter().filter(|v| v.status == TaskStatus::Rejected).count();
        let unassigned = verdicts.iter().filter(|v| v.status == TaskStatus::Unassigned).count();
        let mut result = IndexMap::new();
        result.insert("tasks".to_string(), verdicts.len().to_string());
        result.insert("met_deadline".to_string(), met.to_string());
        result.insert("missed_deadline".to_string(), (verdicts.len() - met).to_string());
        result.insert("rejected".to_string(), rejected.to_string());
        result.insert("unassigned".to_string(), unassigned.to_string());
        result
    }
}

/// Implements execution of an experiment, one simulation run per config.
///
/// Runs are independent and deterministic, so executing them on a thread pool
/// produces the same per-run results as a sequential execution.
pub struct Experiment {
    pub configs: Vec<(String, SimulationConfig)>,
    pub callbacks: Box<dyn SimulationCallbacks>,
    pub log_dir: Option<String>,
    pub log_level: Level,
}

impl Experiment {
    pub fn new(
        configs: Vec<(String, SimulationConfig)>,
        callbacks: Box<dyn SimulationCallbacks>,
        log_dir: Option<String>,
        log_level: Level,
    ) -> Result<Self, std::io::Error> {
        if let Some(dir) = &log_dir {
            fs::create_dir_all(dir)?;
        }
        Ok(Self {
            configs,
            callbacks,
            log_dir,
            log_level,
        })
    }

    /// Runs the experiment using the specified number of threads.
    ///
    /// Returns per-run results in config order, each annotated with the run
    /// name under the `run` key.
    pub fn run(&mut self, num_threads: usize) -> Vec<IndexMap<String, String>> {
        let results = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::new(num_threads);

        for (run_id, (name, config)) in self.configs.iter().enumerate() {
            let name = name.clone();
            let config = config.clone();
            let mut callbacks = self.callbacks.clone();
            let log_level = self.log_level;
            let log_file = self.log_dir.clone().map(|dir| format!("{}/log_{}.csv", dir, run_id));
            let results = results.clone();

            pool.execute(move || {
                let logger: Rc<RefCell<dyn Logger>> = if log_file.is_some() {
                    rc!(refcell!(FileLogger::with_level(log_level)))
                } else {
                    rc!(refcell!(StdoutLogger::new()))
                };
                let mut run = || -> Result<IndexMap<String, String>, ConfigurationError> {
                    let mut sim = DatacenterSimulation::with_logger(&config, logger.clone())?;
                    callbacks.on_simulation_start(&mut sim);
                    let verdicts = sim.run()?;
                    Ok(callbacks.on_simulation_finish(&mut sim, &verdicts))
                };
                match run() {
                    Ok(run_result) => {
                        if let Some(path) = &log_file {
                            if let Err(error) = logger.borrow().save_log(path) {
                                log::error!("can't save log for run {}: {}", name, error);
                            }
                        }
                        let mut record = IndexMap::new();
                        record.insert("run".to_string(), name);
                        record.extend(run_result);
                        results.lock().unwrap().push((run_id, record));
                    }
                    Err(error) => log::error!("run {} failed: {}", name, error),
                }
            });
        }
        pool.join();

        let mut results = results.lock().unwrap().clone();
        results.sort_by_key(|(run_id, _)| *run_id);
        results.into_iter().map(|(_, record)| record).collect()
    }
}
