//! Simulation configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Holds raw simulation config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawSimulationConfig {
    pub hosts: Option<Vec<HostConfig>>,
    pub vms: Option<VmPoolConfig>,
    pub scheduler: Option<SchedulerConfig>,
    pub tasks: Option<Vec<TaskConfig>>,
}

/// Holds configuration of a single physical host or a set of identical hosts.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct HostConfig {
    /// Host name.
    pub name: Option<String>,
    /// Processing speed rating of one processing element.
    pub speed: f64,
    /// Number of processing elements.
    pub pe_count: Option<u32>,
    /// Host memory capacity.
    pub memory: Option<u64>,
    /// Host network bandwidth.
    pub bandwidth: Option<u64>,
    /// Host storage capacity.
    pub storage: Option<u64>,
    /// Number of such hosts.
    pub count: Option<u32>,
}

/// Holds configuration of the VM pool.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct VmPoolConfig {
    /// Number of VMs in the pool.
    pub count: u32,
    /// Processing speed rating of each VM.
    pub speed: f64,
}

/// Holds configuration of the scheduler.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Placement algorithm used by the scheduler.
    pub algorithm: String,
}

/// Holds configuration of a single task or a set of identical tasks.
///
/// Task ids are assigned sequentially in config order.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct TaskConfig {
    /// Task length in instructions.
    pub length: i64,
    /// Number of processing elements required.
    pub pe_count: Option<u32>,
    /// Task completion deadline.
    pub deadline: f64,
    /// Number of such tasks.
    pub count: Option<u32>,
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Configurations of physical hosts.
    pub hosts: Vec<HostConfig>,
    /// Configuration of the VM pool.
    pub vms: VmPoolConfig,
    /// Configuration of the scheduler.
    pub scheduler: SchedulerConfig,
    /// Configurations of submitted tasks.
    pub tasks: Vec<TaskConfig>,
}

impl SimulationConfig {
    /// Creates simulation config by reading parameter values from YAML file
    /// (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(file_name).map_err(|e| ConfigurationError::ConfigRead {
            path: file_name.to_string(),
            source: e,
        })?;
        let raw: RawSimulationConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigurationError::ConfigParse {
                path: file_name.to_string(),
                source: e,
            })?;

        Ok(Self {
            hosts: raw.hosts.unwrap_or_default(),
            vms: raw.vms.unwrap_or(VmPoolConfig { count: 0, speed: 0. }),
            scheduler: raw.scheduler.unwrap_or(SchedulerConfig {
                algorithm: "LeastFinishTime".to_string(),
            }),
            tasks: raw.tasks.unwrap_or_default(),
        })
    }

    /// Returns total task count.
    pub fn number_of_tasks(&self) -> u32 {
        self.tasks.iter().map(|task| task.count.unwrap_or(1)).sum()
    }
}

/// Parses config value string, which consists of two parts - name and options.
/// Example: RoundRobin[start=1] parts are name RoundRobin and options string "start=1".
pub fn parse_config_value(config_str: &str) -> (String, Option<String>) {
    match config_str.split_once('[') {
        Some((l, r)) => (l.to_string(), Some(r.to_string().replace(']', ""))),
        None => (config_str.to_string(), None),
    }
}

/// Parses options string from config value, returns map with option names and values.
pub fn parse_options(options_str: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    for option_str in options_str.split(',') {
        if let Some((name, value)) = option_str.split_once('=') {
            options.insert(name.to_string(), value.to_string());
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::{parse_config_value, parse_options};

    #[test]
    fn config_value_without_options() {
        assert_eq!(parse_config_value("LeastFinishTime"), ("LeastFinishTime".to_string(), None));
    }

    #[test]
    fn config_value_with_options() {
        let (name, options) = parse_config_value("RoundRobin[start=1]");
        assert_eq!(name, "RoundRobin");
        let options = parse_options(&options.unwrap());
        assert_eq!(options.get("start").unwrap(), "1");
        assert_eq!(options.get("stop"), None);
    }
}
