//! Physical host descriptions forming the static resource catalog.

use crate::error::ConfigurationError;

/// Describes capacity of a single physical host.
#[derive(Clone, Debug, PartialEq)]
pub struct HostSpec {
    /// Processing speed rating of one processing element (speed units per time unit).
    pub speed: f64,
    /// Number of processing elements.
    pub pe_count: u32,
    /// Memory capacity.
    pub memory: u64,
    /// Network bandwidth.
    pub bandwidth: u64,
    /// Storage capacity.
    pub storage: u64,
}

/// Immutable catalog of available compute capacity.
///
/// The catalog is built once at setup and queried only for capacity bounds.
pub struct ResourceCatalog {
    hosts: Vec<HostSpec>,
}

impl ResourceCatalog {
    /// Validates host specs and creates the catalog.
    ///
    /// Fails if the host list is empty or some host has zero capacity or an
    /// empty processing element list.
    pub fn new(hosts: Vec<HostSpec>) -> Result<Self, ConfigurationError> {
        if hosts.is_empty() {
            return Err(ConfigurationError::EmptyHostList);
        }
        for (id, host) in hosts.iter().enumerate() {
            if host.pe_count == 0 {
                return Err(ConfigurationError::NoProcessingElements { id: id as u32 });
            }
            if host.speed <= 0. {
                return Err(ConfigurationError::InvalidHostSpeed {
                    id: id as u32,
                    speed: host.speed,
                });
            }
        }
        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> &[HostSpec] {
        &self.hosts
    }

    /// Returns the number of hosts.
    pub fn host_count(&self) -> u32 {
        self.hosts.len() as u32
    }

    /// Returns the total processing capacity across all hosts and their
    /// processing elements.
    pub fn total_speed(&self) -> f64 {
        self.hosts.iter().map(|h| h.speed * h.pe_count as f64).sum()
    }
}
