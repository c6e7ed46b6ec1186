//! Representations of virtual machines and the VM pool.

use crate::error::ConfigurationError;

/// Default VM memory allocation.
pub const DEFAULT_VM_MEMORY: u64 = 2048;
/// Default VM bandwidth allocation.
pub const DEFAULT_VM_BANDWIDTH: u64 = 1000;
/// Default VM storage allocation.
pub const DEFAULT_VM_STORAGE: u64 = 10000;

/// Represents a virtual machine with a fixed processing speed rating.
///
/// VMs are created once at setup and never destroyed during a run. Execution
/// on a VM is time-shared: concurrently resident tasks split its speed rating
/// equally.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualMachine {
    pub id: u32,
    pub speed: f64,
    pub memory: u64,
    pub bandwidth: u64,
    pub storage: u64,
    /// Id of the scheduling session owning this VM.
    pub session_id: u32,
}

/// Fixed set of VM descriptors with sequential ids `0..n-1`.
pub struct VmPool {
    vms: Vec<VirtualMachine>,
}

impl VmPool {
    /// Creates a pool of `count` identical VMs owned by the given session.
    ///
    /// Fails if `count` is zero or the speed rating is not positive.
    pub fn create(count: u32, speed: f64, session_id: u32) -> Result<Self, ConfigurationError> {
        if count == 0 {
            return Err(ConfigurationError::EmptyVmPool);
        }
        if speed <= 0. {
            return Err(ConfigurationError::InvalidVmSpeed { speed });
        }
        let vms = (0..count)
            .map(|id| VirtualMachine {
                id,
                speed,
                memory: DEFAULT_VM_MEMORY,
                bandwidth: DEFAULT_VM_BANDWIDTH,
                storage: DEFAULT_VM_STORAGE,
                session_id,
            })
            .collect();
        Ok(Self { vms })
    }

    /// Iterates VMs in stable, id-ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, VirtualMachine> {
        self.vms.iter()
    }

    pub fn vms(&self) -> &[VirtualMachine] {
        &self.vms
    }

    pub fn get(&self, id: u32) -> Option<&VirtualMachine> {
        self.vms.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.vms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
}
