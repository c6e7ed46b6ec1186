//! Time-shared execution of task-to-VM assignments.

use std::collections::BTreeMap;

use crate::core::cloudlet::CloudletQueue;
use crate::core::common::{Assignment, TaskResult, TaskStatus};
use crate::core::logger::Logger;
use crate::core::time_shared::FairShareModel;
use crate::core::vm::VmPool;

/// Computes actual start and finish times for the fixed assignment set.
///
/// All tasks are ready at time zero, so start time equals zero for every
/// assigned task. Tasks bound to the same VM share its speed rating equally
/// via [`FairShareModel`], which makes actual finish times generally later
/// than the sequential estimates used during placement. The computation is a
/// closed form per VM with no randomness, so identical inputs always produce
/// identical results.
pub struct SimulationEngine;

impl SimulationEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// Runs the assignments and returns one result per submitted task,
    /// including rejected and unassigned ones, in submission order.
    pub fn run(
        &self,
        pool: &VmPool,
        queue: &CloudletQueue,
        assignments: &[Assignment],
        logger: &mut dyn Logger,
    ) -> Vec<TaskResult> {
        let mut tasks_by_vm: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for assignment in assignments {
            tasks_by_vm.entry(assignment.vm_id).or_default().push(assignment.task_id);
        }

        let mut finish_times: BTreeMap<u32, (u32, f64)> = BTreeMap::new();
        for (vm_id, task_ids) in &tasks_by_vm {
            let vm = match pool.get(*vm_id) {
                Some(vm) => vm,
                None => continue,
            };
            let mut model = FairShareModel::new(vm.speed);
            for task_id in task_ids {
                if let Some(cloudlet) = queue.get(*task_id) {
                    model.insert(0., cloudlet.length as f64, *task_id);
                }
            }
            while let Some((finish_time, task_id)) = model.pop() {
                logger.log_debug(
                    finish_time,
                    "engine",
                    format!("task {} finished on vm {}", task_id, vm_id),
                );
                finish_times.insert(task_id, (*vm_id, finish_time));
            }
        }

        queue
            .submitted()
            .iter()
            .map(|cloudlet| {
                if queue.is_rejected(cloudlet.id) {
                    TaskResult {
                        task_id: cloudlet.id,
                        vm_id: None,
                        start_time: None,
                        finish_time: None,
                        status: TaskStatus::Rejected,
                    }
                } else if let Some((vm_id, finish_time)) = finish_times.get(&cloudlet.id) {
                    TaskResult {
                        task_id: cloudlet.id,
                        vm_id: Some(*vm_id),
                        start_time: Some(0.),
                        finish_time: Some(*finish_time),
                        status: TaskStatus::Completed,
                    }
                } else {
                    TaskResult {
                        task_id: cloudlet.id,
                        vm_id: None,
                        start_time: None,
                        finish_time: None,
                        status: TaskStatus::Unassigned,
                    }
                }
            })
            .collect()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
