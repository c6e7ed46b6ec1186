//! Deadline compliance evaluation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::cloudlet::Cloudlet;
use crate::core::common::{TaskResult, TaskStatus};

/// Per-task deadline verdict.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub task_id: u32,
    pub vm_id: Option<u32>,
    pub status: TaskStatus,
    pub deadline: f64,
    pub finish_time: Option<f64>,
    pub met_deadline: bool,
}

/// Classifies each task result against the task deadline.
///
/// A task meets its deadline iff it completed and its finish time does not
/// exceed the deadline (finishing exactly at the deadline counts as met).
/// Rejected and unassigned tasks never meet it. Pure function: results come
/// out in the same order they came in.
pub fn evaluate(results: &[TaskResult], tasks_by_id: &BTreeMap<u32, Cloudlet>) -> Vec<Verdict> {
    results
        .iter()
        .map(|result| {
            let deadline = tasks_by_id.get(&result.task_id).map_or(0., |c| c.deadline);
            let met_deadline = result.status == TaskStatus::Completed
                && result.finish_time.map_or(false, |finish| finish <= deadline);
            Verdict {
                task_id: result.task_id,
                vm_id: result.vm_id,
                status: result.status,
                deadline,
                finish_time: result.finish_time,
                met_deadline,
            }
        })
        .collect()
}
