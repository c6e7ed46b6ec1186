use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Terminal status of a submitted task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Completed,
    Rejected,
    Unassigned,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Rejected => write!(f, "rejected"),
            TaskStatus::Unassigned => write!(f, "unassigned"),
        }
    }
}

/// Binding of one task to one VM, produced by the scheduler and consumed by
/// the simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub task_id: u32,
    pub vm_id: u32,
}

/// Execution outcome of a single task.
///
/// Rejected and unassigned tasks carry no VM and no times.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskResult {
    pub task_id: u32,
    pub vm_id: Option<u32>,
    pub start_time: Option<f64>,
    pub finish_time: Option<f64>,
    pub status: TaskStatus,
}
