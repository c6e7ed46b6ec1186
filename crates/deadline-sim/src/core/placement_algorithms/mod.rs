//! Task placement algorithms.

pub mod least_finish_time;
pub mod round_robin;
