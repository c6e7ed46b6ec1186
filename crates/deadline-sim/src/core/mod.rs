//! Core components of the deadline-aware placement simulation.

pub mod cloudlet;
pub mod common;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod host;
pub mod logger;
pub mod placement;
pub mod placement_algorithms;
pub mod time_shared;
pub mod vm;
