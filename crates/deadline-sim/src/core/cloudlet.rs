//! Cloudlet descriptions and the deadline-ordered submission queue.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::ValidationError;

/// A unit of submitted compute work.
///
/// Every cloudlet carries a deadline, so no downstream component needs to
/// narrow a generic task type at runtime. A cloudlet is immutable once
/// submitted; execution outcomes live in
/// [`TaskResult`](crate::core::common::TaskResult).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cloudlet {
    /// Id unique within a run, in submission order.
    pub id: u32,
    /// Total work in instructions.
    pub length: i64,
    /// Number of processing elements required.
    pub pe_count: u32,
    /// Completion deadline relative to submission.
    pub deadline: f64,
}

/// Ingests cloudlets and produces them ordered earliest-deadline-first.
///
/// Invalid cloudlets (non-positive length, non-positive or NaN deadline) are
/// excluded from the ordered view and reported, they do not fail the batch.
pub struct CloudletQueue {
    submitted: Vec<Cloudlet>,
    rejected: BTreeSet<u32>,
}

impl CloudletQueue {
    /// Accepts a batch of cloudlets, validating each one.
    ///
    /// Returns the queue along with validation errors for rejected cloudlets.
    pub fn submit(cloudlets: Vec<Cloudlet>) -> (Self, Vec<ValidationError>) {
        let mut rejected = BTreeSet::new();
        let mut errors = Vec::new();
        for cloudlet in &cloudlets {
            if cloudlet.length <= 0 {
                errors.push(ValidationError::InvalidLength {
                    id: cloudlet.id,
                    length: cloudlet.length,
                });
                rejected.insert(cloudlet.id);
            } else if !(cloudlet.deadline > 0.) {
                // Rejects NaN deadlines along with non-positive ones.
                errors.push(ValidationError::InvalidDeadline {
                    id: cloudlet.id,
                    deadline: cloudlet.deadline,
                });
                rejected.insert(cloudlet.id);
            }
        }
        (
            Self {
                submitted: cloudlets,
                rejected,
            },
            errors,
        )
    }

    /// Returns accepted cloudlets sorted by ascending deadline.
    ///
    /// Ties are broken by submission order (the sort is stable), which makes
    /// downstream assignment decisions deterministic.
    pub fn ordered_view(&self) -> Vec<&Cloudlet> {
        let mut view: Vec<&Cloudlet> = self.accepted().collect();
        view.sort_by(|a, b| a.deadline.total_cmp(&b.deadline));
        view
    }

    /// Iterates accepted cloudlets in submission order.
    pub fn accepted(&self) -> impl Iterator<Item = &Cloudlet> {
        self.submitted.iter().filter(|c| !self.rejected.contains(&c.id))
    }

    /// Returns all submitted cloudlets, including rejected ones, in
    /// submission order.
    pub fn submitted(&self) -> &[Cloudlet] {
        &self.submitted
    }

    pub fn get(&self, id: u32) -> Option<&Cloudlet> {
        self.submitted.iter().find(|c| c.id == id)
    }

    pub fn is_rejected(&self, id: u32) -> bool {
        self.rejected.contains(&id)
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}
