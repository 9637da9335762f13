//! Feasibility checks for single-machine schedules.
//!
//! Checks a decoded or dispatched schedule against its instance. Detects:
//! - Slots naming jobs outside the instance
//! - Jobs scheduled twice or not at all
//! - Slots whose length differs from the processing time
//! - Slots ending after the horizon
//! - Overlapping slots on the machine
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2.1

use std::collections::HashSet;

use crate::models::{Instance, Schedule};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A slot references a job index outside the instance.
    UnknownJob,
    /// A job has more than one slot.
    DuplicateJob,
    /// A job has no slot.
    MissingStart,
    /// `end - start` differs from the processing time.
    WrongDuration,
    /// A slot ends after the horizon.
    OutsideHorizon,
    /// Two slots share machine time.
    Overlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a schedule against its instance.
///
/// Checks:
/// 1. Every slot names a job of the instance
/// 2. No job is scheduled twice
/// 3. Every job is scheduled
/// 4. Every slot lasts exactly the job's processing time
/// 5. Every slot ends within the horizon `H = Σp`
/// 6. No two slots overlap
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_schedule(instance: &Instance, schedule: &Schedule) -> ValidationResult {
    let mut errors = Vec::new();
    let horizon = instance.horizon();

    let mut seen = HashSet::new();
    for slot in &schedule.slots {
        let Some(job) = instance.job(slot.job) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownJob,
                format!("Slot references unknown job {}", slot.job),
            ));
            continue;
        };

        if !seen.insert(slot.job) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateJob,
                format!("Job {} is scheduled more than once", slot.job),
            ));
        }

        if slot.end < slot.start || slot.end - slot.start != job.processing_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::WrongDuration,
                format!(
                    "Job {} occupies [{}, {}) but needs {}",
                    slot.job, slot.start, slot.end, job.processing_time
                ),
            ));
        }

        if slot.end > horizon {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutsideHorizon,
                format!("Job {} ends at {} after horizon {}", slot.job, slot.end, horizon),
            ));
        }
    }

    for job in instance.jobs() {
        if !seen.contains(&job.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingStart,
                format!("Job {} has no start time", job.id),
            ));
        }
    }

    for (a, b) in schedule.overlapping_pairs() {
        errors.push(ValidationError::new(
            ValidationErrorKind::Overlap,
            format!("Jobs {a} and {b} overlap"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
