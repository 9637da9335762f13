//! Job and instance models.
//!
//! A job is a single operation on one machine with a processing time and a
//! due date. An instance is the ordered, read-only set of jobs of one run.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// A job to be sequenced on the single machine.
///
/// Times are integer time units relative to t=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Index of the job within its instance.
    pub id: usize,
    /// Processing time (>= 1).
    pub processing_time: u32,
    /// Due date (>= 0).
    pub due_date: u32,
}

impl Job {
    /// Creates a new job.
    pub fn new(id: usize, processing_time: u32, due_date: u32) -> Self {
        Self {
            id,
            processing_time,
            due_date,
        }
    }

    /// Tardiness of the job when started at `start`.
    #[inline]
    pub fn tardiness_at(&self, start: u32) -> u32 {
        (start + self.processing_time).saturating_sub(self.due_date)
    }

    /// Latest feasible start within `horizon`.
    #[inline]
    pub fn latest_start(&self, horizon: u32) -> u32 {
        horizon - self.processing_time
    }
}

/// A single-machine scheduling instance.
///
/// Created once and read-only thereafter. The horizon is the sum of all
/// processing times, a valid upper bound on the makespan of any sequence
/// without idle time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    jobs: Vec<Job>,
    horizon: u32,
}

impl Instance {
    /// Builds an instance from parallel processing-time and due-date vectors.
    ///
    /// # Errors
    /// - `InvalidSize` if there are no jobs.
    /// - `InvalidConfiguration` if the vectors differ in length, a processing
    ///   time is zero, a processing time exceeds the horizon, or the horizon
    ///   overflows.
    pub fn new(processing_times: &[u32], due_dates: &[u32]) -> ScheduleResult<Self> {
        if processing_times.is_empty() {
            return Err(ScheduleError::InvalidSize(0));
        }
        if processing_times.len() != due_dates.len() {
            return Err(ScheduleError::config(format!(
                "{} processing times but {} due dates",
                processing_times.len(),
                due_dates.len()
            )));
        }

        let total: u64 = processing_times.iter().map(|&p| u64::from(p)).sum();
        let horizon = u32::try_from(total)
            .map_err(|_| ScheduleError::config(format!("horizon {total} overflows u32")))?;

        let mut jobs = Vec::with_capacity(processing_times.len());
        for (id, (&p, &d)) in processing_times.iter().zip(due_dates).enumerate() {
            if p == 0 {
                return Err(ScheduleError::config(format!(
                    "job {id} has zero processing time"
                )));
            }
            if p > horizon {
                return Err(ScheduleError::config(format!(
                    "job {id} processing time {p} exceeds horizon {horizon}"
                )));
            }
            jobs.push(Job::new(id, p, d));
        }

        Ok(Self { jobs, horizon })
    }

    /// Jobs in index order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Job by index.
    pub fn job(&self, id: usize) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Always false for a constructed instance; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Discretization horizon `H = Σp`.
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Sum of processing times.
    pub fn total_processing_time(&self) -> u32 {
        self.horizon
    }

    /// Longest processing time.
    pub fn max_processing_time(&self) -> u32 {
        self.jobs
            .iter()
            .map(|j| j.processing_time)
            .max()
            .unwrap_or(0)
    }

    /// Processing times in index order.
    pub fn processing_times(&self) -> Vec<u32> {
        self.jobs.iter().map(|j| j.processing_time).collect()
    }

    /// Due dates in index order.
    pub fn due_dates(&self) -> Vec<u32> {
        self.jobs.iter().map(|j| j.due_date).collect()
    }

    /// Mean due date.
    pub fn mean_due_date(&self) -> f64 {
        let sum: u64 = self.jobs.iter().map(|j| u64::from(j.due_date)).sum();
        sum as f64 / self.jobs.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_horizon() {
        let inst = Instance::new(&[17, 15, 12], &[28, 29, 11]).unwrap();
        assert_eq!(inst.len(), 3);
        assert_eq!(inst.horizon(), 44);
        assert_eq!(inst.max_processing_time(), 17);
        assert!(inst.horizon() >= inst.max_processing_time());
        assert!((inst.mean_due_date() - 68.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_instance_accessors() {
        let inst = Instance::new(&[3, 4], &[5, 1]).unwrap();
        assert_eq!(inst.processing_times(), vec![3, 4]);
        assert_eq!(inst.due_dates(), vec![5, 1]);
        assert_eq!(inst.job(1), Some(&Job::new(1, 4, 1)));
        assert!(inst.job(2).is_none());
    }

    #[test]
    fn test_job_tardiness() {
        let job = Job::new(0, 5, 10);
        assert_eq!(job.tardiness_at(0), 0);
        assert_eq!(job.tardiness_at(5), 0);
        assert_eq!(job.tardiness_at(8), 3);
        assert_eq!(job.latest_start(12), 7);
    }

    #[test]
    fn test_empty_instance() {
        let err = Instance::new(&[], &[]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSize(0)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = Instance::new(&[1, 2], &[3]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_processing_time() {
        let err = Instance::new(&[3, 0], &[3, 3]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_single_job_fills_horizon() {
        let inst = Instance::new(&[5], &[10]).unwrap();
        assert_eq!(inst.horizon(), 5);
        assert_eq!(inst.jobs()[0].latest_start(inst.horizon()), 0);
    }

    #[test]
    fn test_serialize() {
        let inst = Instance::new(&[2], &[1]).unwrap();
        let json = serde_json::to_string(&inst).unwrap();
        assert!(json.contains("\"horizon\":2"));
        assert!(json.contains("\"processing_time\":2"));
    }
}
