//! Due-date performance indicators (KPIs).
//!
//! Computes tardiness-oriented indicators of a single-machine schedule
//! against the due dates of its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Tardiness (T_j) | max(0, C_j - d_j) |
//! | Total Tardiness | Σ T_j |
//! | Maximum Tardiness | max T_j |
//! | Late Jobs | #{j : T_j > 0} |
//! | On-Time Rate | Fraction with T_j = 0 |
//! | Avg Flow Time | Mean completion time (all releases at 0) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::Serialize;

use crate::models::{Instance, Schedule};

/// Tardiness indicators of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TardinessKpi {
    /// Tardiness per job index (0 for unscheduled jobs).
    pub tardiness: Vec<u32>,
    /// Sum of tardiness.
    pub total_tardiness: u64,
    /// Largest single tardiness.
    pub max_tardiness: u32,
    /// Jobs finishing after their due date.
    pub late_jobs: usize,
    /// `total_tardiness / n` over all jobs of the instance.
    pub average_tardiness: f64,
    /// Fraction of scheduled jobs on time (0.0..1.0).
    pub on_time_rate: f64,
    /// Latest completion time.
    pub makespan: u32,
    /// Mean completion time of scheduled jobs.
    pub avg_flow_time: f64,
}

impl TardinessKpi {
    /// Computes KPIs of `schedule` against the due dates of `instance`.
    pub fn calculate(instance: &Instance, schedule: &Schedule) -> Self {
        let mut tardiness = vec![0u32; instance.len()];
        let mut total_tardiness: u64 = 0;
        let mut max_tardiness: u32 = 0;
        let mut late_jobs: usize = 0;
        let mut total_flow_time: f64 = 0.0;
        let mut counted_jobs: usize = 0;

        for job in instance.jobs() {
            if let Some(completion) = schedule.completion_time(job.id) {
                counted_jobs += 1;
                total_flow_time += f64::from(completion);

                let late = completion.saturating_sub(job.due_date);
                if late > 0 {
                    late_jobs += 1;
                    total_tardiness += u64::from(late);
                    max_tardiness = max_tardiness.max(late);
                }
                tardiness[job.id] = late;
            }
        }

        let average_tardiness = if instance.is_empty() {
            0.0
        } else {
            total_tardiness as f64 / instance.len() as f64
        };

        let (on_time_rate, avg_flow_time) = if counted_jobs == 0 {
            (1.0, 0.0)
        } else {
            (
                (counted_jobs - late_jobs) as f64 / counted_jobs as f64,
                total_flow_time / counted_jobs as f64,
            )
        };

        Self {
            tardiness,
            total_tardiness,
            max_tardiness,
            late_jobs,
            average_tardiness,
            on_time_rate,
            makespan: schedule.makespan(),
            avg_flow_time,
        }
    }

    /// Whether the schedule stays within the given tardiness limits.
    pub fn meets_thresholds(&self, max_tardiness: u32, max_late_jobs: usize) -> bool {
        self.max_tardiness <= max_tardiness && self.late_jobs <= max_late_jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSlot;

    fn sample() -> (Instance, Schedule) {
        let instance = Instance::new(&[17, 15, 12], &[28, 29, 11]).unwrap();
        // order 2, 0, 1 -> completions 12, 29, 44
        let schedule = Schedule::from_start_times(&instance, &[12, 29, 0]);
        (instance, schedule)
    }

    #[test]
    fn test_kpi_tardiness() {
        let (instance, schedule) = sample();
        let kpi = TardinessKpi::calculate(&instance, &schedule);
        assert_eq!(kpi.tardiness, vec![1, 15, 1]);
        assert_eq!(kpi.total_tardiness, 17);
        assert_eq!(kpi.max_tardiness, 15);
        assert_eq!(kpi.late_jobs, 3);
        assert!((kpi.average_tardiness - 17.0 / 3.0).abs() < 1e-10);
        assert!((kpi.on_time_rate - 0.0).abs() < 1e-10);
        assert_eq!(kpi.makespan, 44);
    }

    #[test]
    fn test_kpi_on_time() {
        let instance = Instance::new(&[2, 3], &[5, 5]).unwrap();
        let schedule = Schedule::from_start_times(&instance, &[0, 2]);
        let kpi = TardinessKpi::calculate(&instance, &schedule);
        assert_eq!(kpi.total_tardiness, 0);
        assert_eq!(kpi.late_jobs, 0);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
        // (2 + 5) / 2
        assert!((kpi.avg_flow_time - 3.5).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_partial_schedule() {
        let instance = Instance::new(&[2, 3], &[1, 5]).unwrap();
        let mut schedule = Schedule::new();
        schedule.add_slot(JobSlot::new(0, 0, 2));
        let kpi = TardinessKpi::calculate(&instance, &schedule);
        assert_eq!(kpi.tardiness, vec![1, 0]);
        assert!((kpi.average_tardiness - 0.5).abs() < 1e-10);
        assert!((kpi.on_time_rate - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty_schedule() {
        let instance = Instance::new(&[4], &[0]).unwrap();
        let kpi = TardinessKpi::calculate(&instance, &Schedule::new());
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.total_tardiness, 0);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let (instance, schedule) = sample();
        let kpi = TardinessKpi::calculate(&instance, &schedule);
        assert!(kpi.meets_thresholds(15, 3));
        assert!(!kpi.meets_thresholds(14, 3));
        assert!(!kpi.meets_thresholds(20, 2));
    }
}
