//! Schedule (solution) model.
//!
//! A schedule places every job of an instance on the single machine as a
//! `[start, end)` slot. Schedules come from the solver decoder or from a
//! dispatching rule.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::Instance;

/// A job placed on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSlot {
    /// Job index.
    pub job: usize,
    /// Start time.
    pub start: u32,
    /// Completion time (start + processing time).
    pub end: u32,
}

impl JobSlot {
    /// Creates a new slot.
    pub fn new(job: usize, start: u32, end: u32) -> Self {
        Self { job, start, end }
    }

    /// Slot length.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the two `[start, end)` intervals share a time unit.
    #[inline]
    pub fn overlaps(&self, other: &JobSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A single-machine schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Slots, one per scheduled job, in the order they were added.
    pub slots: Vec<JobSlot>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from per-job start times (index `j` holds the start
    /// of job `j`).
    pub fn from_start_times(instance: &Instance, start_times: &[u32]) -> Self {
        let slots = instance
            .jobs()
            .iter()
            .zip(start_times)
            .map(|(job, &start)| JobSlot::new(job.id, start, start + job.processing_time))
            .collect();
        Self { slots }
    }

    /// Adds a slot.
    pub fn add_slot(&mut self, slot: JobSlot) {
        self.slots.push(slot);
    }

    /// Latest completion time.
    pub fn makespan(&self) -> u32 {
        self.slots.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// Finds the slot of a job.
    pub fn slot_for_job(&self, job: usize) -> Option<&JobSlot> {
        self.slots.iter().find(|s| s.job == job)
    }

    /// Completion time of a job.
    pub fn completion_time(&self, job: usize) -> Option<u32> {
        self.slot_for_job(job).map(|s| s.end)
    }

    /// Start times indexed by job, `None` for unscheduled jobs.
    pub fn start_times(&self, job_count: usize) -> Vec<Option<u32>> {
        let mut starts = vec![None; job_count];
        for slot in &self.slots {
            if let Some(entry) = starts.get_mut(slot.job) {
                *entry = Some(slot.start);
            }
        }
        starts
    }

    /// Job indices in order of increasing start time.
    pub fn sequence(&self) -> Vec<usize> {
        let mut slots: Vec<&JobSlot> = self.slots.iter().collect();
        slots.sort_by_key(|s| (s.start, s.job));
        slots.into_iter().map(|s| s.job).collect()
    }

    /// Pairs of job indices whose slots overlap.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut sorted: Vec<&JobSlot> = self.slots.iter().collect();
        sorted.sort_by_key(|s| (s.start, s.end));

        let mut pairs = Vec::new();
        for i in 0..sorted.len() {
            for other in &sorted[i + 1..] {
                if other.start >= sorted[i].end {
                    break;
                }
                if sorted[i].overlaps(other) {
                    pairs.push((sorted[i].job, other.job));
                }
            }
        }
        pairs
    }

    /// Total busy time divided by makespan; `None` for an empty schedule.
    pub fn utilization(&self) -> Option<f64> {
        let makespan = self.makespan();
        if makespan == 0 {
            return None;
        }
        let busy: u64 = self.slots.iter().map(|s| u64::from(s.duration())).sum();
        Some(busy as f64 / f64::from(makespan))
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
