//! Dispatching rules for single-machine baselines.
//!
//! A rule scores every job once; jobs are then sequenced back to back
//! from time 0 in order of increasing score. The resulting schedule has no
//! idle time, so its total tardiness is an upper bound on the optimum of
//! the time-indexed model.
//!
//! # Usage
//!
//! ```
//! use u_tardiness::dispatching::{dispatch, Edd};
//! use u_tardiness::models::Instance;
//!
//! let instance = Instance::new(&[4, 2, 3], &[9, 2, 5]).unwrap();
//! let schedule = dispatch(&instance, &Edd);
//! assert_eq!(schedule.sequence(), vec![1, 2, 0]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::fmt::Debug;

use crate::models::{Instance, Job, JobSlot, Schedule};

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Ties keep the input order.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a job.
    fn evaluate(&self, job: &Job) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Jobs in index order.
#[derive(Debug, Clone, Copy)]
pub struct InputOrder;

impl DispatchingRule for InputOrder {
    fn name(&self) -> &'static str {
        "INPUT"
    }

    fn evaluate(&self, job: &Job) -> RuleScore {
        job.id as f64
    }

    fn description(&self) -> &'static str {
        "Input Order"
    }
}

/// Shortest Processing Time.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, job: &Job) -> RuleScore {
        f64::from(job.processing_time)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Earliest Due Date.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, job: &Job) -> RuleScore {
        f64::from(job.due_date)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

/// Minimum Slack Time.
///
/// Slack at time 0 is `d_j - p_j`.
#[derive(Debug, Clone, Copy)]
pub struct Mst;

impl DispatchingRule for Mst {
    fn name(&self) -> &'static str {
        "MST"
    }

    fn evaluate(&self, job: &Job) -> RuleScore {
        f64::from(job.due_date) - f64::from(job.processing_time)
    }

    fn description(&self) -> &'static str {
        "Minimum Slack Time"
    }
}

/// Sequences all jobs by `rule` without idle time.
pub fn dispatch<R: DispatchingRule + ?Sized>(instance: &Instance, rule: &R) -> Schedule {
    let mut order: Vec<(RuleScore, &Job)> = instance
        .jobs()
        .iter()
        .map(|job| (rule.evaluate(job), job))
        .collect();
    // stable: equal scores keep index order
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut schedule = Schedule::new();
    let mut time = 0u32;
    for (_, job) in order {
        let end = time + job.processing_time;
        schedule.add_slot(JobSlot::new(job.id, time, end));
        time = end;
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TardinessKpi;
    use crate::validation::validate_schedule;

    fn instance() -> Instance {
        Instance::new(&[17, 15, 12], &[28, 29, 11]).unwrap()
    }

    #[test]
    fn test_input_order() {
        let inst = instance();
        let schedule = dispatch(&inst, &InputOrder);
        assert_eq!(schedule.sequence(), vec![0, 1, 2]);
        assert_eq!(schedule.start_times(3), vec![Some(0), Some(17), Some(32)]);
        assert_eq!(TardinessKpi::calculate(&inst, &schedule).total_tardiness, 36);
    }

    #[test]
    fn test_spt() {
        let schedule = dispatch(&instance(), &Spt);
        assert_eq!(schedule.sequence(), vec![2, 1, 0]);
    }

    #[test]
    fn test_edd() {
        let inst = instance();
        let schedule = dispatch(&inst, &Edd);
        assert_eq!(schedule.sequence(), vec![2, 0, 1]);
        assert_eq!(TardinessKpi::calculate(&inst, &schedule).total_tardiness, 17);
    }

    #[test]
    fn test_mst() {
        // slack: 11, 14, -1
        let schedule = dispatch(&instance(), &Mst);
        assert_eq!(schedule.sequence(), vec![2, 0, 1]);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let inst = Instance::new(&[2, 2, 2], &[5, 3, 5]).unwrap();
        assert_eq!(dispatch(&inst, &Spt).sequence(), vec![0, 1, 2]);
        assert_eq!(dispatch(&inst, &Edd).sequence(), vec![1, 0, 2]);
    }

    #[test]
    fn test_dispatched_schedules_are_feasible() {
        let inst = instance();
        let rules: [&dyn DispatchingRule; 4] = [&InputOrder, &Spt, &Edd, &Mst];
        for rule in rules {
            let schedule = dispatch(&inst, rule);
            assert!(validate_schedule(&inst, &schedule).is_ok(), "{}", rule.name());
            assert_eq!(schedule.makespan(), inst.horizon());
        }
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(Spt.name(), "SPT");
        assert_eq!(Edd.description(), "Earliest Due Date");
        assert_eq!(InputOrder.name(), "INPUT");
    }
}
