//! Time-indexed ILP for single-machine total tardiness.
//!
//! Builds the discrete-time formulation of `1 || ΣT_j` as a
//! [`BinaryProgram`], hands it to a [`MilpOracle`] and decodes the returned
//! assignment into a [`Schedule`].
//!
//! # Formulation
//! With horizon `H = Σp`, binary `y[j,t] = 1` iff job `j` starts at `t`,
//! `t ∈ [0, H - p_j]`:
//!
//! ```text
//! min  Σ_j Σ_t max(0, t + p_j - d_j) · y[j,t]
//! s.t. Σ_t y[j,t] = 1                                        ∀ j
//!      Σ_j Σ_{t = max(0, θ-p_j+1)}^{min(θ, H-p_j)} y[j,t] ≤ 1  ∀ θ ∈ [0, H)
//! ```
//!
//! Variables are stored densely: `index(j, t) = offset[j] + t` with
//! `offset[j] = Σ_{k<j} (H - p_k + 1)`.
//!
//! # Reference
//! - Sousa & Wolsey (1992), "A time indexed formulation of non-preemptive
//!   single machine scheduling problems"
//! - Keha, Khowala & Fowler (2009), "Mixed integer programming formulations
//!   for single machine scheduling problems"

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::milp::{
    selected, BinaryProgram, LinearConstraint, MilpOracle, OracleOutcome, OracleParams, Sense,
    SolveStatus,
};
use crate::models::{Instance, Schedule};
use crate::scheduler::TardinessKpi;

/// Solver settings of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Wall-clock limit in seconds.
    pub time_limit: f64,
    /// Relative MIP gap.
    pub mip_gap: f64,
    /// Surface solver progress.
    pub verbose: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_limit: 300.0,
            mip_gap: 0.0,
            verbose: false,
        }
    }
}

impl SolveConfig {
    /// Sets the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Sets the relative MIP gap.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = gap;
        self
    }

    /// Enables solver progress output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl From<SolveConfig> for OracleParams {
    fn from(config: SolveConfig) -> Self {
        OracleParams {
            time_limit: config.time_limit,
            mip_gap: config.mip_gap,
            verbose: config.verbose,
        }
    }
}

/// Decoded start times and tardiness figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedSchedule {
    /// Start time per job index.
    pub start_times: Vec<u32>,
    /// Tardiness per job index.
    pub tardiness: Vec<u32>,
    pub total_tardiness: u64,
    pub max_tardiness: u32,
    /// Jobs with positive tardiness.
    pub late_count: usize,
    /// `total_tardiness / n`.
    pub average_tardiness: f64,
    pub makespan: u32,
    pub schedule: Schedule,
}

/// Result of one time-indexed solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionSummary {
    pub status: SolveStatus,
    /// Oracle objective; `None` when no feasible assignment was returned.
    pub objective: Option<f64>,
    /// Decoded schedule; `None` together with `objective`.
    pub schedule: Option<DecodedSchedule>,
}

impl SolutionSummary {
    /// Whether an assignment was decoded.
    pub fn has_solution(&self) -> bool {
        self.schedule.is_some()
    }

    /// Number of late jobs.
    pub fn late_count(&self) -> Option<usize> {
        self.schedule.as_ref().map(|s| s.late_count)
    }

    /// Mean tardiness over all jobs.
    pub fn average_tardiness(&self) -> Option<f64> {
        self.schedule.as_ref().map(|s| s.average_tardiness)
    }

    /// Start time per job index.
    pub fn start_times(&self) -> Option<&[u32]> {
        self.schedule.as_ref().map(|s| s.start_times.as_slice())
    }
}

/// Time-indexed model of one instance.
///
/// # Example
/// ```no_run
/// use u_tardiness::milp::MicroLpOracle;
/// use u_tardiness::models::Instance;
/// use u_tardiness::timeindexed::{SolveConfig, TimeIndexedModel};
///
/// let instance = Instance::new(&[3, 2], &[2, 4]).unwrap();
/// let model = TimeIndexedModel::new(&instance);
/// let summary = model.solve(&MicroLpOracle::new(), &SolveConfig::default()).unwrap();
/// assert_eq!(summary.start_times(), Some(&[0, 3][..]));
/// ```
#[derive(Debug, Clone)]
pub struct TimeIndexedModel<'a> {
    instance: &'a Instance,
    offsets: Vec<usize>,
    num_vars: usize,
}

impl<'a> TimeIndexedModel<'a> {
    /// Lays out the variables of `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        let horizon = instance.horizon();
        let mut offsets = Vec::with_capacity(instance.len());
        let mut next = 0usize;
        for job in instance.jobs() {
            offsets.push(next);
            next += (horizon - job.processing_time) as usize + 1;
        }
        Self {
            instance,
            offsets,
            num_vars: next,
        }
    }

    /// The modelled instance.
    pub fn instance(&self) -> &Instance {
        self.instance
    }

    /// Total number of start variables.
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of admissible start times of job `j` (`H - p_j + 1`).
    pub fn num_start_times(&self, j: usize) -> usize {
        let p = self.instance.jobs()[j].processing_time;
        (self.instance.horizon() - p) as usize + 1
    }

    /// Dense index of `y[j,t]`.
    #[inline]
    pub fn var_index(&self, j: usize, t: u32) -> usize {
        self.offsets[j] + t as usize
    }

    /// Encodes the program: objective, assignment rows, then exclusivity rows.
    pub fn program(&self) -> BinaryProgram {
        let horizon = self.instance.horizon();
        let mut objective = Vec::with_capacity(self.num_vars);
        for job in self.instance.jobs() {
            objective.extend(
                (0..=job.latest_start(horizon)).map(|t| f64::from(job.tardiness_at(t))),
            );
        }
        let mut program = BinaryProgram::with_objective(Sense::Minimize, objective);

        // Each job starts exactly once
        for (j, job) in self.instance.jobs().iter().enumerate() {
            program.add_constraint(LinearConstraint::sum_eq(
                (0..=job.latest_start(horizon)).map(|t| self.var_index(j, t)),
                1.0,
            ));
        }

        // At most one job occupies each unit slot [θ, θ+1)
        for theta in 0..horizon {
            let mut vars = Vec::new();
            for (j, job) in self.instance.jobs().iter().enumerate() {
                let lo = (theta + 1).saturating_sub(job.processing_time);
                let hi = theta.min(job.latest_start(horizon));
                if lo <= hi {
                    vars.extend((lo..=hi).map(|t| self.var_index(j, t)));
                }
            }
            program.add_constraint(LinearConstraint::sum_le(vars, 1.0));
        }

        debug!(
            "time-indexed model: {} jobs, H={}, {} binaries, {} rows",
            self.instance.len(),
            horizon,
            program.num_vars(),
            program.num_constraints()
        );
        program
    }

    /// Builds, solves and decodes.
    ///
    /// # Errors
    /// `InvalidConfiguration` for bad solver settings (checked before the
    /// model is built), `Oracle` for backend failures and
    /// `InconsistentAssignment` for a malformed oracle answer.
    pub fn solve<O: MilpOracle>(
        &self,
        oracle: &O,
        config: &SolveConfig,
    ) -> ScheduleResult<SolutionSummary> {
        let params = OracleParams::from(*config);
        params.validate()?;

        let program = self.program();
        let outcome = oracle.solve(&program, &params)?;
        self.decode(&outcome)
    }

    /// Decodes an oracle outcome into a summary.
    ///
    /// # Errors
    /// `InconsistentAssignment` if a job has no start or several starts
    /// valued above 0.5, or the value vector has the wrong length.
    pub fn decode(&self, outcome: &OracleOutcome) -> ScheduleResult<SolutionSummary> {
        let Some(values) = outcome.values.as_deref() else {
            return Ok(SolutionSummary {
                status: outcome.status,
                objective: None,
                schedule: None,
            });
        };
        if values.len() != self.num_vars {
            return Err(ScheduleError::InconsistentAssignment(format!(
                "expected {} values, oracle returned {}",
                self.num_vars,
                values.len()
            )));
        }

        let mut start_times = Vec::with_capacity(self.instance.len());
        for j in 0..self.instance.len() {
            let lo = self.offsets[j];
            let window = &values[lo..lo + self.num_start_times(j)];
            let mut starts = selected(window);
            let start = match (starts.next(), starts.next()) {
                (Some(t), None) => t as u32,
                (None, _) => {
                    return Err(ScheduleError::InconsistentAssignment(format!(
                        "job {j} has no start time"
                    )));
                }
                (Some(a), Some(b)) => {
                    return Err(ScheduleError::InconsistentAssignment(format!(
                        "job {j} starts at both {a} and {b}"
                    )));
                }
            };
            start_times.push(start);
        }

        let schedule = Schedule::from_start_times(self.instance, &start_times);
        let kpi = TardinessKpi::calculate(self.instance, &schedule);
        debug!(
            "decoded: ΣT={} late={}/{} makespan={}",
            kpi.total_tardiness,
            kpi.late_jobs,
            self.instance.len(),
            kpi.makespan
        );

        Ok(SolutionSummary {
            status: outcome.status,
            objective: outcome.objective,
            schedule: Some(DecodedSchedule {
                start_times,
                tardiness: kpi.tardiness,
                total_tardiness: kpi.total_tardiness,
                max_tardiness: kpi.max_tardiness,
                late_count: kpi.late_jobs,
                average_tardiness: kpi.average_tardiness,
                makespan: kpi.makespan,
                schedule,
            }),
        })
    }
}

/// Solves `instance` with `oracle`.
///
/// # Errors
/// See [`TimeIndexedModel::solve`].
pub fn solve<O: MilpOracle>(
    instance: &Instance,
    config: &SolveConfig,
    oracle: &O,
) -> ScheduleResult<SolutionSummary> {
    TimeIndexedModel::new(instance).solve(oracle, config)
}

/// Solves the instance given by processing times and due dates.
///
/// Inputs and solver settings are validated before any model is built.
///
/// # Errors
/// `InvalidSize` for an empty job list, `InvalidConfiguration` for
/// mismatched lengths, zero processing times or bad solver settings, plus
/// the errors of [`TimeIndexedModel::solve`].
pub fn solve_total_tardiness<O: MilpOracle>(
    processing_times: &[u32],
    due_dates: &[u32],
    config: &SolveConfig,
    oracle: &O,
) -> ScheduleResult<SolutionSummary> {
    OracleParams::from(*config).validate()?;
    let instance = Instance::new(processing_times, due_dates)?;
    solve(&instance, config, oracle)
}
