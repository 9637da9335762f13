//! Backend-neutral binary integer programs and the solver oracle seam.
//!
//! Model builders in this crate describe their formulation as a
//! [`BinaryProgram`]: dense variable indices, a linear objective and sparse
//! linear rows. Any [`MilpOracle`] implementation can solve it. The crate
//! ships [`MicroLpOracle`], backed by the pure-Rust `microlp` engine.
//!
//! Oracle outcomes (optimal, time limit, infeasible, unbounded) are not
//! errors: they are reported in [`OracleOutcome::status`].

mod micro_lp;

pub use micro_lp::MicroLpOracle;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Row relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
}

/// A sparse linear row over binary variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    /// `(variable index, coefficient)` pairs; each variable at most once.
    pub terms: Vec<(usize, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates a row.
    pub fn new(terms: Vec<(usize, f64)>, relation: Relation, rhs: f64) -> Self {
        Self {
            terms,
            relation,
            rhs,
        }
    }

    /// Sum of the given variables equals `rhs`.
    pub fn sum_eq(vars: impl IntoIterator<Item = usize>, rhs: f64) -> Self {
        Self::new(vars.into_iter().map(|v| (v, 1.0)).collect(), Relation::Eq, rhs)
    }

    /// Sum of the given variables is at most `rhs`.
    pub fn sum_le(vars: impl IntoIterator<Item = usize>, rhs: f64) -> Self {
        Self::new(vars.into_iter().map(|v| (v, 1.0)).collect(), Relation::Le, rhs)
    }

    /// Left-hand side value under `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, c)| values[v] * c).sum()
    }

    /// Whether `values` satisfies the row within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(values);
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs() <= tol,
            Relation::Le => lhs <= self.rhs + tol,
            Relation::Ge => lhs >= self.rhs - tol,
        }
    }
}

/// A pure binary integer program.
///
/// Variable `i` is binary with objective coefficient `objective[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryProgram {
    pub sense: Sense,
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    /// Creates a program with `num_vars` binaries and a zero objective.
    pub fn new(sense: Sense, num_vars: usize) -> Self {
        Self {
            sense,
            objective: vec![0.0; num_vars],
            constraints: Vec::new(),
        }
    }

    /// Creates a program from objective coefficients.
    pub fn with_objective(sense: Sense, objective: Vec<f64>) -> Self {
        Self {
            sense,
            objective,
            constraints: Vec::new(),
        }
    }

    /// Adds a row. Empty rows are skipped.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        if !constraint.terms.is_empty() {
            self.constraints.push(constraint);
        }
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of rows.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value under `values`.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, v)| c * v).sum()
    }

    /// Whether `values` satisfies every row within `tol`.
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.num_vars()
            && self.constraints.iter().all(|c| c.is_satisfied(values, tol))
    }
}

/// Solver parameters passed through to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Wall-clock limit in seconds (> 0).
    pub time_limit: f64,
    /// Relative optimality gap tolerance in `[0, 1]`.
    pub mip_gap: f64,
    /// Surface solver progress.
    pub verbose: bool,
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            time_limit: 300.0,
            mip_gap: 0.0,
            verbose: false,
        }
    }
}

impl OracleParams {
    /// Checks the time limit and gap.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a non-positive or non-finite time limit,
    /// or a gap outside `[0, 1]`.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.time_limit.is_finite() && self.time_limit > 0.0) {
            return Err(ScheduleError::config(format!(
                "time limit must be positive, got {}",
                self.time_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.mip_gap) {
            return Err(ScheduleError::config(format!(
                "mip gap must lie in [0, 1], got {}",
                self.mip_gap
            )));
        }
        Ok(())
    }
}

/// Status reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal (within the gap).
    Optimal,
    /// Stopped at the time limit; an incumbent may or may not exist.
    TimeLimit,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::TimeLimit => "time_limit",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
        })
    }
}

/// Raw oracle result.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleOutcome {
    pub status: SolveStatus,
    /// Objective of the returned assignment, if any.
    pub objective: Option<f64>,
    /// Value per variable, if an assignment was found.
    pub values: Option<Vec<f64>>,
}

impl OracleOutcome {
    /// An outcome carrying an assignment.
    pub fn solved(status: SolveStatus, objective: f64, values: Vec<f64>) -> Self {
        Self {
            status,
            objective: Some(objective),
            values: Some(values),
        }
    }

    /// An outcome without any assignment.
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            objective: None,
            values: None,
        }
    }

    /// Number of assignments returned (0 or 1).
    pub fn solution_count(&self) -> usize {
        usize::from(self.values.is_some())
    }
}

/// A MILP engine able to solve [`BinaryProgram`]s.
pub trait MilpOracle {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Solves `program` under `params`.
    ///
    /// # Errors
    /// `InvalidConfiguration` for bad parameters, `Oracle` for backend failures.
    fn solve(
        &self,
        program: &BinaryProgram,
        params: &OracleParams,
    ) -> ScheduleResult<OracleOutcome>;
}

impl<O: MilpOracle + ?Sized> MilpOracle for &O {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(
        &self,
        program: &BinaryProgram,
        params: &OracleParams,
    ) -> ScheduleResult<OracleOutcome> {
        (**self).solve(program, params)
    }
}

/// Picks the indices whose value exceeds 0.5.
pub fn selected(values: &[f64]) -> impl Iterator<Item = usize> + '_ {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0.5)
        .map(|(i, _)| i)
}
