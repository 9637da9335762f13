//! Two-option assignment as a binary program.
//!
//! Every task is done either with option A (`a_i` time units) or option B
//! (`b_i` time units):
//!
//! ```text
//! min  Σ a_i · x_i + b_i · y_i
//! s.t. x_i + y_i = 1,   x_i, y_i ∈ {0, 1}
//! ```
//!
//! Variables are laid out as `x_i = 2i`, `y_i = 2i + 1`.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::milp::{BinaryProgram, LinearConstraint, MilpOracle, OracleParams, Sense, SolveStatus};

/// A task with two alternative durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoOptionTask {
    pub time_a: u32,
    pub time_b: u32,
}

impl TwoOptionTask {
    /// Creates a task.
    pub fn new(time_a: u32, time_b: u32) -> Self {
        Self { time_a, time_b }
    }

    /// Duration under `choice`.
    pub fn time(&self, choice: Choice) -> u32 {
        match choice {
            Choice::A => self.time_a,
            Choice::B => self.time_b,
        }
    }
}

/// Option picked for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Choice::A => "A",
            Choice::B => "B",
        })
    }
}

/// Result of an assignment solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSolution {
    pub status: SolveStatus,
    /// Oracle objective; `None` without a solution.
    pub objective: Option<f64>,
    /// Choice per task; empty without a solution.
    pub choices: Vec<Choice>,
    /// Total time of the chosen options.
    pub total_time: u64,
}

/// Builds the assignment program.
pub fn two_option_program(tasks: &[TwoOptionTask]) -> BinaryProgram {
    let objective = tasks
        .iter()
        .flat_map(|task| [f64::from(task.time_a), f64::from(task.time_b)])
        .collect();
    let mut program = BinaryProgram::with_objective(Sense::Minimize, objective);
    for i in 0..tasks.len() {
        program.add_constraint(LinearConstraint::sum_eq([2 * i, 2 * i + 1], 1.0));
    }
    program
}

/// Picks one option per task minimizing the total time.
///
/// An empty task list is trivially optimal and never reaches the oracle.
///
/// # Errors
/// `InvalidConfiguration` for bad parameters, `Oracle` for backend failures,
/// `InconsistentAssignment` if a task gets both or neither option.
pub fn solve_two_option<O: MilpOracle>(
    tasks: &[TwoOptionTask],
    params: &OracleParams,
    oracle: &O,
) -> ScheduleResult<AssignmentSolution> {
    params.validate()?;
    if tasks.is_empty() {
        return Ok(AssignmentSolution {
            status: SolveStatus::Optimal,
            objective: Some(0.0),
            choices: Vec::new(),
            total_time: 0,
        });
    }

    let program = two_option_program(tasks);
    let outcome = oracle.solve(&program, params)?;
    let Some(values) = outcome.values.as_deref() else {
        return Ok(AssignmentSolution {
            status: outcome.status,
            objective: None,
            choices: Vec::new(),
            total_time: 0,
        });
    };
    if values.len() != program.num_vars() {
        return Err(ScheduleError::InconsistentAssignment(format!(
            "expected {} values, oracle returned {}",
            program.num_vars(),
            values.len()
        )));
    }

    let mut choices = Vec::with_capacity(tasks.len());
    for (i, pair) in values.chunks_exact(2).enumerate() {
        let choice = match (pair[0] > 0.5, pair[1] > 0.5) {
            (true, false) => Choice::A,
            (false, true) => Choice::B,
            _ => {
                return Err(ScheduleError::InconsistentAssignment(format!(
                    "task {i} must take exactly one option"
                )));
            }
        };
        choices.push(choice);
    }

    let total_time = tasks
        .iter()
        .zip(&choices)
        .map(|(task, &choice)| u64::from(task.time(choice)))
        .sum();
    debug!("assignment: {} tasks, total time {}", tasks.len(), total_time);

    Ok(AssignmentSolution {
        status: outcome.status,
        objective: outcome.objective,
        choices,
        total_time,
    })
}
