//! 0/1 knapsack as a binary program.
//!
//! ```text
//! max  Σ v_i · x_i
//! s.t. Σ w_i · x_i ≤ W,   x_i ∈ {0, 1}
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::milp::{
    selected, BinaryProgram, LinearConstraint, MilpOracle, OracleParams, Relation, Sense,
    SolveStatus,
};

/// An item that can be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnapsackItem {
    pub weight: u32,
    pub value: u32,
}

impl KnapsackItem {
    /// Creates an item.
    pub fn new(weight: u32, value: u32) -> Self {
        Self { weight, value }
    }
}

/// Result of a knapsack solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnapsackSolution {
    pub status: SolveStatus,
    /// Oracle objective; `None` without a solution.
    pub objective: Option<f64>,
    /// Indices of packed items, ascending.
    pub selected: Vec<usize>,
    pub total_weight: u64,
    pub total_value: u64,
}

/// Builds the knapsack program.
pub fn knapsack_program(items: &[KnapsackItem], capacity: u64) -> BinaryProgram {
    let objective = items.iter().map(|item| f64::from(item.value)).collect();
    let mut program = BinaryProgram::with_objective(Sense::Maximize, objective);
    program.add_constraint(LinearConstraint::new(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| (i, f64::from(item.weight)))
            .collect(),
        Relation::Le,
        capacity as f64,
    ));
    program
}

/// Packs the most valuable subset of `items` within `capacity`.
///
/// An empty item list is trivially optimal and never reaches the oracle.
///
/// # Errors
/// `InvalidConfiguration` for bad parameters, `Oracle` for backend failures,
/// `InconsistentAssignment` if the oracle returns the wrong number of values.
pub fn solve_knapsack<O: MilpOracle>(
    items: &[KnapsackItem],
    capacity: u64,
    params: &OracleParams,
    oracle: &O,
) -> ScheduleResult<KnapsackSolution> {
    params.validate()?;
    if items.is_empty() {
        return Ok(KnapsackSolution {
            status: SolveStatus::Optimal,
            objective: Some(0.0),
            selected: Vec::new(),
            total_weight: 0,
            total_value: 0,
        });
    }

    let program = knapsack_program(items, capacity);
    let outcome = oracle.solve(&program, params)?;

    let picked: Vec<usize> = match outcome.values.as_deref() {
        Some(values) if values.len() != program.num_vars() => {
            return Err(ScheduleError::InconsistentAssignment(format!(
                "expected {} values, oracle returned {}",
                program.num_vars(),
                values.len()
            )));
        }
        Some(values) => selected(values).collect(),
        None => Vec::new(),
    };
    let total_weight = picked.iter().map(|&i| u64::from(items[i].weight)).sum();
    let total_value = picked.iter().map(|&i| u64::from(items[i].value)).sum();
    debug!(
        "knapsack: {} of {} items, weight {}/{}, value {}",
        picked.len(),
        items.len(),
        total_weight,
        capacity,
        total_value
    );

    Ok(KnapsackSolution {
        status: outcome.status,
        objective: outcome.objective,
        selected: picked,
        total_weight,
        total_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{MicroLpOracle, OracleOutcome};

    fn items() -> Vec<KnapsackItem> {
        [(6, 13), (4, 8), (3, 6), (5, 12)]
            .into_iter()
            .map(|(w, v)| KnapsackItem::new(w, v))
            .collect()
    }

    fn params() -> OracleParams {
        OracleParams {
            time_limit: 30.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_program_shape() {
        let program = knapsack_program(&items(), 7);
        assert_eq!(program.sense, Sense::Maximize);
        assert_eq!(program.objective, vec![13.0, 8.0, 6.0, 12.0]);
        assert_eq!(program.num_constraints(), 1);
        assert_eq!(program.constraints[0].rhs, 7.0);
    }

    #[test]
    fn test_classic_instance() {
        // capacity 7: {items 1, 2} -> weight 7, value 14
        let solution = solve_knapsack(&items(), 7, &params(), &MicroLpOracle::new()).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.selected, vec![1, 2]);
        assert_eq!(solution.total_weight, 7);
        assert_eq!(solution.total_value, 14);
        assert!((solution.objective.unwrap() - 14.0).abs() < 1e-6);
    }

    #[test]
    fn test_nothing_fits() {
        let solution = solve_knapsack(&items(), 2, &params(), &MicroLpOracle::new()).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(solution.selected.is_empty());
        assert_eq!(solution.total_value, 0);
    }

    #[test]
    fn test_everything_fits() {
        let solution = solve_knapsack(&items(), 100, &params(), &MicroLpOracle::new()).unwrap();
        assert_eq!(solution.selected, vec![0, 1, 2, 3]);
        assert_eq!(solution.total_value, 39);
    }

    #[test]
    fn test_empty_items() {
        let solution = solve_knapsack(&[], 10, &params(), &MicroLpOracle::new()).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(solution.total_value, 0);
    }

    #[test]
    fn test_without_solution() {
        struct Expired;
        impl MilpOracle for Expired {
            fn name(&self) -> &'static str {
                "expired"
            }
            fn solve(&self, _: &BinaryProgram, _: &OracleParams) -> ScheduleResult<OracleOutcome> {
                Ok(OracleOutcome::without_solution(SolveStatus::TimeLimit))
            }
        }

        let solution = solve_knapsack(&items(), 7, &params(), &Expired).unwrap();
        assert_eq!(solution.status, SolveStatus::TimeLimit);
        assert!(solution.objective.is_none());
        assert!(solution.selected.is_empty());
    }

    #[test]
    fn test_value_count_mismatch() {
        struct TooMany;
        impl MilpOracle for TooMany {
            fn name(&self) -> &'static str {
                "too-many"
            }
            fn solve(
                &self,
                program: &BinaryProgram,
                _: &OracleParams,
            ) -> ScheduleResult<OracleOutcome> {
                let values = vec![1.0; program.num_vars() + 2];
                Ok(OracleOutcome::solved(SolveStatus::Optimal, 0.0, values))
            }
        }

        assert!(matches!(
            solve_knapsack(&items(), 7, &params(), &TooMany),
            Err(ScheduleError::InconsistentAssignment(_))
        ));
    }
}
