//! Binary selection problems on the same oracle.
//!
//! Small 0/1 models that share the [`MilpOracle`](crate::milp::MilpOracle)
//! seam with the time-indexed scheduler:
//!
//! - [`solve_knapsack`]: pack items of maximum value under a weight limit.
//! - [`solve_two_option`]: pick one of two durations per task, minimizing
//!   the total.

mod knapsack;
mod two_option;

pub use knapsack::{knapsack_program, solve_knapsack, KnapsackItem, KnapsackSolution};
pub use two_option::{
    solve_two_option, two_option_program, AssignmentSolution, Choice, TwoOptionTask,
};
