//! Time-indexed MILP scheduling for the U-Engine ecosystem.
//!
//! Formulates single-machine total-tardiness scheduling (`1 || ΣT_j`) as a
//! time-indexed binary program, generates TF/RDD benchmark instances, and
//! solves through a pluggable MILP oracle. Two small 0/1 models (knapsack,
//! two-option assignment) share the same oracle seam.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Instance`, `Scenario`, `Schedule`
//! - **`generator`**: Seeded TF/RDD instance generation
//! - **`milp`**: Backend-neutral `BinaryProgram`, `MilpOracle` trait, `microlp` backend
//! - **`timeindexed`**: Time-indexed model builder, solve and decode
//! - **`scheduler`**: Tardiness KPIs
//! - **`validation`**: Feasibility checks of decoded schedules
//! - **`dispatching`**: SPT / EDD / MST baselines
//! - **`runner`**: Per-scenario driver and report lines
//! - **`problems`**: Knapsack and two-option assignment
//! - **`input`**: Whitespace-separated problem input parsers
//!
//! # Architecture
//!
//! The crate never implements branch-and-bound itself. Every model is
//! handed to a `MilpOracle`; outcomes (optimal, time limit, infeasible)
//! are reported as statuses rather than errors.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Sousa & Wolsey (1992), "A time indexed formulation of non-preemptive
//!   single machine scheduling problems"
//! - Hall & Posner (2001), "Generating Experimental Data for Computational
//!   Testing with Machine Scheduling Applications"

pub mod dispatching;
pub mod error;
pub mod generator;
pub mod input;
pub mod milp;
pub mod models;
pub mod problems;
pub mod runner;
pub mod scheduler;
pub mod timeindexed;
pub mod validation;

pub use error::{InputError, ScheduleError, ScheduleResult};
