//! Schedule evaluation.
//!
//! # KPI
//!
//! `TardinessKpi` computes due-date metrics of a single-machine schedule:
//! per-job and total tardiness, late jobs, on-time rate, makespan and flow
//! time.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;

pub use kpi::TardinessKpi;
