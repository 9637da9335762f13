//! Scheduling domain models.
//!
//! Provides the core data types for the single-machine due-date problem:
//! jobs, instances, due-date scenarios and schedules.
//!
//! # Domain Mappings
//!
//! | u-tardiness | Manufacturing | Healthcare | Logistics |
//! |-------------|--------------|------------|-----------|
//! | Job | Order | Patient Case | Shipment |
//! | Instance | Order Book | Day List | Dispatch Batch |
//! | Schedule | Production Plan | OR Schedule | Loading Plan |

mod job;
mod scenario;
mod schedule;

pub use job::{Instance, Job};
pub use scenario::{DueDateWindow, Scenario};
pub use schedule::{JobSlot, Schedule};
