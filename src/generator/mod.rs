//! Synthetic instance generation (TF/RDD protocol).
//!
//! Processing times are drawn uniformly from `[p_low, p_high]`. Due dates
//! are drawn uniformly from the scenario's window around `(1 - TF) * Σp`
//! (see [`Scenario::due_date_window`]).
//!
//! # Reproducibility
//! The random source is an explicitly seeded `StdRng`. All processing times
//! are drawn first, then all due dates. Changing that order changes every
//! seeded instance.
//!
//! # Reference
//! Potts & Van Wassenhove (1985); Hall & Posner (2001), "Generating
//! Experimental Data for Computational Testing with Machine Scheduling
//! Applications"

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Instance, Scenario};

/// Processing-time range of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Smallest processing time (inclusive, >= 1).
    pub p_low: u32,
    /// Largest processing time (inclusive).
    pub p_high: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { p_low: 1, p_high: 20 }
    }
}

impl GeneratorConfig {
    /// Sets the processing-time range.
    pub fn with_processing_range(mut self, p_low: u32, p_high: u32) -> Self {
        self.p_low = p_low;
        self.p_high = p_high;
        self
    }

    fn validate(&self) -> ScheduleResult<()> {
        if self.p_low == 0 {
            return Err(ScheduleError::config("p_low must be at least 1"));
        }
        if self.p_low > self.p_high {
            return Err(ScheduleError::config(format!(
                "p_low {} exceeds p_high {}",
                self.p_low, self.p_high
            )));
        }
        Ok(())
    }
}

/// TF/RDD instance generator.
///
/// # Example
/// ```
/// use u_tardiness::generator::InstanceGenerator;
/// use u_tardiness::models::Scenario;
///
/// let generator = InstanceGenerator::new();
/// let a = generator.generate(10, 7, Scenario::Tight).unwrap();
/// let b = generator.generate(10, 7, Scenario::Tight).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceGenerator {
    config: GeneratorConfig,
}

impl InstanceGenerator {
    /// Creates a generator with processing times in `[1, 20]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator from a config.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Current config.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates `n` jobs for `scenario` from `seed`.
    ///
    /// # Errors
    /// - `InvalidSize` if `n == 0`.
    /// - `InvalidConfiguration` for an empty or zero-based processing range.
    pub fn generate(&self, n: usize, seed: u64, scenario: Scenario) -> ScheduleResult<Instance> {
        if n == 0 {
            return Err(ScheduleError::InvalidSize(n));
        }
        self.config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);

        let p: Vec<u32> = (0..n)
            .map(|_| rng.random_range(self.config.p_low..=self.config.p_high))
            .collect();
        let ptot: u64 = p.iter().map(|&x| u64::from(x)).sum();

        let window = scenario.due_date_window(ptot);
        let low = u32::try_from(window.low)
            .map_err(|_| ScheduleError::config("due-date window exceeds u32"))?;
        let high = u32::try_from(window.high)
            .map_err(|_| ScheduleError::config("due-date window exceeds u32"))?;

        let d: Vec<u32> = (0..n).map(|_| rng.random_range(low..=high)).collect();

        debug!(
            "generated {} jobs (seed={}, scenario={}, Σp={}, d∈[{}, {}])",
            n, seed, scenario, ptot, low, high
        );

        Instance::new(&p, &d)
    }
}

/// Generates an instance with the default processing range from a scenario
/// name.
///
/// # Errors
/// `InvalidScenario` for an unknown name, plus the errors of
/// [`InstanceGenerator::generate`].
pub fn generate_jobs(n: usize, seed: u64, scenario: &str) -> ScheduleResult<Instance> {
    let scenario: Scenario = scenario.parse()?;
    InstanceGenerator::new().generate(n, seed, scenario)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_medium() {
        let inst = generate_jobs(3, 0, "medium").unwrap();
        assert_eq!(inst.processing_times(), vec![17, 15, 12]);
        assert_eq!(inst.due_dates(), vec![28, 29, 11]);
    }

    #[test]
    fn test_golden_loose_and_tight_share_processing_times() {
        let loose = generate_jobs(3, 0, "loose").unwrap();
        let tight = generate_jobs(3, 0, "tight").unwrap();
        assert_eq!(loose.processing_times(), vec![17, 15, 12]);
        assert_eq!(loose.due_dates(), vec![42, 43, 22]);
        assert_eq!(tight.processing_times(), vec![17, 15, 12]);
        assert_eq!(tight.due_dates(), vec![13, 14, 0]);
    }

    #[test]
    fn test_golden_seed_42() {
        let inst = generate_jobs(5, 42, "medium").unwrap();
        assert_eq!(inst.processing_times(), vec![3, 11, 5, 11, 18]);
        assert_eq!(inst.due_dates(), vec![27, 36, 22, 36, 12]);
    }

    #[test]
    fn test_deterministic() {
        let g = InstanceGenerator::new();
        for scenario in Scenario::ALL {
            let a = g.generate(50, 1234, scenario).unwrap();
            let b = g.generate(50, 1234, scenario).unwrap();
            assert_eq!(a.processing_times(), b.processing_times());
            assert_eq!(a.due_dates(), b.due_dates());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let g = InstanceGenerator::new();
        let a = g.generate(30, 1, Scenario::Medium).unwrap();
        let b = g.generate(30, 2, Scenario::Medium).unwrap();
        assert_ne!(a.processing_times(), b.processing_times());
    }

    #[test]
    fn test_bounds() {
        let g =
            InstanceGenerator::with_config(GeneratorConfig::default().with_processing_range(3, 9));
        for seed in 0..20 {
            for scenario in Scenario::ALL {
                let inst = g.generate(25, seed, scenario).unwrap();
                let window = scenario.due_date_window(u64::from(inst.total_processing_time()));
                for job in inst.jobs() {
                    assert!((3..=9).contains(&job.processing_time));
                    assert!(window.contains(u64::from(job.due_date)));
                }
                assert!(inst.horizon() >= inst.max_processing_time());
            }
        }
    }

    #[test]
    fn test_tight_earlier_than_loose() {
        let g = InstanceGenerator::new();
        for seed in [0, 7, 42] {
            let loose = g.generate(40, seed, Scenario::Loose).unwrap();
            let tight = g.generate(40, seed, Scenario::Tight).unwrap();
            assert!(tight.mean_due_date() < loose.mean_due_date());
        }
    }

    #[test]
    fn test_invalid_size() {
        let err = InstanceGenerator::new()
            .generate(0, 0, Scenario::Medium)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidSize(0)));
    }

    #[test]
    fn test_invalid_scenario() {
        let err = generate_jobs(5, 0, "brutal").unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidScenario(_)));
    }

    #[test]
    fn test_invalid_processing_range() {
        let zero =
            InstanceGenerator::with_config(GeneratorConfig::default().with_processing_range(0, 5));
        assert!(matches!(
            zero.generate(3, 0, Scenario::Loose),
            Err(ScheduleError::InvalidConfiguration(_))
        ));

        let inverted =
            InstanceGenerator::with_config(GeneratorConfig::default().with_processing_range(8, 2));
        assert!(matches!(
            inverted.generate(3, 0, Scenario::Loose),
            Err(ScheduleError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_single_value_range() {
        let g =
            InstanceGenerator::with_config(GeneratorConfig::default().with_processing_range(4, 4));
        let inst = g.generate(6, 3, Scenario::Medium).unwrap();
        assert!(inst.processing_times().iter().all(|&p| p == 4));
        assert_eq!(inst.horizon(), 24);
    }
}
