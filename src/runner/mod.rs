//! Scenario runner.
//!
//! Runs one generated instance per due-date scenario through the
//! time-indexed model and reports one summary line per scenario. Each
//! report also carries the EDD dispatching baseline, an upper bound on the
//! optimal total tardiness.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::dispatching::{dispatch, DispatchingRule, Edd};
use crate::error::{ScheduleError, ScheduleResult};
use crate::generator::{GeneratorConfig, InstanceGenerator};
use crate::milp::MilpOracle;
use crate::models::{Instance, Scenario};
use crate::scheduler::TardinessKpi;
use crate::timeindexed::{self, SolutionSummary, SolveConfig};
use crate::validation::validate_schedule;

/// Parameters of a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Jobs per instance.
    pub jobs: usize,
    /// Seed shared by all scenarios.
    pub seed: u64,
    /// Scenarios in run order.
    pub scenarios: Vec<Scenario>,
    pub generator: GeneratorConfig,
    pub solve: SolveConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jobs: 100,
            seed: 42,
            scenarios: Scenario::ALL.to_vec(),
            generator: GeneratorConfig::default(),
            solve: SolveConfig::default(),
        }
    }
}

impl RunConfig {
    /// Loads a JSON config; missing fields keep their defaults.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Json` if it does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sets the job count.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the scenarios to run.
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Sets the solver settings.
    pub fn with_solve(mut self, solve: SolveConfig) -> Self {
        self.solve = solve;
        self
    }

    /// Checks the run before any instance is generated.
    ///
    /// # Errors
    /// `InvalidSize` for zero jobs, `InvalidConfiguration` for an empty
    /// scenario list.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.jobs == 0 {
            return Err(ScheduleError::InvalidSize(0));
        }
        if self.scenarios.is_empty() {
            return Err(ScheduleError::config("no scenario selected"));
        }
        Ok(())
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub jobs: usize,
    pub seed: u64,
    /// `Σp`.
    pub total_processing_time: u32,
    pub mean_due_date: f64,
    /// Total tardiness of the EDD sequence.
    pub edd_tardiness: u64,
    pub summary: SolutionSummary,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ∑p={}  avg(d)={:.1}  ",
            self.scenario.name().to_uppercase(),
            self.total_processing_time,
            self.mean_due_date
        )?;
        match (&self.summary.objective, &self.summary.schedule) {
            (Some(objective), Some(decoded)) => write!(
                f,
                "obj(∑T)={:.1}  late={}/{}  avgT={:.1}  ",
                objective, decoded.late_count, self.jobs, decoded.average_tardiness
            )?,
            _ => f.write_str("obj(∑T)=n/a  ")?,
        }
        write!(f, "status={}", self.summary.status)
    }
}

/// Runs the configured scenarios one after another.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: RunConfig,
    generator: InstanceGenerator,
}

impl ScenarioRunner {
    /// Creates a runner.
    pub fn new(config: RunConfig) -> Self {
        let generator = InstanceGenerator::with_config(config.generator);
        Self { config, generator }
    }

    /// Current config.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every configured scenario.
    ///
    /// # Errors
    /// Stops at the first scenario that fails; see [`Self::run_scenario`].
    pub fn run<O: MilpOracle>(&self, oracle: &O) -> ScheduleResult<Vec<ScenarioReport>> {
        self.config.validate()?;
        self.config
            .scenarios
            .iter()
            .map(|&scenario| self.run_scenario(scenario, oracle))
            .collect()
    }

    /// Generates and solves the instance of one scenario.
    ///
    /// # Errors
    /// Generator and solve errors ([`ScheduleError`]).
    pub fn run_scenario<O: MilpOracle>(
        &self,
        scenario: Scenario,
        oracle: &O,
    ) -> ScheduleResult<ScenarioReport> {
        let instance = self
            .generator
            .generate(self.config.jobs, self.config.seed, scenario)?;
        info!(
            "{}: {} jobs, Σp={}, solving with {}",
            scenario,
            instance.len(),
            instance.total_processing_time(),
            oracle.name()
        );

        let edd_tardiness = baseline_tardiness(&instance, &Edd);
        let summary = timeindexed::solve(&instance, &self.config.solve, oracle)?;

        if let Some(decoded) = &summary.schedule {
            if let Err(errors) = validate_schedule(&instance, &decoded.schedule) {
                for error in &errors {
                    warn!("{}: {}", scenario, error.message);
                }
            }
            if decoded.total_tardiness > edd_tardiness {
                warn!(
                    "{}: solver schedule ΣT={} is worse than EDD ΣT={}",
                    scenario, decoded.total_tardiness, edd_tardiness
                );
            }
        }
        info!(
            "{}: status={} objective={:?} (EDD {})",
            scenario, summary.status, summary.objective, edd_tardiness
        );

        Ok(ScenarioReport {
            scenario,
            jobs: instance.len(),
            seed: self.config.seed,
            total_processing_time: instance.total_processing_time(),
            mean_due_date: instance.mean_due_date(),
            edd_tardiness,
            summary,
        })
    }
}

/// Total tardiness of the sequence produced by `rule`.
pub fn baseline_tardiness<R: DispatchingRule + ?Sized>(instance: &Instance, rule: &R) -> u64 {
    TardinessKpi::calculate(instance, &dispatch(instance, rule)).total_tardiness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::InputOrder;
    use crate::milp::{BinaryProgram, MicroLpOracle, OracleOutcome, OracleParams, SolveStatus};

    struct Expired;

    impl MilpOracle for Expired {
        fn name(&self) -> &'static str {
            "expired"
        }

        fn solve(&self, _: &BinaryProgram, _: &OracleParams) -> ScheduleResult<OracleOutcome> {
            Ok(OracleOutcome::without_solution(SolveStatus::TimeLimit))
        }
    }

    fn small_config() -> RunConfig {
        RunConfig::default()
            .with_jobs(3)
            .with_seed(0)
            .with_solve(SolveConfig::default().with_time_limit(60.0))
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.jobs, 100);
        assert_eq!(config.seed, 42);
        assert_eq!(config.scenarios, Scenario::ALL.to_vec());
        assert_eq!(config.solve.time_limit, 300.0);
    }

    #[test]
    fn test_config_from_json() {
        let config: RunConfig = serde_json::from_str(
            r#"{"jobs": 8, "scenarios": ["tight"], "solve": {"mip_gap": 0.01}}"#,
        )
        .unwrap();
        assert_eq!(config.jobs, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.scenarios, vec![Scenario::Tight]);
        assert_eq!(config.solve.mip_gap, 0.01);
        assert_eq!(config.solve.time_limit, 300.0);
    }

    #[test]
    fn test_config_file_errors() {
        let missing = RunConfig::from_json_file("/nonexistent/run.json");
        assert!(matches!(missing, Err(ScheduleError::Io(_))));

        let path = std::env::temp_dir().join("u_tardiness_bad_run_config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(RunConfig::from_json_file(&path), Err(ScheduleError::Json(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_run_all_scenarios() {
        let reports = ScenarioRunner::new(small_config()).run(&MicroLpOracle::new()).unwrap();
        let scenarios: Vec<Scenario> = reports.iter().map(|r| r.scenario).collect();
        assert_eq!(scenarios, Scenario::ALL.to_vec());

        let objectives: Vec<f64> = reports.iter().map(|r| r.summary.objective.unwrap()).collect();
        assert!((objectives[0] - 1.0).abs() < 1e-6);
        assert!((objectives[1] - 17.0).abs() < 1e-6);
        assert!((objectives[2] - 56.0).abs() < 1e-6);

        for report in &reports {
            assert_eq!(report.total_processing_time, 44);
            assert!(report.summary.objective.unwrap() <= report.edd_tardiness as f64 + 1e-6);
        }
    }

    #[test]
    fn test_report_line() {
        let runner = ScenarioRunner::new(small_config());
        // unique optimum: job 1 finishes one unit late
        let report = runner.run_scenario(Scenario::Loose, &MicroLpOracle::new()).unwrap();
        assert_eq!(
            report.to_string(),
            "[LOOSE] ∑p=44  avg(d)=35.7  obj(∑T)=1.0  late=1/3  avgT=0.3  status=optimal"
        );
    }

    #[test]
    fn test_report_without_solution() {
        let runner = ScenarioRunner::new(small_config());
        let report = runner.run_scenario(Scenario::Loose, &Expired).unwrap();
        assert_eq!(
            report.to_string(),
            "[LOOSE] ∑p=44  avg(d)=35.7  obj(∑T)=n/a  status=time_limit"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["status"], "time_limit");
        assert!(json["summary"]["objective"].is_null());
    }

    #[test]
    fn test_baseline_tardiness() {
        let instance = InstanceGenerator::new().generate(3, 0, Scenario::Medium).unwrap();
        assert_eq!(baseline_tardiness(&instance, &InputOrder), 36);
        assert_eq!(baseline_tardiness(&instance, &Edd), 17);
    }

    #[test]
    fn test_invalid_run_config() {
        let runner = ScenarioRunner::new(small_config().with_jobs(0));
        assert!(matches!(
            runner.run(&MicroLpOracle::new()),
            Err(ScheduleError::InvalidSize(0))
        ));

        let runner = ScenarioRunner::new(small_config().with_scenarios(Vec::new()));
        assert!(matches!(
            runner.run(&MicroLpOracle::new()),
            Err(ScheduleError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_config_file_without_scenarios() {
        let config: RunConfig = serde_json::from_str(r#"{"jobs": 5, "scenarios": []}"#).unwrap();
        assert!(matches!(config.validate(), Err(ScheduleError::InvalidConfiguration(_))));
        assert!(small_config().validate().is_ok());
    }
}
