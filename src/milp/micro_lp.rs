//! `microlp` backend.
//!
//! `microlp` has no time limit of its own and cannot be interrupted, so
//! every solve is handed to one long-lived worker thread and the caller
//! waits at most `time_limit` seconds for the reply. An expired solve keeps
//! the worker busy until it finishes; later solves queue behind it and the
//! wait counts against their own limit. Requests whose caller already gave
//! up are skipped, so at most one solver runs at any time.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, log, Level};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use super::{BinaryProgram, MilpOracle, OracleOutcome, OracleParams, Relation, Sense, SolveStatus};
use crate::error::{ScheduleError, ScheduleResult};

const WORKER_NAME: &str = "milp-oracle";

/// Oracle backed by the pure-Rust `microlp` branch-and-bound.
///
/// `microlp` always proves optimality, so `OracleParams::mip_gap` is
/// accepted but has no effect. All instances share one solver thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpOracle;

impl MicroLpOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

static SHARED: Mutex<Option<Worker>> = Mutex::new(None);

/// Handle to the shared solver thread, spawned on first use.
fn shared_worker() -> ScheduleResult<Worker> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(worker) = slot.as_ref() {
        return Ok(worker.clone());
    }
    let worker = Worker::spawn(WORKER_NAME)?;
    *slot = Some(worker.clone());
    Ok(worker)
}

/// What the worker produced before the deadline.
#[derive(Debug)]
enum Deadline<T> {
    Finished(T),
    Expired,
    Panicked,
}

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Request {
    task: Task,
    /// Set by the caller once it stops waiting.
    abandoned: Arc<AtomicBool>,
}

/// Releases the busy flag even if the task unwinds.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        BusyGuard(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One solver thread fed through a request queue.
#[derive(Debug, Clone)]
struct Worker {
    tx: Sender<Request>,
    busy: Arc<AtomicBool>,
}

impl Worker {
    fn spawn(name: &str) -> ScheduleResult<Self> {
        let (tx, rx) = mpsc::channel();
        let busy = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&busy);
        thread::Builder::new()
            .name(name.into())
            .spawn(move || worker_loop(rx, flag))
            .map_err(|e| ScheduleError::Oracle(format!("failed to spawn solver worker: {e}")))?;
        Ok(Self { tx, busy })
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Queues `job` and waits at most `limit` for its result.
    fn run<T, F>(&self, limit: Duration, job: F) -> ScheduleResult<Deadline<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::channel();
        let abandoned = Arc::new(AtomicBool::new(false));
        let task: Task = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(job));
            // The receiver is gone once the caller gave up waiting.
            let _ = reply_tx.send(result);
        });
        self.tx
            .send(Request {
                task,
                abandoned: Arc::clone(&abandoned),
            })
            .map_err(|_| ScheduleError::Oracle("solver worker has stopped".into()))?;

        Ok(match reply_rx.recv_timeout(limit) {
            Ok(Ok(value)) => Deadline::Finished(value),
            Ok(Err(_)) | Err(RecvTimeoutError::Disconnected) => Deadline::Panicked,
            Err(RecvTimeoutError::Timeout) => {
                abandoned.store(true, Ordering::Release);
                Deadline::Expired
            }
        })
    }
}

fn worker_loop(rx: Receiver<Request>, busy: Arc<AtomicBool>) {
    while let Ok(request) = rx.recv() {
        if request.abandoned.load(Ordering::Acquire) {
            continue;
        }
        let _guard = BusyGuard::acquire(&busy);
        (request.task)();
    }
}

/// Solved objective and per-variable values.
type Assignment = (f64, Vec<f64>);

fn solve_program(program: &BinaryProgram) -> Result<Assignment, microlp::Error> {
    let direction = match program.sense {
        Sense::Minimize => OptimizationDirection::Minimize,
        Sense::Maximize => OptimizationDirection::Maximize,
    };
    let mut problem = Problem::new(direction);
    let vars: Vec<Variable> = program
        .objective
        .iter()
        .map(|&c| problem.add_binary_var(c))
        .collect();

    for row in &program.constraints {
        let op = match row.relation {
            Relation::Eq => ComparisonOp::Eq,
            Relation::Le => ComparisonOp::Le,
            Relation::Ge => ComparisonOp::Ge,
        };
        problem.add_constraint(row.terms.iter().map(|&(v, c)| (vars[v], c)), op, row.rhs);
    }

    let solution = problem.solve()?;
    let values = vars.iter().map(|&v| *solution.var_value(v)).collect();
    Ok((solution.objective(), values))
}

/// Rejects rows that reference unknown or repeated variables.
fn check_rows(program: &BinaryProgram) -> ScheduleResult<()> {
    let n = program.num_vars();
    let mut seen = vec![usize::MAX; n];
    for (row_idx, row) in program.constraints.iter().enumerate() {
        for &(v, _) in &row.terms {
            if v >= n {
                return Err(ScheduleError::config(format!(
                    "row {row_idx} references variable {v}, program has {n}"
                )));
            }
            if seen[v] == row_idx {
                return Err(ScheduleError::config(format!(
                    "row {row_idx} lists variable {v} twice"
                )));
            }
            seen[v] = row_idx;
        }
    }
    Ok(())
}

impl MilpOracle for MicroLpOracle {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(
        &self,
        program: &BinaryProgram,
        params: &OracleParams,
    ) -> ScheduleResult<OracleOutcome> {
        params.validate()?;
        check_rows(program)?;

        let level = if params.verbose { Level::Info } else { Level::Debug };
        log!(
            level,
            "{}: {} binaries, {} rows, time limit {:.1}s",
            self.name(),
            program.num_vars(),
            program.num_constraints(),
            params.time_limit
        );
        if params.mip_gap > 0.0 {
            debug!(
                "{}: mip gap {} ignored, solves are proven optimal",
                self.name(),
                params.mip_gap
            );
        }

        let worker = shared_worker()?;
        if worker.is_busy() {
            debug!("{}: waiting for an earlier solve to finish", self.name());
        }
        let limit = Duration::try_from_secs_f64(params.time_limit).unwrap_or(Duration::MAX);
        let owned = program.clone();
        let started = Instant::now();

        let outcome = match worker.run(limit, move || solve_program(&owned))? {
            Deadline::Finished(Ok((objective, values))) => {
                OracleOutcome::solved(SolveStatus::Optimal, objective, values)
            }
            Deadline::Finished(Err(microlp::Error::Infeasible)) => {
                OracleOutcome::without_solution(SolveStatus::Infeasible)
            }
            Deadline::Finished(Err(microlp::Error::Unbounded)) => {
                OracleOutcome::without_solution(SolveStatus::Unbounded)
            }
            Deadline::Finished(Err(microlp::Error::InternalError(msg))) => {
                return Err(ScheduleError::Oracle(msg));
            }
            Deadline::Expired => OracleOutcome::without_solution(SolveStatus::TimeLimit),
            Deadline::Panicked => {
                return Err(ScheduleError::Oracle("solver worker panicked".into()));
            }
        };

        log!(
            level,
            "{}: status={} objective={:?} in {:.3}s",
            self.name(),
            outcome.status,
            outcome.objective,
            started.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }
}
