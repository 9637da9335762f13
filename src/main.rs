use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use u_tardiness::input::{parse_knapsack, parse_two_option};
use u_tardiness::milp::{MicroLpOracle, OracleParams};
use u_tardiness::models::Scenario;
use u_tardiness::problems::{solve_knapsack, solve_two_option};
use u_tardiness::runner::{RunConfig, ScenarioRunner};
use u_tardiness::ScheduleResult;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print one JSON object per result instead of summary lines.
    #[arg(long = "json", global = true, default_value_t = false)]
    json: bool,

    /// Enables debug output, including solver progress.
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one instance per due-date scenario and solve the
    /// time-indexed total-tardiness model.
    Scenarios(ScenarioArgs),
    /// Solve a 0/1 knapsack read from stdin (`N W`, then `N` lines `weight value`).
    Knapsack(OracleArgs),
    /// Solve a two-option assignment read from stdin (`n`, then `n` lines `a b`).
    Assign(OracleArgs),
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// JSON run configuration; flags below override its fields.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Jobs per instance [default: 100].
    #[arg(short = 'n', long = "jobs")]
    jobs: Option<usize>,

    /// Seed of the instance generator [default: 42].
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Scenario to run (`loose`, `medium`, `tight`); repeatable [default: all].
    #[arg(long = "scenario")]
    scenarios: Vec<Scenario>,

    /// The time budget of each solve, in seconds [default: 300].
    #[arg(short = 't', long = "time-limit")]
    time_limit: Option<f64>,

    /// Relative MIP gap passed to the solver [default: 0].
    #[arg(long = "mip-gap")]
    mip_gap: Option<f64>,
}

#[derive(Debug, Args)]
struct OracleArgs {
    /// The time budget for the solver, in seconds.
    #[arg(short = 't', long = "time-limit", default_value_t = 300.0)]
    time_limit: f64,
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "{} {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> ScheduleResult<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match cli.command {
        Command::Scenarios(args) => run_scenarios(args, cli.json, cli.verbose),
        Command::Knapsack(args) => run_knapsack(args, cli.json, cli.verbose),
        Command::Assign(args) => run_assign(args, cli.json, cli.verbose),
    }
}

fn run_scenarios(args: ScenarioArgs, json: bool, verbose: bool) -> ScheduleResult<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if !args.scenarios.is_empty() {
        config.scenarios = args.scenarios;
    }
    if let Some(time_limit) = args.time_limit {
        config.solve.time_limit = time_limit;
    }
    if let Some(mip_gap) = args.mip_gap {
        config.solve.mip_gap = mip_gap;
    }
    config.solve.verbose |= verbose;

    config.validate()?;

    let runner = ScenarioRunner::new(config);
    let oracle = MicroLpOracle::new();
    for &scenario in &runner.config().scenarios {
        let report = runner.run_scenario(scenario, &oracle)?;
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{report}");
        }
    }
    Ok(())
}

fn oracle_params(args: &OracleArgs, verbose: bool) -> OracleParams {
    OracleParams {
        time_limit: args.time_limit,
        verbose,
        ..OracleParams::default()
    }
}

fn run_knapsack(args: OracleArgs, json: bool, verbose: bool) -> ScheduleResult<()> {
    let input = parse_knapsack(std::io::stdin().lock())?;
    let solution = solve_knapsack(
        &input.items,
        input.capacity,
        &oracle_params(&args, verbose),
        &MicroLpOracle::new(),
    )?;

    if json {
        println!("{}", serde_json::to_string(&solution)?);
        return Ok(());
    }
    match solution.objective {
        Some(_) => {
            println!("max value: {}", solution.total_value);
            for &i in &solution.selected {
                let item = input.items[i];
                println!("item {}: weight={}, value={}", i + 1, item.weight, item.value);
            }
        }
        None => println!("no solution found (status={})", solution.status),
    }
    Ok(())
}

fn run_assign(args: OracleArgs, json: bool, verbose: bool) -> ScheduleResult<()> {
    let tasks = parse_two_option(std::io::stdin().lock())?;
    let solution = solve_two_option(&tasks, &oracle_params(&args, verbose), &MicroLpOracle::new())?;

    if json {
        println!("{}", serde_json::to_string(&solution)?);
        return Ok(());
    }
    match solution.objective {
        Some(_) => {
            println!("min time: {}", solution.total_time);
            for (i, choice) in solution.choices.iter().enumerate() {
                println!("task {}: {} ({})", i + 1, choice, tasks[i].time(*choice));
            }
        }
        None => println!("no solution found (status={})", solution.status),
    }
    Ok(())
}
