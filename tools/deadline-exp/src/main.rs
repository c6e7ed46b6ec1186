use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::Level;

use deadline_sim::core::config::SimulationConfig;
use deadline_sim::core::evaluator::Verdict;
use deadline_sim::experiment::{DeadlineStats, Experiment};
use deadline_sim::simulation::DatacenterSimulation;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Runs deadline-aware placement simulations
struct Args {
    /// Paths to YAML files with simulation configurations
    #[arg(short, long, required = true, num_args = 1..)]
    config: Vec<PathBuf>,

    /// Path to produced JSON file with results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for per-run CSV logs (multi-config mode only)
    #[arg(short, long)]
    log_dir: Option<String>,

    /// Number of threads to use (default - use all available cores)
    #[arg(short, long, default_value_t = std::thread::available_parallelism().unwrap().get())]
    threads: usize,
}

fn main() {
    env_logger::init();
    if let Err(error) = try_main(Args::parse()) {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> Result<(), Box<dyn Error>> {
    if args.config.len() == 1 {
        run_single(&args)
    } else {
        run_experiment(&args)
    }
}

fn run_single(args: &Args) -> Result<(), Box<dyn Error>> {
    let path = &args.config[0];
    let config = SimulationConfig::from_file(&path.display().to_string())?;
    log::info!("loaded config with {} tasks", config.number_of_tasks());
    let mut sim = DatacenterSimulation::new(&config)?;
    let verdicts = sim.run()?;
    print_verdicts(&verdicts);
    if let Some(output) = &args.output {
        let mut file = std::fs::File::create(output)?;
        file.write_all(serde_json::to_string_pretty(&verdicts)?.as_bytes())?;
    }
    Ok(())
}

fn run_experiment(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut configs = Vec::new();
    for path in &args.config {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        configs.push((name, SimulationConfig::from_file(&path.display().to_string())?));
    }
    let mut experiment = Experiment::new(configs, Box::new(DeadlineStats), args.log_dir.clone(), Level::Debug)?;
    let results = experiment.run(args.threads);
    for record in &results {
        let row: Vec<String> = record.iter().map(|(key, value)| format!("{}: {}", key, value)).collect();
        println!("{}", row.join(" | "));
    }
    if let Some(output) = &args.output {
        let mut file = std::fs::File::create(output)?;
        file.write_all(serde_json::to_string_pretty(&results)?.as_bytes())?;
    }
    Ok(())
}

fn print_verdicts(verdicts: &[Verdict]) {
    println!("========== Results ==========");
    for v in verdicts {
        let vm = v.vm_id.map_or("-".to_string(), |id| id.to_string());
        let finish = v.finish_time.map_or("-".to_string(), |t| format!("{:.2}", t));
        println!(
            "Task {:>4} | VM {:>3} | {:<10} | Deadline {:>10.2} | Finish {:>10} | {}",
            v.task_id,
            vm,
            v.status.to_string(),
            v.deadline,
            finish,
            if v.met_deadline { "Met Deadline" } else { "Missed Deadline" }
        );
    }
}
