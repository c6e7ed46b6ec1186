use log::Level;

use deadline_sim::core::config::SimulationConfig;
use deadline_sim::experiment::{DeadlineStats, Experiment};

fn load(file_name: &str) -> SimulationConfig {
    SimulationConfig::from_file(&format!("test-configs/{}", file_name)).unwrap()
}

#[test]
// Runs are independent, so parallel execution must not change per-run results
// or their order in the report.
fn parallel_runs_match_config_order() {
    let configs = vec![
        ("batch".to_string(), load("config.yaml")),
        ("partial".to_string(), load("zero_length.yaml")),
        ("empty".to_string(), load("empty_tasks.yaml")),
    ];
    let mut experiment = Experiment::new(configs, Box::new(DeadlineStats), None, Level::Debug).unwrap();
    let results = experiment.run(2);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["run"], "batch");
    assert_eq!(results[0]["tasks"], "5");
    assert_eq!(results[0]["met_deadline"], "5");
    assert_eq!(results[0]["rejected"], "0");

    assert_eq!(results[1]["run"], "partial");
    assert_eq!(results[1]["tasks"], "2");
    assert_eq!(results[1]["met_deadline"], "1");
    assert_eq!(results[1]["rejected"], "1");

    assert_eq!(results[2]["run"], "empty");
    assert_eq!(results[2]["tasks"], "0");
}
