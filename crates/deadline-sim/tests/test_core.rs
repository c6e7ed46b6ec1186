use deadline_sim::core::cloudlet::{Cloudlet, CloudletQueue};
use deadline_sim::core::common::{Assignment, TaskStatus};
use deadline_sim::core::config::SimulationConfig;
use deadline_sim::core::host::{HostSpec, ResourceCatalog};
use deadline_sim::core::vm::VmPool;
use deadline_sim::error::{ConfigurationError, ValidationError};
use deadline_sim::simulation::DatacenterSimulation;

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!(
        (x - y).abs() < eps || (x.max(y) - x.min(y)) / x.min(y) < eps,
        "Values do not match: {:.15} vs {:.15}",
        x,
        y
    );
}

fn cloudlet(id: u32, length: i64, deadline: f64) -> Cloudlet {
    Cloudlet {
        id,
        length,
        pe_count: 1,
        deadline,
    }
}

#[test]
// Equal deadlines keep submission order, earlier deadlines go first.
fn ordered_view_is_stable() {
    let (queue, errors) = CloudletQueue::submit(vec![
        cloudlet(0, 100, 5.),
        cloudlet(1, 100, 3.),
        cloudlet(2, 100, 5.),
        cloudlet(3, 100, 3.),
    ]);
    assert!(errors.is_empty());
    let order: Vec<u32> = queue.ordered_view().iter().map(|c| c.id).collect();
    assert_eq!(order, vec![1, 3, 0, 2]);
}

#[test]
fn invalid_tasks_are_rejected_not_fatal() {
    let (queue, errors) = CloudletQueue::submit(vec![
        cloudlet(0, 0, 10.),
        cloudlet(1, 100, -1.),
        cloudlet(2, 100, 10.),
    ]);
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ValidationError::InvalidLength { id: 0, .. }));
    assert!(matches!(errors[1], ValidationError::InvalidDeadline { id: 1, .. }));
    assert_eq!(errors[0].task_id(), 0);
    assert!(queue.is_rejected(0));
    assert!(queue.is_rejected(1));
    assert!(!queue.is_rejected(2));
    assert_eq!(queue.accepted().count(), 1);
    assert_eq!(queue.submitted().len(), 3);
}

#[test]
// A NaN deadline is invalid input, not a guaranteed-missed task.
fn nan_deadline_is_rejected() {
    let (queue, errors) = CloudletQueue::submit(vec![cloudlet(0, 100, f64::NAN), cloudlet(1, 100, 10.)]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ValidationError::InvalidDeadline { id: 0, .. }));
    assert!(queue.is_rejected(0));
    let order: Vec<u32> = queue.ordered_view().iter().map(|c| c.id).collect();
    assert_eq!(order, vec![1]);
}

#[test]
fn catalog_rejects_invalid_hosts() {
    assert!(matches!(
        ResourceCatalog::new(vec![]),
        Err(ConfigurationError::EmptyHostList)
    ));
    let no_pes = HostSpec {
        speed: 1000.,
        pe_count: 0,
        memory: 4096,
        bandwidth: 10000,
        storage: 1000000,
    };
    assert!(matches!(
        ResourceCatalog::new(vec![no_pes]),
        Err(ConfigurationError::NoProcessingElements { id: 0 })
    ));
    let zero_speed = HostSpec {
        speed: 0.,
        pe_count: 1,
        memory: 4096,
        bandwidth: 10000,
        storage: 1000000,
    };
    assert!(matches!(
        ResourceCatalog::new(vec![zero_speed]),
        Err(ConfigurationError::InvalidHostSpeed { id: 0, .. })
    ));
}

#[test]
fn catalog_reports_capacity_bounds() {
    let host = HostSpec {
        speed: 2000.,
        pe_count: 2,
        memory: 4096,
        bandwidth: 10000,
        storage: 1000000,
    };
    let catalog = ResourceCatalog::new(vec![host.clone(), host]).unwrap();
    assert_eq!(catalog.host_count(), 2);
    assert_eq!(catalog.total_speed(), 8000.);
}

#[test]
fn vm_pool_has_sequential_stable_ids() {
    assert!(matches!(
        VmPool::create(0, 1000., 0),
        Err(ConfigurationError::EmptyVmPool)
    ));
    assert!(matches!(
        VmPool::create(2, 0., 0),
        Err(ConfigurationError::InvalidVmSpeed { .. })
    ));
    let pool = VmPool::create(3, 1000., 7).unwrap();
    let ids: Vec<u32> = pool.iter().map(|vm| vm.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(pool.get(1).unwrap().session_id, 7);
    assert_eq!(pool.len(), 3);
}

#[test]
// 5 equal tasks on 2 equal VMs: placement alternates starting from vm 0,
// time-shared execution finishes vm 0 tasks at 30 and vm 1 tasks at 20.
fn five_tasks_on_two_vms() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    let mut sim = DatacenterSimulation::new(&config).unwrap();
    let verdicts = sim.run().unwrap();

    let expected: Vec<Assignment> = [(0, 0), (1, 1), (2, 0), (3, 1), (4, 0)]
        .iter()
        .map(|&(task_id, vm_id)| Assignment { task_id, vm_id })
        .collect();
    assert_eq!(sim.assignments(), expected.as_slice());

    assert_eq!(verdicts.len(), 5);
    for (i, verdict) in verdicts.iter().enumerate() {
        assert_eq!(verdict.task_id, i as u32);
        assert_eq!(verdict.status, TaskStatus::Completed);
        assert!(verdict.met_deadline);
        let finish = verdict.finish_time.unwrap();
        let expected_finish = if verdict.vm_id == Some(0) { 30. } else { 20. };
        assert_float_eq(finish, expected_finish, 1e-12);
    }

    // Final ledger equals the sum of lengths of tasks bound to each VM.
    assert_eq!(sim.scheduler().ledger().load(0), 30000);
    assert_eq!(sim.scheduler().ledger().load(1), 20000);
    assert!(sim.scheduler().unassigned().is_empty());
}

#[test]
fn empty_task_list_produces_empty_report() {
    let config = SimulationConfig::from_file(&name_wrapper("empty_tasks.yaml")).unwrap();
    let mut sim = DatacenterSimulation::new(&config).unwrap();
    let verdicts = sim.run().unwrap();
    assert!(verdicts.is_empty());
}

#[test]
fn zero_length_task_is_reported_rejected() {
    let config = SimulationConfig::from_file(&name_wrapper("zero_length.yaml")).unwrap();
    let mut sim = DatacenterSimulation::new(&config).unwrap();
    let verdicts = sim.run().unwrap();

    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].status, TaskStatus::Rejected);
    assert!(!verdicts[0].met_deadline);
    assert_eq!(verdicts[0].finish_time, None);
    assert_eq!(verdicts[0].vm_id, None);

    assert_eq!(verdicts[1].status, TaskStatus::Completed);
    assert!(verdicts[1].met_deadline);
    assert_float_eq(verdicts[1].finish_time.unwrap(), 1., 1e-12);
}

#[test]
fn empty_pool_is_a_configuration_error() {
    let config = SimulationConfig::from_file(&name_wrapper("empty_pool.yaml")).unwrap();
    let result = DatacenterSimulation::new(&config);
    assert!(matches!(result, Err(ConfigurationError::EmptyVmPool)));
}

#[test]
fn pipeline_is_deterministic() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    let mut first = DatacenterSimulation::new(&config).unwrap();
    let mut second = DatacenterSimulation::new(&config).unwrap();
    assert_eq!(first.run().unwrap(), second.run().unwrap());
    assert_eq!(first.assignments(), second.assignments());
}

#[test]
// Repeated runs of one simulation schedule from a fresh ledger, so they must
// produce identical assignments, verdicts and final load totals.
fn rerun_produces_identical_results() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    let mut sim = DatacenterSimulation::new(&config).unwrap();
    let first_verdicts = sim.run().unwrap();
    let first_assignments = sim.assignments().to_vec();
    let second_verdicts = sim.run().unwrap();
    assert_eq!(sim.assignments(), first_assignments.as_slice());
    assert_eq!(second_verdicts, first_verdicts);
    assert_eq!(sim.scheduler().ledger().load(0), 30000);
    assert_eq!(sim.scheduler().ledger().load(1), 20000);
}

#[test]
fn finish_time_never_precedes_start_time() {
    let config = SimulationConfig::from_file(&name_wrapper("config.yaml")).unwrap();
    let mut sim = DatacenterSimulation::new(&config).unwrap();
    for verdict in sim.run().unwrap() {
        // All tasks start at submission time zero in this model.
        assert!(verdict.finish_time.unwrap() >= 0.);
    }
}
