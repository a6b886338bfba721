/*!
 * Scenario Tests
 * End-to-end walkthroughs of admission, completion and timeout
 */

use mempool_sim::{
    enqueue_all, load_specs, DriverSummary, MemoryManager, RunSummary, ScenarioError,
    SimulationConfig, SimulationManager, StopReason, TaskItem, TaskState,
};
use pretty_assertions::assert_eq;
use std::io::Write;

fn sim(total: usize) -> SimulationManager {
    SimulationManager::new(MemoryManager::with_capacity(total).unwrap())
}

#[test]
fn test_task_runs_to_completion() {
    let sim = sim(1000);
    let t1 = TaskItem::new("T1", 400, 5, 2).unwrap();
    let id = t1.id();
    assert!(sim.enqueue(t1));
    assert_eq!(sim.queue_snapshot().len(), 1);

    // Admitted on the first tick
    let report = sim.step();
    assert_eq!(report.tick, 1);
    assert_eq!(report.started, vec![id]);
    let running = sim.task(id).unwrap();
    assert_eq!(running.state(), TaskState::Running);
    assert_eq!(running.start_tick(), Some(1));

    let block = sim.memory().owned_by(id);
    assert_eq!(block.len(), 1);
    assert_eq!((block[0].offset(), block[0].size()), (0, 400));

    // One tick of work done, still running
    let report = sim.step();
    assert!(report.is_quiet());
    assert_eq!(sim.task(id).unwrap().remaining_duration(), 1);
    assert_eq!(sim.running_snapshot().len(), 1);

    // Last tick of work, block returned
    let report = sim.step();
    assert_eq!(report.tick, 3);
    assert_eq!(report.finished, vec![id]);

    let done = sim.task(id).unwrap();
    assert_eq!(done.state(), TaskState::Finished);
    assert_eq!(done.remaining_duration(), 0);
    assert_eq!(done.allocated_block(), None);
    assert_eq!(sim.finished_snapshot().len(), 1);

    let blocks = sim.memory().blocks_snapshot();
    assert!(blocks[0].is_free());
    assert_eq!((blocks[0].offset(), blocks[0].size()), (0, 400));
    assert_eq!(sim.memory().stats().used_memory, 0);
}

#[test]
fn test_oversized_task_times_out() {
    let sim = sim(1000);
    let t2 = TaskItem::new("T2", 1200, 3, 1).unwrap();
    let id = t2.id();
    assert!(sim.enqueue(t2));

    for tick in 1..=3 {
        let report = sim.step();
        assert_eq!(report.tick, tick);
        assert!(report.is_quiet());
        assert_eq!(sim.task(id).unwrap().state(), TaskState::Waiting);
    }

    let report = sim.step();
    assert_eq!(report.tick, 4);
    assert_eq!(report.timed_out, vec![id]);
    assert_eq!(sim.task(id).unwrap().state(), TaskState::TimedOut);
    assert!(sim.queue_snapshot().is_empty());
    assert_eq!(sim.timed_out_snapshot().len(), 1);
}

#[test]
fn test_exact_fit_blocks_later_task() {
    let sim = sim(500);
    let t3 = TaskItem::new("T3", 500, 5, 2).unwrap();
    let t4 = TaskItem::new("T4", 100, 10, 1).unwrap();
    let (id3, id4) = (t3.id(), t4.id());
    sim.enqueue(t3);
    sim.enqueue(t4);

    let report = sim.step();
    assert_eq!(report.started, vec![id3]);
    assert_eq!(sim.memory().blocks_snapshot().len(), 1);
    assert_eq!(sim.task(id4).unwrap().state(), TaskState::Waiting);

    sim.step();
    assert_eq!(sim.task(id4).unwrap().state(), TaskState::Waiting);

    // T3 frees the pool on tick 3 and T4 takes it in the same tick
    let report = sim.step();
    assert_eq!(report.finished, vec![id3]);
    assert_eq!(report.started, vec![id4]);

    let t4 = sim.task(id4).unwrap();
    assert_eq!(t4.start_tick(), Some(3));
    let held = sim.memory().owned_by(id4);
    assert_eq!((held[0].offset(), held[0].size()), (0, 100));
}

fn scenario_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn test_scenario_file_runs_to_idle() {
    let file = scenario_file(
        r#"[
            {"name": "small", "size": 200, "max_start_time": 3, "duration": 1},
            {"name": "huge", "size": 5000, "max_start_time": 2, "duration": 1}
        ]"#,
    );

    let specs = load_specs(file.path()).unwrap();
    assert_eq!(specs.len(), 2);

    let sim = sim(1000);
    let enqueued = enqueue_all(&sim, specs).unwrap();
    assert_eq!(enqueued.accepted.len(), 2);
    assert!(enqueued.rejected.is_empty());

    while !sim.is_idle() {
        sim.step();
    }

    let driver = DriverSummary {
        steps: 3,
        final_tick: sim.current_tick(),
        reason: StopReason::Idle,
    };
    let summary = RunSummary::collect(&sim, SimulationConfig::default(), driver, enqueued.rejected);
    assert_eq!(summary.tasks.current_tick, 3);
    assert_eq!(summary.finished, vec!["small".to_string()]);
    assert_eq!(summary.timed_out, vec!["huge".to_string()]);
    assert!(summary.waiting.is_empty());
    assert_eq!(summary.memory.used_memory, 0);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["driver"]["reason"], "idle");
    assert_eq!(json["rejected"], serde_json::json!([]));
}

#[test]
fn test_summary_lists_rejected_tasks() {
    let sim = sim(1000);
    sim.step();
    sim.step();

    let file = scenario_file(
        r#"[
            {"name": "stale", "size": 10, "max_start_time": 2, "duration": 1},
            {"name": "fresh", "size": 10, "max_start_time": 9, "duration": 1}
        ]"#,
    );
    let enqueued = enqueue_all(&sim, load_specs(file.path()).unwrap()).unwrap();
    assert_eq!(enqueued.rejected, vec!["stale".to_string()]);

    let driver = DriverSummary {
        steps: 0,
        final_tick: 2,
        reason: StopReason::TickBudget,
    };
    let summary = RunSummary::collect(&sim, SimulationConfig::default(), driver, enqueued.rejected);
    assert_eq!(summary.rejected, vec!["stale".to_string()]);
    assert_eq!(summary.waiting, vec!["fresh".to_string()]);
    assert_eq!(summary.tasks.total(), 1);
}

#[test]
fn test_scenario_errors() {
    let missing = std::path::Path::new("/nonexistent/scenario.json");
    assert!(matches!(load_specs(missing), Err(ScenarioError::Io { .. })));

    let garbled = scenario_file("[{\"name\": \"a\"");
    assert!(matches!(load_specs(garbled.path()), Err(ScenarioError::Parse { .. })));

    let invalid = scenario_file(
        r#"[{"name": "", "size": 10, "max_start_time": 3, "duration": 1}]"#,
    );
    let specs = load_specs(invalid.path()).unwrap();
    let sim = sim(100);
    assert!(matches!(
        enqueue_all(&sim, specs),
        Err(ScenarioError::Task { index: 0, .. })
    ));
    assert_eq!(sim.stats().total(), 0);
}

#[test]
fn test_deserialized_task_cannot_skip_validation() {
    let err = serde_json::from_str::<TaskItem>(
        r#"{"id": 1, "name": "", "size_bytes": 0, "max_start_time": 5,
            "initial_duration": 0, "remaining_duration": 0, "start_tick": null,
            "state": "waiting", "allocated_block": null}"#,
    );
    assert!(err.is_err());

    let real = TaskItem::new("real", 10, 5, 1).unwrap();
    let copy: TaskItem = serde_json::from_str(&format!(
        r#"{{"id": {}, "name": "copy", "size": 10, "max_start_time": 5, "duration": 1}}"#,
        real.id().0
    ))
    .unwrap();

    let sim = sim(100);
    assert!(sim.enqueue(copy));
    assert!(sim.enqueue(real));
    assert_eq!(sim.stats().waiting, 2);
}
