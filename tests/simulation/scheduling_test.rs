/*!
 * Scheduling Tests
 * Admission order, deadlines, memory reuse and bookkeeping invariants
 */

use mempool_sim::{MemoryManager, SimulationManager, TaskItem, TaskState};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sim(total: usize) -> SimulationManager {
    SimulationManager::new(MemoryManager::with_capacity(total).unwrap())
}

#[test]
fn test_earlier_arrival_wins_contention() {
    let sim = sim(100);
    let first = TaskItem::new("first", 70, 5, 3).unwrap();
    let second = TaskItem::new("second", 70, 5, 3).unwrap();
    let (a, b) = (first.id(), second.id());
    sim.enqueue(first);
    sim.enqueue(second);

    let report = sim.step();
    assert_eq!(report.started, vec![a]);
    assert_eq!(sim.task(b).unwrap().state(), TaskState::Waiting);
}

#[test]
fn test_admission_keeps_arrival_order() {
    let sim = sim(1000);
    let ids: Vec<_> = (0..5)
        .map(|i| {
            let task = TaskItem::new(format!("t{i}"), 100, 5, 1).unwrap();
            let id = task.id();
            sim.enqueue(task);
            id
        })
        .collect();

    let report = sim.step();
    assert_eq!(report.started, ids);
    let running: Vec<_> = sim.running_snapshot().iter().map(|t| t.id()).collect();
    assert_eq!(running, ids);

    let offsets: Vec<_> = ids
        .iter()
        .map(|id| sim.memory().owned_by(*id)[0].offset())
        .collect();
    assert_eq!(offsets, vec![0, 100, 200, 300, 400]);
}

#[test]
fn test_deadline_is_inclusive() {
    let sim = sim(100);
    let hog = TaskItem::new("hog", 100, 5, 2).unwrap();
    let late = TaskItem::new("late", 50, 2, 1).unwrap();
    let late_id = late.id();
    sim.enqueue(hog);
    sim.enqueue(late);

    sim.step();
    // Tick 2 equals the deadline; the task may still start, memory permitting
    let report = sim.step();
    assert!(report.timed_out.is_empty());
    assert_eq!(sim.task(late_id).unwrap().state(), TaskState::Waiting);

    let report = sim.step();
    assert_eq!(report.timed_out, vec![late_id]);
}

#[test]
fn test_start_on_deadline_tick() {
    let sim = sim(100);
    let hog = TaskItem::new("hog", 100, 5, 1).unwrap();
    let edge = TaskItem::new("edge", 50, 2, 1).unwrap();
    let edge_id = edge.id();
    sim.enqueue(hog);
    sim.enqueue(edge);

    sim.step();
    let report = sim.step();
    assert_eq!(report.started, vec![edge_id]);
    assert_eq!(sim.task(edge_id).unwrap().start_tick(), Some(2));
}

#[test]
fn test_enqueue_rejects_passed_deadline() {
    let sim = sim(100);
    sim.step();
    sim.step();

    assert!(!sim.enqueue(TaskItem::new("stale", 10, 2, 1).unwrap()));
    assert!(sim.enqueue(TaskItem::new("fresh", 10, 3, 1).unwrap()));
    assert_eq!(sim.stats().waiting, 1);
}

#[test]
fn test_enqueue_rejects_duplicate() {
    let sim = sim(100);
    let task = TaskItem::new("dup", 10, 5, 1).unwrap();
    assert!(sim.enqueue(task.clone()));
    assert!(!sim.enqueue(task));
    assert_eq!(sim.stats().total(), 1);
}

#[test]
fn test_clones_drive_the_same_simulation() {
    let sim = sim(100);
    let handle = sim.clone();
    handle.enqueue(TaskItem::new("shared", 10, 5, 1).unwrap());

    sim.step();
    assert_eq!(handle.current_tick(), 1);
    assert_eq!(handle.stats().running, 1);
}

#[test]
fn test_steps_from_many_threads_do_not_overlap() {
    let sim = sim(1000);
    for i in 0..20 {
        sim.enqueue(TaskItem::new(format!("t{i}"), 100, 50, 2).unwrap());
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sim = sim.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    sim.step();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = sim.stats();
    assert_eq!(stats.current_tick, 40);
    assert_eq!(stats.finished, 20);
    assert_eq!(sim.memory().stats().used_memory, 0);
}

proptest! {
    #[test]
    fn prop_bookkeeping_stays_consistent(
        total in 50usize..500,
        tasks in prop::collection::vec((1usize..300, 1u64..8, 1u64..5), 1..20),
        steps in 1usize..25,
    ) {
        let sim = sim(total);
        let mut enqueued = 0;
        for (i, (size, max_start, duration)) in tasks.into_iter().enumerate() {
            if sim.enqueue(TaskItem::new(format!("t{i}"), size, max_start, duration).unwrap()) {
                enqueued += 1;
            }
        }

        for _ in 0..steps {
            sim.step();

            let stats = sim.stats();
            prop_assert_eq!(stats.total(), enqueued);

            let running = sim.running_snapshot();
            let mut held = 0;
            for task in &running {
                prop_assert_eq!(task.state(), TaskState::Running);
                let blocks = sim.memory().owned_by(task.id());
                prop_assert_eq!(blocks.len(), 1);
                prop_assert_eq!(blocks[0].size(), task.size_bytes());
                prop_assert_eq!(task.allocated_block(), Some(blocks[0].id()));
                held += task.size_bytes();
            }
            prop_assert_eq!(sim.memory().stats().used_memory, held);

            for task in sim.finished_snapshot() {
                prop_assert_eq!(task.remaining_duration(), 0);
                prop_assert!(sim.memory().owned_by(task.id()).is_empty());
            }
            for task in sim.timed_out_snapshot() {
                prop_assert!(task.start_tick().is_none());
                prop_assert!(stats.current_tick > task.max_start_time());
            }
            for task in sim.queue_snapshot() {
                prop_assert!(stats.current_tick <= task.max_start_time());
            }
        }
    }
}
