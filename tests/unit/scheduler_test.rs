//! Unit tests for window scheduling

use imgrot::cache::{Direction, WindowScheduler};

#[test]
fn forward_step_from_ten_to_eleven_queues_twelve_to_twenty() {
    let scheduler = WindowScheduler::new(20);

    let jobs = scheduler.step_jobs(Direction::Forward, 11, 20, |_| false);

    assert_eq!(jobs, (12..20).collect::<Vec<_>>());
}

#[test]
fn forward_step_only_queues_absent_indices() {
    let scheduler = WindowScheduler::new(20);

    let jobs = scheduler.step_jobs(Direction::Forward, 11, 20, |i| i == 13 || i == 14);

    assert_eq!(jobs, vec![12, 15, 16, 17, 18, 19]);
}

#[test]
fn backward_step_is_strictly_descending() {
    let scheduler = WindowScheduler::new(10);

    let jobs = scheduler.step_jobs(Direction::Backward, 40, 100, |_| false);

    assert!(!jobs.is_empty());
    assert!(jobs.windows(2).all(|pair| pair[0] > pair[1]));
    assert!(jobs.iter().all(|&i| i < 40));
}

#[test]
fn backward_step_with_single_candidate_has_no_far_half() {
    let scheduler = WindowScheduler::new(30);

    // Range [0, 1): the far half is empty, so nothing is queued
    assert!(scheduler
        .step_jobs(Direction::Backward, 2, 100, |_| false)
        .is_empty());
    assert_eq!(
        scheduler.step_jobs(Direction::Backward, 3, 100, |_| false),
        vec![1, 0]
    );
}

#[test]
fn retention_window_for_focus_fifty() {
    let scheduler = WindowScheduler::new(30);

    assert_eq!(scheduler.retention_range(50, 100), (20, 80));
    for index in 0..100 {
        assert_eq!(
            scheduler.retains(index, 50, 100),
            (20..=80).contains(&index),
            "index {}",
            index
        );
    }
}
