#![expect(clippy::expect_used)]
//! Tests for the regeneration scheduler and its overlap gate.

use std::sync::Arc;
use std::time::Duration;

use icsfeed_test::icsfeed_service::regenerate::{Regenerator, SchedulerState, TickOutcome};

use super::helpers::*;

fn started(outcome: TickOutcome) -> tokio::task::JoinHandle<()> {
    match outcome {
        TickOutcome::Started(handle) => handle,
        TickOutcome::Skipped => panic!("tick should have started a cycle"),
    }
}

#[test_log::test(tokio::test)]
async fn tick_runs_a_cycle_and_returns_to_idle() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 3600));
    let regenerator = Regenerator::new(Arc::new(provider.clone()), workspace.config.clone());

    assert_eq!(regenerator.state(), SchedulerState::Idle);

    started(regenerator.tick()).await.expect("cycle task should not panic");

    assert_eq!(regenerator.state(), SchedulerState::Idle);
    assert!(workspace.read_feed(5).is_some());
    assert_eq!(provider.released(), 1);
}

#[test_log::test(tokio::test)]
async fn tick_while_running_is_skipped() {
    let workspace = Workspace::new();
    let (provider, pause) = MemoryProvider::new()
        .with_event(event(1, 5, 0, 3600))
        .paused();
    let regenerator = Regenerator::new(Arc::new(provider.clone()), workspace.config.clone());

    let first = started(regenerator.tick());
    pause.wait_until_reached().await;

    assert_eq!(regenerator.state(), SchedulerState::Running);
    assert!(matches!(regenerator.tick(), TickOutcome::Skipped));
    assert!(matches!(regenerator.tick(), TickOutcome::Skipped));

    pause.resume();
    first.await.expect("cycle task should not panic");

    assert_eq!(regenerator.state(), SchedulerState::Idle);
    assert_eq!(provider.acquired(), 1);
    assert!(workspace.read_feed(5).is_some());
}

#[test_log::test(tokio::test)]
async fn failed_cycle_does_not_stop_later_ticks() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 3600));
    provider.fail_category_listing();
    let regenerator = Regenerator::new(Arc::new(provider.clone()), workspace.config.clone());

    started(regenerator.tick()).await.expect("cycle task should not panic");
    assert_eq!(regenerator.state(), SchedulerState::Idle);
    assert!(workspace.read_feed(5).is_none());

    provider.heal();
    started(regenerator.tick()).await.expect("cycle task should not panic");

    assert!(workspace.read_feed(5).is_some());
    assert_eq!(provider.acquired(), 2);
    assert_eq!(provider.released(), 2);
}

#[test_log::test(tokio::test)]
async fn run_ticks_until_shutdown() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 3600));
    let regenerator = Regenerator::new(Arc::new(provider.clone()), workspace.config.clone());

    regenerator
        .run(
            Duration::from_millis(20),
            tokio::time::sleep(Duration::from_millis(200)),
        )
        .await;

    // The last cycle may still be in flight when `run` returns.
    for _ in 0..100 {
        if regenerator.state() == SchedulerState::Idle {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(regenerator.state(), SchedulerState::Idle);
    assert!(provider.acquired() >= 1);
    assert_eq!(provider.acquired(), provider.released());
    assert!(workspace.read_feed(5).is_some());
}

#[test_log::test(tokio::test)]
async fn run_returns_immediately_on_shutdown() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new();
    let regenerator = Regenerator::new(Arc::new(provider), workspace.config.clone());

    tokio::time::timeout(
        Duration::from_secs(5),
        regenerator.run(Duration::from_secs(3600), std::future::ready(())),
    )
    .await
    .expect("run should stop once shutdown resolves");
}
