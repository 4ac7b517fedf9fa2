#![expect(clippy::expect_used)]
//! Tests for a single regeneration cycle.

use icsfeed_test::icsfeed_service::error::{CategoryError, CycleError};
use icsfeed_test::icsfeed_service::regenerate::run_cycle;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn single_event_feed_matches_expected_document() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 3600));

    let report = run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    assert_eq!(report.written, vec![5]);
    assert!(report.is_clean());
    assert_eq!(
        workspace.read_feed(5).expect("5.ics should exist"),
        format!(
            "{HEADER}\n\
BEGIN:VEVENT\n\
UID:1-5\n\
DTSTAMP:19700101T000000Z\n\
SUMMARY:Event 1\n\
DESCRIPTION:\n\
DTSTART:19700101T000000Z\n\
DTEND:19700101T010000Z\n\
LAST-MODIFIED:19700101T000000Z\n\
LOCATION:\n\
END:VEVENT\n\
END:VCALENDAR"
        )
    );
}

#[test_log::test(tokio::test)]
async fn shipped_template_yields_uid_and_dtstamp_in_every_event() {
    let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/event.ics.tmpl");
    let source = std::fs::read_to_string(shipped).expect("read shipped template");
    let workspace = Workspace::with_template(&source);
    let provider = MemoryProvider::new()
        .with_event(event(1, 5, 0, 3600))
        .with_event(event(2, 5, 7200, 1800))
        .with_event(event(3, 6, 86_400, 60));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    for category_id in [5, 6] {
        let document = workspace.read_feed(category_id).expect("feed should exist");
        let blocks = event_blocks(&document);
        assert!(!blocks.is_empty(), "{document}");

        for block in blocks {
            assert_eq!(
                block.iter().filter(|line| line.starts_with("UID:")).count(),
                1,
                "{block:?}"
            );
            assert_eq!(
                block.iter().filter(|line| line.starts_with("DTSTAMP:")).count(),
                1,
                "{block:?}"
            );
            assert!(block.iter().any(|line| line.starts_with("DTSTART:")), "{block:?}");
        }
    }
}

#[test_log::test(tokio::test)]
async fn feeds_land_at_the_configured_feed_path() {
    let mut workspace = Workspace::new();
    workspace.config.extension = "ical".to_string();
    let provider = MemoryProvider::new().with_event(event(1, 12, 0, 60));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    assert_eq!(
        workspace.feed_path(12),
        workspace.destination().join("12.ical")
    );
    assert!(workspace.read_feed(12).is_some());
    assert_eq!(workspace.entries(), vec!["12.ical".to_string()]);
}

#[test_log::test(tokio::test)]
async fn description_markup_is_removed_and_text_escaped() {
    let workspace = Workspace::new();
    let mut exam = event(3, 2, 1_614_834_367, 5400);
    exam.name = "Algebra; part 2".to_string();
    exam.description_html = "<p>Bring <b>a pencil</b>, please</p>".to_string();
    exam.location = "Room 4".to_string();
    let provider = MemoryProvider::new().with_event(exam);

    run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    let document = workspace.read_feed(2).expect("2.ics should exist");
    assert!(document.contains("\nSUMMARY:Algebra\\; part 2\n"), "{document}");
    assert!(document.contains("\nDESCRIPTION:Bring a pencil\\, please\n"), "{document}");
    assert!(document.contains("\nLOCATION:Room 4\n"), "{document}");
    assert!(document.contains("\nDTSTART:20210304T050607Z\n"), "{document}");
    assert!(document.contains("\nDTEND:20210304T063607Z\n"), "{document}");
}

#[test_log::test(tokio::test)]
async fn one_file_per_category_with_events() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new()
        .with_event(event(1, 5, 0, 60))
        .with_event(event(2, 5, 60, 60))
        .with_event(event(3, 9, 0, 60));

    let report = run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    assert_eq!(report.written, vec![5, 9]);
    assert_eq!(workspace.entries(), vec!["5.ics", "9.ics"]);

    let five = workspace.read_feed(5).expect("5.ics should exist");
    assert_eq!(uids(&five), vec!["1-5", "2-5"]);
    let nine = workspace.read_feed(9).expect("9.ics should exist");
    assert_eq!(uids(&nine), vec!["3-9"]);
}

#[test_log::test(tokio::test)]
async fn no_categories_writes_nothing() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new();

    let report = run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    assert!(report.written.is_empty());
    assert!(report.is_clean());
    assert!(workspace.entries().is_empty());
}

#[test_log::test(tokio::test)]
async fn regeneration_is_byte_identical_when_data_is_unchanged() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new()
        .with_event(event(1, 5, 0, 3600))
        .with_event(event(2, 5, 7200, 3600));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("first cycle should succeed");
    let first = std::fs::read(workspace.feed_path(5)).expect("read first feed");

    run_cycle(&provider, &workspace.config)
        .await
        .expect("second cycle should succeed");
    let second = std::fs::read(workspace.feed_path(5)).expect("read second feed");

    assert_eq!(first, second);
}

#[test_log::test(tokio::test)]
async fn new_events_appear_on_the_next_cycle() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 3600));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("first cycle should succeed");
    provider.insert_event(event(2, 5, 3600, 3600));
    run_cycle(&provider, &workspace.config)
        .await
        .expect("second cycle should succeed");

    let document = workspace.read_feed(5).expect("5.ics should exist");
    assert_eq!(uids(&document), vec!["1-5", "2-5"]);
}

#[test_log::test(tokio::test)]
async fn category_events_failure_is_isolated() {
    let workspace = Workspace::new();
    workspace.seed_feed(7, "previous feed");
    let provider = MemoryProvider::new()
        .with_event(event(1, 5, 0, 60))
        .with_event(event(2, 7, 0, 60))
        .with_event(event(3, 9, 0, 60));
    provider.fail_events_for(7);

    let report = run_cycle(&provider, &workspace.config)
        .await
        .expect("category failures must not abort the cycle");

    assert_eq!(report.written, vec![5, 9]);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0], (7, CategoryError::Events(_))));

    assert_eq!(workspace.read_feed(7).as_deref(), Some("previous feed"));
    assert!(workspace.read_feed(5).is_some());
    assert!(workspace.read_feed(9).is_some());
}

#[test_log::test(tokio::test)]
async fn write_failure_is_isolated() {
    let workspace = Workspace::new();
    std::fs::create_dir(workspace.feed_path(8)).expect("block 8.ics with a directory");
    let provider = MemoryProvider::new()
        .with_event(event(1, 8, 0, 60))
        .with_event(event(2, 9, 0, 60));

    let report = run_cycle(&provider, &workspace.config)
        .await
        .expect("write failures must not abort the cycle");

    assert_eq!(report.written, vec![9]);
    assert!(matches!(report.failed.as_slice(), [(8, CategoryError::Write(_))]));
    assert!(workspace.feed_path(8).is_dir());
    assert_eq!(workspace.entries(), vec!["8.ics", "9.ics"]);
}

#[test_log::test(tokio::test)]
async fn categories_failure_aborts_and_keeps_files() {
    let workspace = Workspace::new();
    workspace.seed_feed(5, "previous feed");
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 60));
    provider.fail_category_listing();

    let err = run_cycle(&provider, &workspace.config)
        .await
        .expect_err("categories failure must abort the cycle");

    assert!(matches!(err, CycleError::Categories(_)), "{err}");
    assert_eq!(workspace.read_feed(5).as_deref(), Some("previous feed"));
    assert_eq!(workspace.entries(), vec!["5.ics"]);
}

#[test_log::test(tokio::test)]
async fn connection_failure_aborts_and_keeps_files() {
    let workspace = Workspace::new();
    workspace.seed_feed(5, "previous feed");
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 60));
    provider.fail_acquire();

    let err = run_cycle(&provider, &workspace.config)
        .await
        .expect_err("connection failure must abort the cycle");

    assert!(matches!(err, CycleError::Connect(_)), "{err}");
    assert_eq!(workspace.read_feed(5).as_deref(), Some("previous feed"));
}

#[test_log::test(tokio::test)]
async fn broken_template_aborts_before_touching_the_store() {
    let workspace = Workspace::with_template("BEGIN:VEVENT\nUID:{{ uid\nEND:VEVENT");
    workspace.seed_feed(5, "previous feed");
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 60));

    let err = run_cycle(&provider, &workspace.config)
        .await
        .expect_err("broken template must abort the cycle");

    assert!(matches!(err, CycleError::Template(_)), "{err}");
    assert_eq!(provider.acquired(), 0);
    assert_eq!(workspace.read_feed(5).as_deref(), Some("previous feed"));
}

#[test_log::test(tokio::test)]
async fn template_edits_apply_on_the_next_cycle() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new().with_event(event(1, 5, 0, 60));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("first cycle should succeed");
    workspace.replace_template("BEGIN:VEVENT\nUID:{{uid}}\nEND:VEVENT");
    run_cycle(&provider, &workspace.config)
        .await
        .expect("second cycle should succeed");

    assert_eq!(
        workspace.read_feed(5).expect("5.ics should exist"),
        format!("{HEADER}\nBEGIN:VEVENT\nUID:1-5\nEND:VEVENT\nEND:VCALENDAR")
    );
}

#[test_log::test(tokio::test)]
async fn store_handle_is_released_on_every_outcome() {
    let workspace = Workspace::new();
    let provider = MemoryProvider::new()
        .with_event(event(1, 5, 0, 60))
        .with_event(event(2, 7, 0, 60));

    run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    provider.fail_events_for(7);
    run_cycle(&provider, &workspace.config)
        .await
        .expect("category failures must not abort the cycle");

    provider.fail_category_listing();
    run_cycle(&provider, &workspace.config)
        .await
        .expect_err("categories failure must abort the cycle");

    assert_eq!(provider.acquired(), 3);
    assert_eq!(provider.released(), 3);
}

#[test_log::test(tokio::test)]
async fn uids_are_unique_across_all_feeds() {
    let workspace = Workspace::new();
    let mut provider = MemoryProvider::new();
    for category_id in [1, 2, 3] {
        for event_id in 1..=4 {
            provider = provider.with_event(event(event_id * 10 + category_id, category_id, 0, 60));
        }
    }

    run_cycle(&provider, &workspace.config)
        .await
        .expect("cycle should succeed");

    let mut seen = std::collections::HashSet::new();
    for category_id in [1, 2, 3] {
        let document = workspace.read_feed(category_id).expect("feed should exist");
        for uid in uids(&document) {
            let (event_id, category) = uid.split_once('-').expect("uid has a separator");
            assert_eq!(category, category_id.to_string());
            assert!(event_id.parse::<i64>().is_ok(), "{uid}");
            assert!(seen.insert(uid.to_string()), "duplicate uid {uid}");
        }
    }
    assert_eq!(seen.len(), 12);
}
