//! Load-pipeline behavior against a scripted channel: fatal enumerator
//! failures, degraded snapshots, and the state machine around them.

mod support;

use support::{DETACH_BIN, MemSink, MockChannel, Reply, cmds};
use zdetach::app::load_model;
use zdetach::events::{self, Action};
use zdetach::logic::apply_load_outcome;
use zdetach::state::{AppState, LoadingState};

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyModifiers};

fn detach_list_cmd() -> String {
    format!("{DETACH_BIN} list")
}

#[tokio::test]
async fn happy_path_reconciles_and_reaches_ready() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("package:app.a\npackage:app.b\n")),
        (list_cmd.as_str(), Reply::ok("app.b\n")),
    ]);
    let sink = MemSink::new();
    let outcome = load_model(&chan, &sink, &cmds()).await.expect("load ok");
    assert_eq!(outcome.entries.len(), 2);
    assert!(outcome.warnings.is_empty());

    let mut app = AppState::default();
    app.loading = LoadingState::Loading;
    apply_load_outcome(&mut app, Ok(outcome));
    assert_eq!(app.loading, LoadingState::Ready);
    assert_eq!(app.selection.snapshot(), vec!["app.b"]);

    // both reads went out, each as one round trip
    let calls = chan.calls();
    assert!(calls.contains(&"pm list packages".to_string()));
    assert!(calls.contains(&detach_list_cmd()));
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn enumerator_failure_is_fatal_and_discards_snapshot() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::fail(1, "pm: failure\n")),
        (list_cmd.as_str(), Reply::ok("app.b\n")),
    ]);
    let sink = MemSink::new();
    let messages = load_model(&chan, &sink, &cmds())
        .await
        .expect_err("must be fatal");
    assert_eq!(messages[0], "Error: pm: failure (see log)");
    assert_eq!(messages[1], "Failed to list packages.");

    let mut app = AppState::default();
    app.loading = LoadingState::Loading;
    apply_load_outcome(&mut app, Err(messages));
    assert_eq!(app.loading, LoadingState::Error);
    assert!(app.entries.is_empty());

    // commit stays disabled in the terminal error state
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let commit = CEvent::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    assert_eq!(events::handle_event(&mut app, &commit, &tx), Action::None);
}

#[tokio::test]
async fn snapshot_failure_degrades_with_warning() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("package:app.a\n")),
        (list_cmd.as_str(), Reply::fail(1, "helper busy\n")),
    ]);
    let sink = MemSink::new();
    let outcome = load_model(&chan, &sink, &cmds()).await.expect("load ok");
    assert_eq!(outcome.entries.len(), 1);
    assert!(!outcome.entries[0].initially_detached);
    assert!(!outcome.entries[0].orphaned);
    assert_eq!(
        outcome.warnings,
        vec!["Warning: Could not get detached list. Proceeding as if none are detached."]
    );

    let mut app = AppState::default();
    app.loading = LoadingState::Loading;
    apply_load_outcome(&mut app, Ok(outcome));
    assert_eq!(app.loading, LoadingState::Ready);
}

#[tokio::test]
async fn blank_enumerator_output_is_fatal() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("\n\n")),
        (list_cmd.as_str(), Reply::ok("")),
    ]);
    let sink = MemSink::new();
    let messages = load_model(&chan, &sink, &cmds())
        .await
        .expect_err("blank enumeration cannot be legitimate");
    assert_eq!(messages, vec!["No packages found."]);
}

#[tokio::test]
async fn blank_snapshot_is_a_legitimate_empty_set() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("package:app.a\n")),
        (list_cmd.as_str(), Reply::ok("")),
    ]);
    let sink = MemSink::new();
    let outcome = load_model(&chan, &sink, &cmds()).await.expect("load ok");
    assert!(outcome.warnings.is_empty());
    assert!(!outcome.entries[0].initially_detached);
}

#[tokio::test]
async fn transport_failure_surfaces_critical_notice() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::transport("channel down")),
        (list_cmd.as_str(), Reply::ok("")),
    ]);
    let sink = MemSink::new();
    let messages = load_model(&chan, &sink, &cmds())
        .await
        .expect_err("must be fatal");
    assert_eq!(messages[0], "Critical error executing command.");
    // transport failures never ran, so nothing lands in the durable sink
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn orphans_warn_and_stay_listed() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("package:app.a\n")),
        (list_cmd.as_str(), Reply::ok("app.a\napp.gone\n")),
    ]);
    let sink = MemSink::new();
    let outcome = load_model(&chan, &sink, &cmds()).await.expect("load ok");
    assert_eq!(
        outcome.warnings,
        vec!["Warning: 1 app(s) in detach list but not installed. They will be kept in the list."]
    );
    let orphan = outcome
        .entries
        .iter()
        .find(|e| e.name == "app.gone")
        .expect("orphan row");
    assert!(orphan.initially_detached && orphan.orphaned);

    // seeded selection keeps the orphan so an unchanged commit preserves it
    let mut app = AppState::default();
    apply_load_outcome(&mut app, Ok(outcome));
    assert_eq!(app.selection.snapshot(), vec!["app.a", "app.gone"]);
}

#[tokio::test]
async fn failed_command_leaves_a_durable_record() {
    let list_cmd = detach_list_cmd();
    let chan = MockChannel::new(vec![
        ("pm list packages", Reply::ok("package:app.a\n")),
        (list_cmd.as_str(), Reply::fail(13, "permission denied\ncontext\n")),
    ]);
    let sink = MemSink::new();
    let _ = load_model(&chan, &sink, &cmds()).await;
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cmd, detach_list_cmd());
    assert!(records[0].stderr.contains("permission denied"));
    assert!(records[0].stderr.contains("context"));
}
