//! Integration tests for sequence execution against a scripted session

#[path = "../test_utils/mod.rs"]
mod test_utils;

use test_utils::{EmptyRead, RecordingSink, ScriptedSession};

use shellpilot::models::{CommandEntry, CommandSequence, SessionOutcome};
use shellpilot::{CommandSequencer, EngineConfig};

fn sequencer() -> CommandSequencer {
    CommandSequencer::new(EngineConfig::default()).unwrap()
}

#[tokio::test]
async fn test_multi_command_output_preserves_order() {
    let sequence = CommandSequence::new(vec![
        CommandEntry::new(1, "echo one"),
        CommandEntry::new(2, "echo two"),
        CommandEntry::new(3, "echo three"),
    ]);
    let mut session = ScriptedSession::new()
        .on_line(&["one\n", "$ "])
        .on_line(&["two\n", "$ "])
        .on_line(&["three\n", "$ "]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(
        outcome,
        SessionOutcome::Completed("one\ntwo\nthree".to_string())
    );
    assert_eq!(
        session.sent_lines(),
        vec!["echo one", "echo two", "echo three"]
    );
}

#[tokio::test]
async fn test_output_and_boundary_in_one_chunk() {
    let sequence = CommandSequence::single("ls");
    let mut session = ScriptedSession::new().on_line(&["file1\nfile2\n$ "]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(
        outcome,
        SessionOutcome::Completed("file1\nfile2".to_string())
    );
}

#[tokio::test]
async fn test_empty_output_completes_with_empty_marker() {
    // Two commands, no output, boundary prompt after each: Completed("")
    // with exactly one on_output batch per command (the start notice) and
    // exactly one on_finished.
    let sequence = CommandSequence::new(vec![
        CommandEntry::new(1, "mkdir foo"),
        CommandEntry::new(2, "cd foo"),
    ]);
    let mut session = ScriptedSession::new().on_line(&["$ "]).on_line(&["$ "]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(outcome, SessionOutcome::Completed(String::new()));

    let outputs = sink.outputs();
    assert_eq!(outputs.len(), 2);
    assert!(outputs[0].contains("1 of 2"));
    assert!(outputs[0].contains("mkdir foo"));
    assert!(outputs[1].contains("2 of 2"));
    assert!(outputs[1].contains("cd foo"));

    assert_eq!(sink.finishes().len(), 1);
}

#[tokio::test]
async fn test_finished_fires_exactly_once() {
    let sequence = CommandSequence::single("pwd");
    let mut session = ScriptedSession::new().on_line(&["/home/alice\n", "$ "]);
    let sink = RecordingSink::new();

    sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(sink.finishes().len(), 1);
}

#[tokio::test]
async fn test_command_output_attribution_order() {
    // Output events for command N are fully emitted before command N+1's
    let sequence = CommandSequence::new(vec![
        CommandEntry::new(1, "first"),
        CommandEntry::new(2, "second"),
    ]);
    let mut session = ScriptedSession::new()
        .on_line(&["alpha\n", "beta\n", "$ "])
        .on_line(&["gamma\n", "$ "]);
    let sink = RecordingSink::new();

    sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    let outputs = sink.outputs();
    let second_notice = outputs
        .iter()
        .position(|o| o.contains("2 of 2"))
        .expect("second command notice missing");
    let gamma = outputs
        .iter()
        .position(|o| o.contains("gamma"))
        .expect("second command output missing");
    for (index, output) in outputs.iter().enumerate() {
        if output.contains("alpha") || output.contains("beta") {
            assert!(index < second_notice, "command 1 output leaked after command 2 began");
        }
    }
    assert!(gamma > second_notice);
}

#[tokio::test]
async fn test_total_mismatch_rejected_before_session_is_touched() {
    let sequence = CommandSequence {
        commands: vec![CommandEntry::new(1, "pwd")],
        total_commands: 5,
    };
    let mut session = ScriptedSession::new().on_line(&["$ "]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert!(matches!(outcome, SessionOutcome::Failed(_)));
    assert!(session.sent_lines().is_empty());
    assert_eq!(sink.finishes().len(), 1);
}

#[tokio::test]
async fn test_empty_sequence_rejected() {
    let sequence = CommandSequence {
        commands: vec![],
        total_commands: 0,
    };
    let mut session = ScriptedSession::new();
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    match outcome {
        SessionOutcome::Failed(reason) => assert!(reason.contains("empty")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(session.sent_lines().is_empty());
}

#[tokio::test]
async fn test_early_stream_close_keeps_collected_output() {
    // The shell exits in the middle of command 2: the run finalizes with
    // everything collected so far instead of failing.
    let sequence = CommandSequence::new(vec![
        CommandEntry::new(1, "echo start"),
        CommandEntry::new(2, "exit"),
    ]);
    let mut session = ScriptedSession::new()
        .on_line(&["start\n", "$ "])
        .on_line(&["bye\n"]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(outcome, SessionOutcome::Completed("start\nbye".to_string()));
    assert!(session.was_closed());
}

#[tokio::test]
async fn test_idle_timeout_fails_the_run() {
    let mut config = EngineConfig::default();
    config.idle_timeout_secs = 1;
    let sequencer = CommandSequencer::new(config).unwrap();

    let sequence = CommandSequence::single("sleep forever");
    let mut session = ScriptedSession::new().when_empty(EmptyRead::Hang);
    let sink = RecordingSink::new();

    let outcome = sequencer
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    match outcome {
        SessionOutcome::Failed(reason) => {
            assert!(reason.contains("sleep forever"), "reason: {}", reason)
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(session.was_closed());
}

#[tokio::test]
async fn test_ansi_noise_is_sanitized_in_output() {
    let sequence = CommandSequence::single("ls");
    let mut session =
        ScriptedSession::new().on_line(&["\x1b[1;34mblue.txt\x1b[0m\n", "\x1b[0m$ "]);
    let sink = RecordingSink::new();

    let outcome = sequencer()
        .run_with_session(&sequence, &mut session, &sink)
        .await;

    assert_eq!(outcome, SessionOutcome::Completed("blue.txt".to_string()));
    for output in sink.outputs() {
        assert!(!output.contains('\x1b'), "escape leaked into {:?}", output);
    }
}
