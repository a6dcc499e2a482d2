//! Security Tests: Password Isolation
//!
//! A password delivered through the response gate must reach the shell and
//! nothing else: not the collected output, not the emitted events, not the
//! prompt message.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::time::Duration;
use test_utils::{RecordingSink, ScriptedSession};

use shellpilot::models::{CommandSequence, SessionOutcome};
use shellpilot::{CommandSequencer, EngineConfig};

const PASSWORD: &str = "hunter2-super-secret";

#[tokio::test]
async fn test_password_not_in_output_or_events() {
    let sequencer = CommandSequencer::new(EngineConfig::default()).unwrap();
    let gate = sequencer.gate();

    let sequence = CommandSequence::single("sudo ls /root");
    let session = ScriptedSession::new()
        .on_line(&["Password:"])
        .on_line(&["authorized\n", "$ "]);
    let sent = session.sent_handle();
    let sink = RecordingSink::new();
    let task_sink = sink.clone();

    let run = tokio::spawn(async move {
        let mut session = session;
        sequencer
            .run_with_session(&sequence, &mut session, &task_sink)
            .await
    });

    for _ in 0..100 {
        if !sink.prompts().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    gate.deliver(PASSWORD);

    let outcome = run.await.unwrap();

    // The password went to the shell, exactly once.
    let sent = sent.lock().unwrap().clone();
    assert_eq!(sent.iter().filter(|l| l.as_str() == PASSWORD).count(), 1);

    // ...and nowhere else.
    match &outcome {
        SessionOutcome::Completed(output) => {
            assert!(!output.contains(PASSWORD), "password leaked into combined output")
        }
        other => panic!("expected completion, got {:?}", other),
    }
    for output in sink.outputs() {
        assert!(
            !output.contains(PASSWORD),
            "password leaked into output event: {:?}",
            output
        );
    }
    for prompt in sink.prompts() {
        assert!(
            !prompt.message.contains(PASSWORD),
            "password leaked into prompt message"
        );
    }
}

#[tokio::test]
async fn test_prompt_message_carries_only_prompt_text() {
    let sequencer = CommandSequencer::new(EngineConfig::default()).unwrap();
    let gate = sequencer.gate();

    let sequence = CommandSequence::single("sudo true");
    let session = ScriptedSession::new()
        .on_line(&["[sudo] password for alice:"])
        .on_line(&["$ "]);
    let sink = RecordingSink::new();
    let task_sink = sink.clone();

    let run = tokio::spawn(async move {
        let mut session = session;
        sequencer
            .run_with_session(&sequence, &mut session, &task_sink)
            .await
    });

    for _ in 0..100 {
        if !sink.prompts().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    gate.deliver(PASSWORD);
    run.await.unwrap();

    let prompts = sink.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].message, "[sudo] password for alice:");
}
