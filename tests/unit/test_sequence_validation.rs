//! Unit tests for command sequence structural validation

use shellpilot::error::Error;
use shellpilot::models::{CommandEntry, CommandSequence};

fn entry(order: u32, command: &str) -> CommandEntry {
    CommandEntry::new(order, command)
}

#[test]
fn test_valid_sequence_passes() {
    let sequence = CommandSequence::new(vec![
        entry(1, "mkdir foo"),
        entry(2, "cd foo"),
        entry(3, "touch bar.txt"),
    ]);
    assert!(sequence.validate().is_ok());
}

#[test]
fn test_empty_sequence_fails_fast() {
    let sequence = CommandSequence {
        commands: vec![],
        total_commands: 0,
    };
    let err = sequence.validate().unwrap_err();
    assert!(matches!(err, Error::MalformedSequence { .. }));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn test_total_commands_mismatch() {
    let sequence = CommandSequence {
        commands: vec![entry(1, "pwd"), entry(2, "ls")],
        total_commands: 3,
    };
    let err = sequence.validate().unwrap_err();
    assert!(matches!(err, Error::MalformedSequence { .. }));
}

#[test]
fn test_order_must_start_at_one() {
    let sequence = CommandSequence {
        commands: vec![entry(0, "pwd")],
        total_commands: 1,
    };
    assert!(sequence.validate().is_err());

    let sequence = CommandSequence {
        commands: vec![entry(2, "pwd")],
        total_commands: 1,
    };
    assert!(sequence.validate().is_err());
}

#[test]
fn test_order_must_be_dense() {
    let sequence = CommandSequence {
        commands: vec![entry(1, "pwd"), entry(3, "ls")],
        total_commands: 2,
    };
    assert!(sequence.validate().is_err());
}

#[test]
fn test_order_must_be_ascending() {
    let sequence = CommandSequence {
        commands: vec![entry(2, "pwd"), entry(1, "ls")],
        total_commands: 2,
    };
    assert!(sequence.validate().is_err());
}

#[test]
fn test_blank_command_rejected() {
    let sequence = CommandSequence::new(vec![entry(1, "   ")]);
    assert!(sequence.validate().is_err());
}

#[test]
fn test_chaining_separators_rejected() {
    for command in [
        "mkdir foo && cd foo",
        "ls || echo failed",
        "cd /tmp; ls",
        "ps aux | grep init",
    ] {
        let sequence = CommandSequence::single(command);
        let err = sequence.validate().unwrap_err();
        assert!(
            matches!(err, Error::MalformedSequence { .. }),
            "command {:?} should be rejected",
            command
        );
    }
}

#[test]
fn test_quoted_separators_are_data_not_chaining() {
    for command in [
        "echo 'a && b'",
        r#"echo "x; y""#,
        r#"grep "a|b" notes.txt"#,
        r"echo one\;two",
    ] {
        let sequence = CommandSequence::single(command);
        assert!(
            sequence.validate().is_ok(),
            "command {:?} should be accepted",
            command
        );
    }
}

#[test]
fn test_wire_format_round_trip() {
    let json = r#"{
        "commands": [
            {"order": 1, "command": "mkdir demo", "needs_dir_change": 0, "needs_file_check": 1},
            {"order": 2, "command": "cd demo", "needs_dir_change": 1, "needs_file_check": 0}
        ],
        "total_commands": 2
    }"#;

    let sequence = CommandSequence::from_json(json).unwrap();
    assert!(sequence.validate().is_ok());
    assert_eq!(sequence.len(), 2);
    assert!(sequence.commands[1].needs_dir_change);

    // Serialized form parses back to the same sequence
    let serialized = serde_json::to_string(&sequence).unwrap();
    let reparsed = CommandSequence::from_json(&serialized).unwrap();
    assert_eq!(reparsed, sequence);
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(CommandSequence::from_json("{not json").is_err());
}
