use super::*;

fn red_blue() -> Poll {
    Poll::parse_create("/create red blue").expect("valid create")
}

// =============================================================================
// marker priority
// =============================================================================

#[test]
fn create_marker_classifies_create() {
    let cmd = classify("/create red blue", None).unwrap();
    assert_eq!(cmd, Command::CreatePoll { command: "/create red blue".into() });
}

#[test]
fn create_payload_is_the_literal_line() {
    let line = "Favorite color /create red blue";
    let Some(Command::CreatePoll { command }) = classify(line, None) else {
        panic!("expected create");
    };
    assert_eq!(command, line);
}

#[test]
fn close_marker_classifies_close() {
    assert_eq!(classify("/close", None).unwrap(), Command::ClosePoll);
    assert_eq!(classify("time to stop /close", None).unwrap(), Command::ClosePoll);
}

#[test]
fn create_beats_vote_sigil() {
    let poll = red_blue();
    let cmd = classify("#red /create red blue", Some(&poll)).unwrap();
    assert!(matches!(cmd, Command::CreatePoll { .. }));
}

#[test]
fn create_beats_close() {
    let cmd = classify("/close then /create a b", None).unwrap();
    assert!(matches!(cmd, Command::CreatePoll { .. }));
}

// =============================================================================
// votes
// =============================================================================

#[test]
fn sigil_with_matching_option_is_a_vote() {
    let poll = red_blue();
    let cmd = classify("#red I like red", Some(&poll)).unwrap();
    assert_eq!(cmd, Command::Vote { vote: "#red I like red".into() });
}

#[test]
fn sigil_without_active_poll_is_plain_message() {
    let cmd = classify("#red", None).unwrap();
    assert_eq!(cmd, Command::Say { message: "#red".into() });
}

#[test]
fn sigil_matching_neither_option_is_plain_message() {
    let poll = red_blue();
    let cmd = classify("#green", Some(&poll)).unwrap();
    assert_eq!(cmd, Command::Say { message: "#green".into() });
}

#[test]
fn option_text_without_sigil_is_plain_message() {
    let poll = red_blue();
    let cmd = classify("red is best", Some(&poll)).unwrap();
    assert!(matches!(cmd, Command::Say { .. }));
}

// =============================================================================
// plain messages and blanks
// =============================================================================

#[test]
fn plain_text_is_a_message() {
    let cmd = classify("hello", None).unwrap();
    assert_eq!(cmd, Command::Say { message: "hello".into() });
}

#[test]
fn empty_input_produces_nothing() {
    assert_eq!(classify("", None), None);
    assert_eq!(classify("   ", None), None);
    let poll = red_blue();
    assert_eq!(classify("\t", Some(&poll)), None);
}

#[test]
fn classification_is_deterministic() {
    let poll = red_blue();
    let first = classify("#blue!", Some(&poll));
    for _ in 0..10 {
        assert_eq!(classify("#blue!", Some(&poll)), first);
    }
}
