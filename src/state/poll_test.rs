use super::*;

fn active(command: &str) -> PollState {
    let mut state = PollState::new();
    state.create(command);
    assert!(state.active().is_some(), "poll should be active");
    state
}

// =============================================================================
// parse_create
// =============================================================================

#[test]
fn parse_create_simple() {
    let poll = Poll::parse_create("/create red blue").unwrap();
    assert_eq!(poll.title, "red blue");
    assert_eq!(poll.option_a, "red");
    assert_eq!(poll.option_b, "blue");
    assert_eq!((poll.votes_a, poll.votes_b), (0, 0));
    assert!(poll.voters.is_empty());
}

#[test]
fn parse_create_title_includes_text_around_marker() {
    let poll = Poll::parse_create("Favorite color /create red blue").unwrap();
    assert_eq!(poll.title, "Favorite color red blue");
    assert_eq!(poll.option_a, "red");
    assert_eq!(poll.option_b, "blue");
}

#[test]
fn parse_create_missing_options_is_none() {
    assert!(Poll::parse_create("/create").is_none());
    assert!(Poll::parse_create("/create onlyone").is_none());
    assert!(Poll::parse_create("no marker at all").is_none());
}

#[test]
fn parse_create_extra_tokens_ignored() {
    let poll = Poll::parse_create("/create cats dogs birds").unwrap();
    assert_eq!(poll.option_a, "cats");
    assert_eq!(poll.option_b, "dogs");
}

// =============================================================================
// state machine transitions
// =============================================================================

#[test]
fn create_replaces_active_poll_wholesale() {
    let mut state = active("/create red blue");
    assert!(state.apply_vote("#red", "p1"));

    state.create("/create cats dogs");
    let poll = state.active().unwrap();
    assert_eq!(poll.option_a, "cats");
    assert_eq!((poll.votes_a, poll.votes_b), (0, 0));
    assert!(poll.voters.is_empty());
}

#[test]
fn malformed_create_leaves_state_unchanged() {
    let mut state = active("/create red blue");
    state.create("/create nope");
    assert_eq!(state.active().unwrap().option_a, "red");

    let mut idle = PollState::new();
    idle.create("/create nope");
    assert!(idle.active().is_none());
}

#[test]
fn close_always_returns_to_idle() {
    let mut state = active("/create red blue");
    state.apply_vote("#red", "p1");
    state.close();
    assert!(state.active().is_none());

    // Idle close is a no-op, not an error.
    state.close();
    assert!(state.active().is_none());
}

#[test]
fn create_after_close_starts_from_zero() {
    let mut state = active("/create red blue");
    state.apply_vote("#red", "p1");
    state.close();
    state.create("/create red blue");
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (0, 0));
    assert!(poll.voters.is_empty());
}

// =============================================================================
// votes
// =============================================================================

#[test]
fn vote_increments_matched_option() {
    let mut state = active("/create red blue");
    assert!(state.apply_vote("#blue for me", "p1"));
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (0, 1));
    assert!(poll.voters.contains("p1"));
}

#[test]
fn first_vote_wins_revote_ignored() {
    let mut state = active("/create red blue");
    assert!(state.apply_vote("#red", "p1"));
    assert!(!state.apply_vote("#blue", "p1"));
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (1, 0));
}

#[test]
fn vote_matching_neither_option_ignored() {
    let mut state = active("/create red blue");
    assert!(!state.apply_vote("#green", "p1"));
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (0, 0));
    assert!(poll.voters.is_empty());
}

#[test]
fn vote_with_no_active_poll_ignored() {
    let mut state = PollState::new();
    assert!(!state.apply_vote("#red", "p1"));
}

#[test]
fn option_a_wins_substring_ties() {
    // "cat" is contained in "cats": a vote naming both resolves to A.
    let mut state = active("/create cat cats");
    assert!(state.apply_vote("#cats", "p1"));
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (1, 0));
}

#[test]
fn tallies_always_equal_voter_count() {
    let mut state = active("/create red blue");
    for (text, user) in [
        ("#red", "p1"),
        ("#blue", "p2"),
        ("#red", "p1"),
        ("#green", "p3"),
        ("#blue", "p4"),
    ] {
        state.apply_vote(text, user);
        let poll = state.active().unwrap();
        assert_eq!((poll.votes_a + poll.votes_b) as usize, poll.voters.len());
    }
}

#[test]
fn three_participant_session() {
    let mut state = active("Favorite color /create red blue");
    state.apply_vote("#red", "p2");
    state.apply_vote("#blue", "p3");
    state.apply_vote("#red", "p2");
    let poll = state.active().unwrap();
    assert_eq!((poll.votes_a, poll.votes_b), (1, 1));
    let mut voters: Vec<&str> = poll.voters.iter().map(String::as_str).collect();
    voters.sort_unstable();
    assert_eq!(voters, vec!["p2", "p3"]);
}

// =============================================================================
// snapshots
// =============================================================================

#[test]
fn poll_wire_round_trip() {
    let mut poll = Poll::parse_create("/create red blue").unwrap();
    poll.votes_a = 2;
    poll.votes_b = 1;
    poll.voters = ["p1", "p2", "p3"].map(str::to_owned).into_iter().collect();

    let json = serde_json::to_string(&poll).expect("serialize");
    let restored: Poll = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, poll);
}

#[test]
fn wire_fields_are_camel_case() {
    let poll = Poll::parse_create("/create red blue").unwrap();
    let json = serde_json::to_value(&poll).unwrap();
    for key in ["optionA", "optionB", "votesA", "votesB", "voters"] {
        assert!(json.get(key).is_some(), "missing wire key {key}");
    }
}

#[test]
fn replace_treats_empty_title_as_idle() {
    let mut state = PollState::new();
    let empty = Poll {
        title: String::new(),
        option_a: String::new(),
        option_b: String::new(),
        votes_a: 0,
        votes_b: 0,
        voters: HashSet::new(),
    };
    state.replace(Some(empty));
    assert!(state.active().is_none());

    state.replace(Some(Poll::parse_create("/create red blue").unwrap()));
    assert!(state.active().is_some());
    state.replace(None);
    assert!(state.active().is_none());
}
