use crate::domain::events::{GameEvent, NightAction, PlayerAction, WitchChoice};
use crate::domain::flow::apply;
use crate::domain::phase::Phase;
use crate::domain::roles::Alignment;
use crate::domain::state::{GameState, HunterTrigger, MessageKind, SpeechKind, SpeechTurn};
use crate::domain::test_state_helpers::{
    act, kill, night_act, play_night, six_seat_game, start, talk_through, vote_all, NightScript,
};
use crate::domain::turns::{pending_action, ActionKind, PendingAction};
use crate::errors::domain::{DomainError, RejectKind};

fn reject_kind(err: DomainError) -> RejectKind {
    match err {
        DomainError::Rejected(kind, _) => kind,
        other => panic!("expected rejection, got {other:?}"),
    }
}

/// First day after a peaceful night, everyone alive.
fn first_day() -> GameState {
    let s = start(&six_seat_game());
    play_night(
        &s,
        NightScript {
            guard: Some(3),
            wolf: 3,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    )
}

fn with_turn(state: &GameState, lap_start: u8, seat: u8) -> GameState {
    let mut s = state.clone();
    s.speech.lap_start = Some(lap_start);
    s.speech.turn = Some(SpeechTurn::new(seat, SpeechKind::Day));
    s.current_speaker_seat = Some(seat);
    s
}

#[test]
fn dawn_is_narrated() {
    let s = first_day();
    assert_eq!(s.phase, Phase::DaySpeech);
    let narration: Vec<&str> = s
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::Narration && m.phase == Phase::DayStart)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(narration, vec!["Day 1 dawns after a peaceful night."]);
}

#[test]
fn day_lap_covers_every_living_seat_once_in_ascending_wrap() {
    let s = first_day();
    let start_seat = s.speech.lap_start.unwrap();
    let mut speakers = Vec::new();
    let mut cur = s;
    while cur.phase == Phase::DaySpeech {
        let p = pending_action(&cur).unwrap();
        if speakers.last() != Some(&p.seat) {
            speakers.push(p.seat);
        }
        let event = match p.kind {
            ActionKind::Speech if cur.is_human(p.seat) => GameEvent::Act {
                seat: p.seat,
                action: PlayerAction::FinishSpeaking,
            },
            ActionKind::Speech => GameEvent::SpeechGenerated {
                seat: p.seat,
                fragments: vec!["hm".into()],
            },
            _ => GameEvent::Advance,
        };
        cur = apply(&cur, &event).unwrap();
    }
    let expected: Vec<u8> = (0..6).map(|i| (start_seat + i) % 6).collect();
    assert_eq!(speakers, expected);
    assert_eq!(cur.phase, Phase::DayVote);
}

#[test]
fn autonomous_speech_reveals_one_fragment_per_advance() {
    let s = with_turn(&first_day(), 1, 1);
    let s = apply(
        &s,
        &GameEvent::SpeechGenerated {
            seat: 1,
            fragments: vec!["a".into(), "b".into(), "c".into()],
        },
    )
    .unwrap();
    assert_eq!(s.messages.last().unwrap().text, "a");
    assert_eq!(
        pending_action(&s),
        Some(PendingAction {
            seat: 1,
            kind: ActionKind::Advance
        })
    );

    let s = apply(&s, &GameEvent::Advance).unwrap();
    assert_eq!(s.messages.last().unwrap().text, "b");
    let s = apply(&s, &GameEvent::Advance).unwrap();
    assert_eq!(s.messages.last().unwrap().text, "c");
    assert_eq!(s.current_speaker_seat, Some(1));

    let s = apply(&s, &GameEvent::Advance).unwrap();
    assert_eq!(s.current_speaker_seat, Some(2));
    assert_eq!(
        pending_action(&s),
        Some(PendingAction {
            seat: 2,
            kind: ActionKind::Speech
        })
    );
}

#[test]
fn human_speech_is_fragments_then_finish() {
    let s = with_turn(&first_day(), 1, 5);
    let s = act(
        &s,
        5,
        PlayerAction::SpeechFragment {
            text: "I am the guard.".into(),
        },
    );
    let last = s.messages.last().unwrap();
    assert_eq!(last.seat, Some(5));
    assert_eq!(last.kind, MessageKind::Speech);
    assert_eq!(
        pending_action(&s).map(|p| p.kind),
        Some(ActionKind::Speech)
    );

    let advance = apply(&s, &GameEvent::Advance).unwrap_err();
    assert_eq!(reject_kind(advance), RejectKind::PhaseMismatch);

    let intruder = apply(
        &s,
        &GameEvent::Act {
            seat: 2,
            action: PlayerAction::SpeechFragment { text: "me!".into() },
        },
    )
    .unwrap_err();
    assert_eq!(reject_kind(intruder), RejectKind::OutOfTurn);

    let s = act(&s, 5, PlayerAction::FinishSpeaking);
    assert_eq!(s.current_speaker_seat, Some(0));
}

#[test]
fn votes_are_validated() {
    let s = talk_through(&first_day());
    assert_eq!(s.phase, Phase::DayVote);
    assert!(s.votes.is_empty());

    let self_vote = apply(
        &s,
        &GameEvent::Act {
            seat: 5,
            action: PlayerAction::CastVote { target: 5 },
        },
    )
    .unwrap_err();
    assert_eq!(reject_kind(self_vote), RejectKind::InvalidTarget);

    // The human may vote before the autonomous walk reaches them.
    assert_eq!(pending_action(&s).map(|p| p.seat), Some(0));
    let s = act(&s, 5, PlayerAction::CastVote { target: 0 });
    assert_eq!(s.votes.get(&5), Some(&0));

    let twice = apply(
        &s,
        &GameEvent::Act {
            seat: 5,
            action: PlayerAction::CastVote { target: 1 },
        },
    )
    .unwrap_err();
    assert_eq!(reject_kind(twice), RejectKind::OutOfTurn);
}

#[test]
fn dead_seats_cannot_vote() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 2,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    let s = talk_through(&s);
    let err = apply(
        &s,
        &GameEvent::Act {
            seat: 2,
            action: PlayerAction::CastVote { target: 0 },
        },
    )
    .unwrap_err();
    assert_eq!(reject_kind(err), RejectKind::ActorDead);
}

#[test]
fn tie_eliminates_nobody_and_archives_votes() {
    let s = talk_through(&first_day());
    let s = vote_all(&s, |v| if v < 3 { 4 } else { 0 });
    assert_eq!(s.day, 2);
    assert_eq!(s.living_seats().len(), 6);
    let record = &s.day_history[&1];
    assert!(record.tied);
    assert_eq!(record.eliminated, None);
    assert_eq!(s.vote_history[&1].len(), 6);
    assert_eq!(s.phase, Phase::NightGuardAction);
}

#[test]
fn voted_out_hunter_speaks_then_shoots_then_night_falls() {
    let s = talk_through(&first_day());
    let s = vote_all(&s, |v| if v == 4 { 0 } else { 4 });
    assert!(!s.is_alive(4));
    assert_eq!(s.phase, Phase::DayLastWords);
    assert_eq!(s.last_words_seat, Some(4));
    assert_eq!(
        pending_action(&s),
        Some(PendingAction {
            seat: 4,
            kind: ActionKind::LastWords
        })
    );

    let s = talk_through(&s);
    assert_eq!(s.phase, Phase::HunterShoot);
    assert_eq!(
        s.pending_hunter,
        Some(HunterTrigger {
            seat: 4,
            resume: Phase::NightStart
        })
    );
    assert!(s
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::LastWords && m.seat == Some(4)));

    let s = night_act(&s, 4, NightAction::HunterShoot { target: Some(1) });
    assert_eq!(s.day_history[&1].hunter_shot, Some(1));
    assert_eq!(s.day, 2);
    assert_eq!(s.phase, Phase::NightGuardAction);
}

#[test]
fn voted_out_hunter_shot_can_decide_the_game() {
    // Seat 0 is the last wolf after seats 1 and 2 fall before the game.
    let mut lobby = six_seat_game();
    kill(&mut lobby, 1);
    kill(&mut lobby, 2);
    let s = play_night(
        &start(&lobby),
        NightScript {
            guard: Some(3),
            wolf: 3,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    assert!(s.night_history[&1].peaceful);

    let s = talk_through(&s);
    let s = vote_all(&s, |v| if v == 4 { 0 } else { 4 });
    assert_eq!(s.day_history[&1].eliminated, Some(4));
    assert_eq!(s.winner, None);
    let s = talk_through(&s);
    assert_eq!(s.phase, Phase::HunterShoot);

    let s = night_act(&s, 4, NightAction::HunterShoot { target: Some(0) });

    assert_eq!(s.day_history[&1].hunter_shot, Some(0));
    assert_eq!(s.phase, Phase::GameEnd);
    assert_eq!(s.winner, Some(Alignment::Village));
}

#[test]
fn decisive_vote_ends_game_without_last_words() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 2,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    let s = talk_through(&s);
    let s = vote_all(&s, |v| if v == 3 { 0 } else { 3 });
    assert_eq!(s.phase, Phase::GameEnd);
    assert_eq!(s.winner, Some(Alignment::Wolf));
    assert_eq!(s.last_words_seat, None);
    assert_eq!(s.day_history[&1].eliminated, Some(3));

    let err = apply(&s, &GameEvent::Advance).unwrap_err();
    assert_eq!(reject_kind(err), RejectKind::GameOver);
}
