use crate::domain::events::{GameEvent, NightAction, PlayerAction, WitchChoice};
use crate::domain::flow::{apply, settle, transition};
use crate::domain::phase::Phase;
use crate::domain::state::GameState;
use crate::domain::test_state_helpers::{
    act, night_act, play_night, six_seat_game, start, talk_through, NightScript,
};
use crate::domain::turns::pending_action;
use crate::errors::domain::{DomainError, NotFoundKind, RejectKind};

#[test]
fn lobby_waits_for_start() {
    let s = settle(six_seat_game()).unwrap();
    assert_eq!(s.phase, Phase::Lobby);
    assert_eq!(pending_action(&s), None);
}

#[test]
fn start_only_from_lobby() {
    let s = start(&six_seat_game());
    let err = apply(&s, &GameEvent::Start).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Rejected(RejectKind::PhaseMismatch, _)
    ));
}

#[test]
fn engine_transitions_off_the_table_are_errors() {
    let mut s = start(&six_seat_game());
    s.phase = Phase::DayVote;
    let err = transition(&mut s, Phase::NightWitchAction).unwrap_err();
    assert_eq!(
        err,
        DomainError::IllegalTransition {
            from: Phase::DayVote,
            to: Phase::NightWitchAction
        }
    );
    // Nothing applied.
    assert_eq!(s.phase, Phase::DayVote);
}

#[test]
fn settle_is_idempotent() {
    let s = start(&six_seat_game());
    let again = settle(s.clone()).unwrap();
    assert_eq!(again, s);
}

#[test]
fn unknown_seat_is_not_found() {
    let s = start(&six_seat_game());
    let err = apply(
        &s,
        &GameEvent::Act {
            seat: 42,
            action: PlayerAction::FinishSpeaking,
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Seat, _)));
}

#[test]
fn action_in_wrong_phase_is_phase_mismatch() {
    let s = start(&six_seat_game());
    let err = apply(
        &s,
        &GameEvent::Act {
            seat: 5,
            action: PlayerAction::CastVote { target: 0 },
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Rejected(RejectKind::PhaseMismatch, _)
    ));
}

#[test]
fn rejected_action_leaves_state_untouched() {
    let s = start(&six_seat_game());
    let before = s.clone();
    let _ = apply(
        &s,
        &GameEvent::Act {
            seat: 0,
            action: PlayerAction::NightAction {
                action: NightAction::Guard { target: Some(1) },
            },
        },
    )
    .unwrap_err();
    assert_eq!(s, before);
}

#[test]
fn night_start_carries_guard_and_seer_memory_only() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: Some(2),
            wolf: 3,
            witch: WitchChoice::Save,
            seer: 0,
        },
    );
    let mut s = talk_through(&s);
    s.votes.clear();
    // Force a tie so the day ends without an elimination.
    for (voter, target) in [(0, 2), (1, 2), (2, 0), (3, 0), (4, 1), (5, 1)] {
        s = act(&s, voter, PlayerAction::CastVote { target });
    }
    assert_eq!(s.day, 2);
    let night = &s.night_actions;
    assert_eq!(night.last_guard_target, Some(2));
    assert_eq!(night.guard_target, None);
    assert!(night.wolf_votes.is_empty());
    assert_eq!(night.wolf_target, None);
    assert!(!night.witch_save);
    assert_eq!(night.seer_history.len(), 1);
    assert!(s.role_abilities.witch_heal_used);
}

#[test]
fn serialized_state_resumes_identically() {
    let s = start(&six_seat_game());
    let s = night_act(&s, 5, NightAction::Guard { target: Some(4) });

    let json = serde_json::to_string(&s).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, s);

    let script = NightScript {
        guard: None,
        wolf: 2,
        witch: WitchChoice::Pass,
        seer: 1,
    };
    let a = talk_through(&play_night(&s, script));
    let b = talk_through(&play_night(&restored, script));
    assert_eq!(a, b);
}
