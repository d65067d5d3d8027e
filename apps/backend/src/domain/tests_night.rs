use crate::domain::events::{GameEvent, NightAction, PlayerAction, WitchChoice};
use crate::domain::flow::apply;
use crate::domain::phase::Phase;
use crate::domain::roles::{Alignment, Role};
use crate::domain::state::{Death, DeathCause, HunterTrigger};
use crate::domain::test_state_helpers::{
    game_with_roles, kill, night_act, play_night, six_seat_game, start, talk_through, vote_all,
    NightScript,
};
use crate::domain::turns::{pending_action, ActionKind, PendingAction};
use crate::errors::domain::{DomainError, RejectKind};

fn reject_kind(err: DomainError) -> RejectKind {
    match err {
        DomainError::Rejected(kind, _) => kind,
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn start_enters_first_night_and_waits_on_guard() {
    let s = start(&six_seat_game());
    assert_eq!(s.phase, Phase::NightGuardAction);
    assert_eq!(s.day, 1);
    assert_eq!(
        pending_action(&s),
        Some(PendingAction {
            seat: 5,
            kind: ActionKind::GuardProtect
        })
    );
}

#[test]
fn guarded_and_healed_victim_dies_of_milk() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: Some(3),
            wolf: 3,
            witch: WitchChoice::Save,
            seer: 0,
        },
    );
    let record = &s.night_history[&1];
    assert_eq!(
        record.deaths,
        vec![Death {
            seat: 3,
            cause: DeathCause::Milk
        }]
    );
    assert!(!record.peaceful);
    assert!(!s.is_alive(3));
    assert!(s.role_abilities.witch_heal_used);
    assert_eq!(s.phase, Phase::DaySpeech);
}

#[test]
fn guarded_victim_without_save_survives() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: Some(3),
            wolf: 3,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    let record = &s.night_history[&1];
    assert!(record.peaceful);
    assert!(record.deaths.is_empty());
    assert!(s.is_alive(3));
}

#[test]
fn healed_unguarded_victim_survives() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 2,
            witch: WitchChoice::Save,
            seer: 0,
        },
    );
    assert!(s.night_history[&1].peaceful);
    assert!(s.is_alive(2));
}

#[test]
fn wolf_attacked_hunter_gets_a_shot_then_day_resumes() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 4,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    assert_eq!(s.phase, Phase::HunterShoot);
    assert_eq!(
        s.pending_hunter,
        Some(HunterTrigger {
            seat: 4,
            resume: Phase::DayStart
        })
    );
    assert_eq!(
        pending_action(&s).map(|p| p.kind),
        Some(ActionKind::HunterShot)
    );

    let s = night_act(&s, 4, NightAction::HunterShoot { target: Some(0) });
    assert!(!s.is_alive(0));
    assert_eq!(s.night_history[&1].hunter_shot, Some(0));
    assert!(!s.role_abilities.hunter_can_shoot);
    assert_eq!(s.pending_hunter, None);
    assert_eq!(s.phase, Phase::DaySpeech);
}

#[test]
fn hunter_shot_at_night_can_decide_the_game() {
    // Seat 0 is the last wolf; Witch, Hunter and Guard remain.
    let mut lobby = six_seat_game();
    kill(&mut lobby, 1);
    kill(&mut lobby, 2);
    let s = play_night(
        &start(&lobby),
        NightScript {
            guard: None,
            wolf: 4,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    assert_eq!(s.phase, Phase::HunterShoot);
    assert_eq!(s.winner, None);

    let s = night_act(&s, 4, NightAction::HunterShoot { target: Some(0) });

    assert!(!s.is_alive(0));
    assert_eq!(s.night_history[&1].hunter_shot, Some(0));
    assert_eq!(s.phase, Phase::GameEnd);
    assert_eq!(s.winner, Some(Alignment::Village));
    assert_eq!(pending_action(&s), None);
}

#[test]
fn hunter_may_decline() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 4,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    let s = night_act(&s, 4, NightAction::HunterShoot { target: None });
    assert_eq!(s.living_seats(), vec![0, 1, 2, 3, 5]);
    assert!(!s.role_abilities.hunter_can_shoot);
    assert_eq!(s.phase, Phase::DaySpeech);
}

#[test]
fn milk_killed_hunter_never_shoots() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: Some(4),
            wolf: 4,
            witch: WitchChoice::Save,
            seer: 0,
        },
    );
    assert_eq!(s.night_history[&1].deaths[0].cause, DeathCause::Milk);
    assert!(!s.role_abilities.hunter_can_shoot);
    assert_ne!(s.phase, Phase::HunterShoot);
    assert_eq!(s.pending_hunter, None);
}

#[test]
fn poisoned_hunter_never_shoots() {
    let roles = [
        Role::Werewolf,
        Role::Werewolf,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Guard,
        Role::Villager,
        Role::Villager,
    ];
    let s = start(&game_with_roles(&roles, 5));
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 6,
            witch: WitchChoice::Poison { target: 4 },
            seer: 0,
        },
    );
    let record = &s.night_history[&1];
    assert_eq!(
        record.deaths,
        vec![
            Death {
                seat: 6,
                cause: DeathCause::WolfAttack
            },
            Death {
                seat: 4,
                cause: DeathCause::Poison
            },
        ]
    );
    assert!(!s.role_abilities.hunter_can_shoot);
    assert!(s.role_abilities.witch_poison_used);
    assert_eq!(s.phase, Phase::DaySpeech);
}

#[test]
fn poison_and_attack_on_same_seat_records_one_death() {
    let roles = [
        Role::Werewolf,
        Role::Werewolf,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
        Role::Guard,
        Role::Villager,
        Role::Villager,
    ];
    let s = start(&game_with_roles(&roles, 5));
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 4,
            witch: WitchChoice::Poison { target: 4 },
            seer: 0,
        },
    );
    assert_eq!(
        s.night_history[&1].deaths,
        vec![Death {
            seat: 4,
            cause: DeathCause::WolfAttack
        }]
    );
    // Poison still takes the shot away.
    assert_ne!(s.phase, Phase::HunterShoot);
}

#[test]
fn night_deaths_can_end_the_game() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 2,
            witch: WitchChoice::Poison { target: 4 },
            seer: 0,
        },
    );
    assert_eq!(s.phase, Phase::GameEnd);
    assert_eq!(s.winner, Some(Alignment::Wolf));
}

#[test]
fn guard_cannot_repeat_target_on_consecutive_nights() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: Some(3),
            wolf: 3,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    let s = talk_through(&s);
    // Three-way tie: nobody leaves, night two begins.
    let s = vote_all(&s, |v| match v {
        0 | 1 => 2,
        2 | 3 => 0,
        _ => 1,
    });
    assert_eq!(s.phase, Phase::NightGuardAction);
    assert_eq!(s.day, 2);
    assert_eq!(s.night_actions.last_guard_target, Some(3));
    assert_eq!(s.night_actions.guard_target, None);

    let err = apply(
        &s,
        &GameEvent::Act {
            seat: 5,
            action: PlayerAction::NightAction {
                action: NightAction::Guard { target: Some(3) },
            },
        },
    )
    .unwrap_err();
    assert_eq!(reject_kind(err), RejectKind::InvalidTarget);

    let s = night_act(&s, 5, NightAction::Guard { target: Some(2) });
    assert_eq!(s.phase, Phase::NightWolfChat);
}

#[test]
fn witch_with_spent_potions_is_skipped() {
    let mut base = six_seat_game();
    base.role_abilities.witch_heal_used = true;
    base.role_abilities.witch_poison_used = true;
    let s = start(&base);
    let s = night_act(&s, 5, NightAction::Guard { target: None });
    let s = apply(
        &s,
        &GameEvent::SpeechGenerated {
            seat: 0,
            fragments: vec!["a".into()],
        },
    )
    .unwrap();
    let s = apply(
        &s,
        &GameEvent::SpeechGenerated {
            seat: 1,
            fragments: vec!["b".into()],
        },
    )
    .unwrap();
    let s = night_act(&s, 0, NightAction::WolfVote { target: 2 });
    let s = night_act(&s, 1, NightAction::WolfVote { target: 2 });
    assert_eq!(s.phase, Phase::NightSeerAction);
    assert_eq!(s.night_actions.wolf_target, Some(2));
}

#[test]
fn wolf_votes_are_sequential_and_exclude_wolves() {
    let s = start(&six_seat_game());
    let s = night_act(&s, 5, NightAction::Guard { target: None });
    assert_eq!(s.phase, Phase::NightWolfChat);
    assert_eq!(s.current_speaker_seat, Some(0));
    let s = apply(
        &s,
        &GameEvent::SpeechGenerated {
            seat: 0,
            fragments: vec!["the seer".into(), "is seat 2".into()],
        },
    )
    .unwrap();
    assert_eq!(s.night_actions.wolf_chat_done, vec![0]);
    assert_eq!(s.current_speaker_seat, Some(1));
    let s = apply(
        &s,
        &GameEvent::SpeechGenerated {
            seat: 1,
            fragments: vec!["agreed".into()],
        },
    )
    .unwrap();
    assert_eq!(s.phase, Phase::NightWolfAction);

    let out_of_turn = GameEvent::Act {
        seat: 1,
        action: PlayerAction::NightAction {
            action: NightAction::WolfVote { target: 2 },
        },
    };
    assert_eq!(
        reject_kind(apply(&s, &out_of_turn).unwrap_err()),
        RejectKind::OutOfTurn
    );

    let at_wolf = GameEvent::Act {
        seat: 0,
        action: PlayerAction::NightAction {
            action: NightAction::WolfVote { target: 1 },
        },
    };
    assert_eq!(
        reject_kind(apply(&s, &at_wolf).unwrap_err()),
        RejectKind::InvalidTarget
    );

    let s = night_act(&s, 0, NightAction::WolfVote { target: 3 });
    let s = night_act(&s, 1, NightAction::WolfVote { target: 2 });
    // Tie: the first recorded vote wins.
    assert_eq!(s.night_actions.wolf_target, Some(3));
    assert_eq!(s.phase, Phase::NightWitchAction);
}

#[test]
fn witch_cannot_poison_self_or_reuse_potions() {
    let mut base = six_seat_game();
    base.role_abilities.witch_heal_used = true;
    let s = start(&base);
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 2,
            witch: WitchChoice::Pass,
            seer: 0,
        },
    );
    // Re-run the witch step against a synthetic witch phase.
    let mut w = s.clone();
    w.phase = Phase::NightWitchAction;
    w.night_actions.wolf_target = Some(4);
    let save = GameEvent::Act {
        seat: 3,
        action: PlayerAction::NightAction {
            action: NightAction::Witch {
                choice: WitchChoice::Save,
            },
        },
    };
    assert_eq!(
        reject_kind(apply(&w, &save).unwrap_err()),
        RejectKind::AbilityUsed
    );
    let self_poison = GameEvent::Act {
        seat: 3,
        action: PlayerAction::NightAction {
            action: NightAction::Witch {
                choice: WitchChoice::Poison { target: 3 },
            },
        },
    };
    assert_eq!(
        reject_kind(apply(&w, &self_poison).unwrap_err()),
        RejectKind::InvalidTarget
    );
}

#[test]
fn seer_check_is_recorded_in_history() {
    let s = start(&six_seat_game());
    let s = play_night(
        &s,
        NightScript {
            guard: None,
            wolf: 3,
            witch: WitchChoice::Save,
            seer: 1,
        },
    );
    let history = &s.night_actions.seer_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].target, 1);
    assert_eq!(history[0].result, Alignment::Wolf);
    assert_eq!(history[0].day, 1);
}

#[test]
fn resolving_twice_is_a_no_op() {
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
    let mut replay = s.clone();
    replay.night_actions.witch_poison = Some(3);
    let before = replay.clone();
    let outcome = crate::domain::night::resolve_night(&mut replay);
    assert_eq!(outcome, crate::domain::night::NightOutcome::AlreadyResolved);
    assert_eq!(replay, before);
}
