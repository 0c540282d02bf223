//! Synchronization guarantees: write partitioning, stale-write discard,
//! snapshot fan-out, and the monotonic-score invariant under arbitrary
//! (including hostile) action sequences.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tandem_party::core::{Game, GameId, PlayerSlot, RoundKind, RoundSchedule};
use tandem_party::orchestrator::{join_game, GameBuilder};
use tandem_party::patch::{ChoiceOp, GamePatch, PatchOp, RoundOp};
use tandem_party::rounds::{self, choice::ChoiceAction, RoundAction};
use tandem_party::store::{DocumentStore, MemoryStore, StoreError};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn new_game(schedule: RoundSchedule) -> (MemoryStore, GameId) {
    let store = MemoryStore::new();
    let mut rng = ChaCha8Rng::seed_from_u64(47);
    let (id, _) = GameBuilder::new("Avery")
        .schedule(schedule)
        .create(&store, &mut rng)
        .unwrap();
    join_game(&store, &id, "Blair").unwrap();
    (store, id)
}

fn snapshot(store: &MemoryStore, id: &GameId) -> Game {
    store.read(id).unwrap().unwrap()
}

/// An unauthorized transition is a no-op observable as "state unchanged":
/// the engine rejects it before any write exists, and even a forged stale
/// patch bounces off the store.
#[test]
fn test_unauthorized_attempts_leave_state_unchanged() {
    let (store, id) = new_game(RoundSchedule::standard());
    let before = snapshot(&store, &id);

    // Engine-level rejection: slot 1 may not advance.
    let err = rounds::apply(
        &before,
        PlayerSlot::ONE,
        &RoundAction::Choice(ChoiceAction::Advance),
    )
    .unwrap_err();
    assert!(matches!(err, rounds::TransitionError::NotAuthorized { .. }));
    assert_eq!(snapshot(&store, &id), before);

    // Store-level rejection: a patch built from a version that never
    // matched is discarded whole.
    let forged = GamePatch::versioned(
        before.version + 7,
        [PatchOp::AwardPoints {
            slot: PlayerSlot::ONE,
            points: 999,
        }],
    );
    assert!(matches!(
        store.apply(&id, &forged),
        Err(StoreError::Rejected(_))
    ));
    assert_eq!(snapshot(&store, &id), before);
}

/// Two clients race the same exactly-once transition; the second applier
/// observes a stale-write rejection instead of double-executing.
#[test]
fn test_concurrent_advances_apply_exactly_once() {
    let (store, id) = new_game(RoundSchedule::standard());

    // Complete turn 0 so Advance is legal.
    for (actor, action) in [
        (PlayerSlot::ZERO, ChoiceAction::SubmitAnswer("Coffee".into())),
        (PlayerSlot::ONE, ChoiceAction::SubmitGuess("Tea".into())),
    ] {
        let game = snapshot(&store, &id);
        let patch = rounds::apply(&game, actor, &RoundAction::Choice(action)).unwrap();
        store.apply(&id, &patch).unwrap();
    }

    // Both clients compute the advance from the same snapshot. (Only slot 0
    // is authorized; the race modeled here is one client double-firing.)
    let observed = snapshot(&store, &id);
    let first = rounds::apply(
        &observed,
        PlayerSlot::ZERO,
        &RoundAction::Choice(ChoiceAction::Advance),
    )
    .unwrap();
    let second = rounds::apply(
        &observed,
        PlayerSlot::ZERO,
        &RoundAction::Choice(ChoiceAction::Advance),
    )
    .unwrap();

    store.apply(&id, &first).unwrap();
    assert!(matches!(
        store.apply(&id, &second),
        Err(StoreError::Rejected(_))
    ));

    // The turn advanced exactly once.
    match &snapshot(&store, &id).round {
        tandem_party::core::RoundState::Choice(state) => assert_eq!(state.turn, 1),
        other => panic!("expected choice round, got {other:?}"),
    }
}

/// Every applied write fans out one full snapshot to every subscriber, in
/// apply order; a dropped handle stops deliveries without disturbing the
/// other client's.
#[test]
fn test_two_client_fanout_and_teardown() {
    let (store, id) = new_game(RoundSchedule::standard());

    let host_seen = Arc::new(Mutex::new(Vec::<u32>::new()));
    let guest_count = Arc::new(AtomicUsize::new(0));

    let host_sink = Arc::clone(&host_seen);
    let _host_sub = store
        .subscribe(
            &id,
            Box::new(move |game: &Game| {
                if let tandem_party::core::RoundState::Choice(state) = &game.round {
                    host_sink.lock().unwrap().push(state.turn);
                }
            }),
        )
        .unwrap();

    let guest_sink = Arc::clone(&guest_count);
    let guest_sub = store
        .subscribe(
            &id,
            Box::new(move |_: &Game| {
                guest_sink.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

    for turn in 1..=2 {
        let patch = GamePatch::unguarded([PatchOp::Round(RoundOp::Choice(ChoiceOp::SetTurn(
            turn,
        )))]);
        store.apply(&id, &patch).unwrap();
    }

    // Guest leaves; the host keeps receiving.
    drop(guest_sub);
    let patch = GamePatch::unguarded([PatchOp::Round(RoundOp::Choice(ChoiceOp::SetTurn(3)))]);
    store.apply(&id, &patch).unwrap();

    assert_eq!(*host_seen.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(guest_count.load(Ordering::SeqCst), 2);
}

/// Unguarded per-slot writes never bump the version token, so they cannot
/// starve a pending exactly-once transition.
#[test]
fn test_mirror_writes_do_not_invalidate_transitions() {
    let (store, id) = new_game(RoundSchedule::new(vec![RoundKind::Racer]).unwrap());
    let game = snapshot(&store, &id);
    let start = rounds::apply(
        &game,
        PlayerSlot::ZERO,
        &RoundAction::Racer(rounds::racer::RacerAction::Start),
    )
    .unwrap();
    store.apply(&id, &start).unwrap();

    // Slot 0 computes an exactly-once declaration from this snapshot...
    let observed = snapshot(&store, &id);
    let declare = rounds::apply(
        &observed,
        PlayerSlot::ZERO,
        &RoundAction::Racer(rounds::racer::RacerAction::DeclareFinish),
    )
    .unwrap();

    // ...while slot 1's reconciliation writes keep landing in between.
    for position in [10.0, 20.0, 30.0] {
        let game = snapshot(&store, &id);
        let patch = rounds::apply(
            &game,
            PlayerSlot::ONE,
            &RoundAction::Racer(rounds::racer::RacerAction::Reconcile {
                position,
                heat: 50.0,
                overheated: false,
            }),
        )
        .unwrap();
        store.apply(&id, &patch).unwrap();
    }

    // The declaration still applies: mirror traffic is not a conflict.
    store.apply(&id, &declare).unwrap();
    match &snapshot(&store, &id).round {
        tandem_party::core::RoundState::Racer(state) => {
            assert_eq!(state.round_winner, Some(PlayerSlot::ZERO));
            assert_eq!(state.positions[PlayerSlot::ONE], 30.0);
        }
        other => panic!("expected racer round, got {other:?}"),
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_action() -> impl Strategy<Value = ChoiceAction> {
        prop_oneof![
            prop_oneof![
                Just("Coffee".to_string()),
                Just("Tea".to_string()),
                "[A-Za-z]{0,8}",
            ]
            .prop_map(ChoiceAction::SubmitAnswer),
            prop_oneof![
                Just("Coffee".to_string()),
                Just("Tea".to_string()),
                "[A-Za-z]{0,8}",
            ]
            .prop_map(ChoiceAction::SubmitGuess),
            Just(ChoiceAction::Advance),
        ]
    }

    proptest! {
        /// Scores never decrease and the version token never runs
        /// backwards, no matter who attempts what in which order.
        #[test]
        fn prop_scores_and_version_are_monotone(
            steps in proptest::collection::vec((any::<bool>(), arbitrary_action()), 1..60)
        ) {
            let (store, id) = new_game(RoundSchedule::standard());
            let mut last_scores = [0u32; 2];
            let mut last_version = 0u64;

            for (second_player, action) in steps {
                let actor = if second_player { PlayerSlot::ONE } else { PlayerSlot::ZERO };
                let game = snapshot(&store, &id);
                if let Ok(patch) = rounds::apply(&game, actor, &RoundAction::Choice(action)) {
                    // Fire-and-forget; rejections are dropped.
                    let _ = store.apply(&id, &patch);
                }

                let game = snapshot(&store, &id);
                for slot in PlayerSlot::both() {
                    prop_assert!(game.player(slot).score >= last_scores[slot.index()]);
                    last_scores[slot.index()] = game.player(slot).score;
                }
                prop_assert!(game.version >= last_version);
                last_version = game.version;
            }
        }
    }
}
