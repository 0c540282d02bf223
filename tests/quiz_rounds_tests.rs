//! Quiz round scenarios driven through the store, the way two real clients
//! would play them: read a snapshot, run the shared transition table, apply
//! the emitted patch.

use tandem_party::authority::{answering_slot, guessing_slot};
use tandem_party::content::{generate_or_fallback, CannedContent};
use tandem_party::core::{DareChoice, GameId, GamePhase, Judgement, PlayerSlot, RoundKind, RoundSchedule, RoundState};
use tandem_party::orchestrator::{join_game, GameBuilder};
use tandem_party::rounds::{self, choice, dare, mind_meld, trivia, RoundAction};
use tandem_party::score::{CHOICE_MATCH_BONUS, MIND_MELD_MATCH_BONUS, TRIVIA_CORRECT_BONUS};
use tandem_party::store::{DocumentStore, MemoryStore};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn new_game(schedule: RoundSchedule) -> (MemoryStore, GameId) {
    let store = MemoryStore::new();
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let (id, _) = GameBuilder::new("Avery")
        .schedule(schedule)
        .create(&store, &mut rng)
        .unwrap();
    join_game(&store, &id, "Blair").unwrap();
    (store, id)
}

fn act(store: &MemoryStore, id: &GameId, actor: PlayerSlot, action: RoundAction) {
    let game = store.read(id).unwrap().unwrap();
    let patch = rounds::apply(&game, actor, &action).unwrap();
    store.apply(id, &patch).unwrap();
}

fn snapshot(store: &MemoryStore, id: &GameId) -> tandem_party::Game {
    store.read(id).unwrap().unwrap()
}

/// End-to-end: identical answer and guess on every turn pays the guessing
/// player the fixed bonus each time, `2N` bonuses in total across both
/// players.
#[test]
fn test_perfect_choice_round_pays_bonus_every_turn() {
    let (store, id) = new_game(RoundSchedule::standard());

    for turn in 0..choice::TOTAL_TURNS {
        let answering = answering_slot(turn, choice::POOL_SIZE);
        let guessing = guessing_slot(turn, choice::POOL_SIZE);
        let (option, _) = choice::question(turn);

        act(
            &store,
            &id,
            answering,
            RoundAction::Choice(choice::ChoiceAction::SubmitAnswer(option.into())),
        );
        act(
            &store,
            &id,
            guessing,
            RoundAction::Choice(choice::ChoiceAction::SubmitGuess(option.into())),
        );
        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::Choice(choice::ChoiceAction::Advance),
        );
    }

    let game = snapshot(&store, &id);
    // Each player guessed for one block of the pool.
    assert_eq!(
        game.player(PlayerSlot::ZERO).score,
        CHOICE_MATCH_BONUS * choice::POOL_SIZE
    );
    assert_eq!(
        game.player(PlayerSlot::ONE).score,
        CHOICE_MATCH_BONUS * choice::POOL_SIZE
    );
    assert_eq!(
        game.player(PlayerSlot::ZERO).score + game.player(PlayerSlot::ONE).score,
        CHOICE_MATCH_BONUS * choice::TOTAL_TURNS
    );
    // The round handed over to the next scheduled one.
    assert_eq!(game.current_round(), RoundKind::Trivia);
}

/// For every choice turn, exactly one slot may answer and exactly the
/// other may guess; the rejected attempts leave the document untouched.
#[test]
fn test_choice_roles_are_exclusive_every_turn() {
    let (store, id) = new_game(RoundSchedule::standard());

    for turn in 0..choice::TOTAL_TURNS {
        let answering = answering_slot(turn, choice::POOL_SIZE);
        let guessing = guessing_slot(turn, choice::POOL_SIZE);
        let (option, _) = choice::question(turn);
        let game = snapshot(&store, &id);

        // The guessing player cannot answer.
        let err = rounds::apply(
            &game,
            guessing,
            &RoundAction::Choice(choice::ChoiceAction::SubmitAnswer(option.into())),
        )
        .unwrap_err();
        assert!(matches!(err, rounds::TransitionError::NotAuthorized { .. }));
        // The answering player cannot guess (there is nothing to guess yet
        // either, but authority is checked first).
        let err = rounds::apply(
            &game,
            answering,
            &RoundAction::Choice(choice::ChoiceAction::SubmitGuess(option.into())),
        )
        .unwrap_err();
        assert!(matches!(err, rounds::TransitionError::NotAuthorized { .. }));
        // Nothing changed while we probed.
        assert_eq!(snapshot(&store, &id), game);

        act(
            &store,
            &id,
            answering,
            RoundAction::Choice(choice::ChoiceAction::SubmitAnswer(option.into())),
        );
        act(
            &store,
            &id,
            guessing,
            RoundAction::Choice(choice::ChoiceAction::SubmitGuess(option.into())),
        );
        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::Choice(choice::ChoiceAction::Advance),
        );
    }
}

/// A full trivia round where the asker alternately accepts and rejects.
#[test]
fn test_trivia_round_scores_only_accepted_guesses() {
    let (store, id) = new_game(
        RoundSchedule::new(vec![RoundKind::Trivia, RoundKind::Choice]).unwrap(),
    );

    let mut expected = [0u32; 2];
    for turn in 0..trivia::TOTAL_TURNS {
        let asker = answering_slot(turn, trivia::POOL_SIZE);
        let guesser = guessing_slot(turn, trivia::POOL_SIZE);

        act(
            &store,
            &id,
            guesser,
            RoundAction::Trivia(trivia::TriviaAction::SubmitGuess("at the lake".into())),
        );
        let judgement = if turn % 2 == 0 {
            expected[guesser.index()] += TRIVIA_CORRECT_BONUS;
            Judgement::Correct
        } else {
            Judgement::Incorrect
        };
        act(
            &store,
            &id,
            asker,
            RoundAction::Trivia(trivia::TriviaAction::Judge(judgement)),
        );
        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::Trivia(trivia::TriviaAction::Advance),
        );
    }

    let game = snapshot(&store, &id);
    assert_eq!(game.player(PlayerSlot::ZERO).score, expected[0]);
    assert_eq!(game.player(PlayerSlot::ONE).score, expected[1]);
    assert_eq!(game.current_round(), RoundKind::Choice);
}

/// Mind-meld through the store: concurrent answers, advancer resolution,
/// normalized matching.
#[test]
fn test_mind_meld_round_matches_and_advances() {
    let (store, id) = new_game(
        RoundSchedule::new(vec![RoundKind::MindMeld, RoundKind::Choice]).unwrap(),
    );

    let answers = [
        ("Banana", " banana ", true),
        ("ocean", "Mountain", false),
        ("Coffee", "COFFEE", true),
        ("left", "right", false),
        ("  seven ", "seven", true),
    ];
    let mut expected = 0;
    for (index, (a, b, matches)) in answers.iter().enumerate() {
        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::MindMeld(mind_meld::MindMeldAction::SubmitAnswer((*a).into())),
        );
        act(
            &store,
            &id,
            PlayerSlot::ONE,
            RoundAction::MindMeld(mind_meld::MindMeldAction::SubmitAnswer((*b).into())),
        );

        let game = snapshot(&store, &id);
        match &game.round {
            RoundState::MindMeld(state) => assert!(mind_meld::resolve_due(state)),
            other => panic!("expected mind-meld round, got {other:?}"),
        }

        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::MindMeld(mind_meld::MindMeldAction::Resolve),
        );
        if *matches {
            expected += MIND_MELD_MATCH_BONUS;
        }
        let game = snapshot(&store, &id);
        assert_eq!(game.player(PlayerSlot::ZERO).score, expected);
        assert_eq!(game.player(PlayerSlot::ONE).score, expected);

        act(
            &store,
            &id,
            PlayerSlot::ZERO,
            RoundAction::MindMeld(mind_meld::MindMeldAction::Advance),
        );
        if index + 1 < answers.len() {
            match &snapshot(&store, &id).round {
                RoundState::MindMeld(state) => {
                    assert_eq!(state.prompt_index, index as u32 + 1);
                }
                other => panic!("expected mind-meld round, got {other:?}"),
            }
        }
    }
    assert_eq!(snapshot(&store, &id).current_round(), RoundKind::Choice);
}

/// Dare round with an offline generator: content flows through the
/// loading flag, and the last turn ends the game.
#[test]
fn test_dare_round_with_canned_content_ends_game() {
    let (store, id) = new_game(RoundSchedule::new(vec![RoundKind::Dare]).unwrap());
    let mut generator = CannedContent::new(
        vec!["Swap an item of clothing.".into()],
        vec!["What was your first impression of me?".into()],
    );

    for turn in 0..dare::MAX_TURNS {
        let actor = dare::active_slot(turn);
        let choice = if turn % 2 == 0 {
            DareChoice::Dare
        } else {
            DareChoice::Truth
        };
        act(
            &store,
            &id,
            actor,
            RoundAction::Dare(dare::DareAction::Choose(choice)),
        );

        // The chooser's client runs generation and publishes the result.
        let text = generate_or_fallback(&mut generator, choice);
        act(
            &store,
            &id,
            actor,
            RoundAction::Dare(dare::DareAction::ContentReady(text.clone())),
        );
        match &snapshot(&store, &id).round {
            RoundState::Dare(state) => {
                assert_eq!(state.content, text);
                assert!(!state.is_loading);
            }
            other => panic!("expected dare round, got {other:?}"),
        }

        act(&store, &id, actor, RoundAction::Dare(dare::DareAction::Advance));
    }

    assert_eq!(snapshot(&store, &id).phase, GamePhase::Ended);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Match detection ignores case and surrounding whitespace for any
        /// ASCII answer.
        #[test]
        fn prop_mind_meld_match_normalizes(answer in "[a-zA-Z0-9 ]{1,16}") {
            let decorated = format!("  {}  ", answer.to_uppercase());
            prop_assert!(mind_meld::is_match(&answer, &decorated));
        }

        /// Two answers that differ after normalization never match.
        #[test]
        fn prop_mind_meld_distinct_answers_do_not_match(
            a in "[a-z]{1,12}",
            b in "[a-z]{1,12}",
        ) {
            prop_assume!(a.trim() != b.trim());
            prop_assert!(!mind_meld::is_match(&a, &b));
        }
    }
}
