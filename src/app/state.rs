//! Session state: players, score cards, turn and round progression
//!
//! `GameSession` is the single mutable aggregate of a running game. Every
//! score submission is one atomic transition: record the value, advance the
//! turn, detect round completion. Preconditions (filled cell, wrong row,
//! value over the ceiling) reject without mutating anything.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::ranking::{self, Standing};
use crate::game::{round_complete_for_all, validation, Category, Player, Round, ScoreCard};

/// Where the session is in its life cycle. Moves only forward.
///
/// The active row exists only while round 2 is running, so it lives inside
/// that variant rather than as a nullable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Round1,
    Round2 { current_row: Category },
    Finished,
}

/// What a successful submission did beyond recording the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// Turn passed to the next player
    Advanced,
    /// Round 1 just completed; round 2 begins at the first row
    RoundOneComplete,
    /// Round 2 just completed; the session is finished
    GameFinished,
}

/// Why a submission was rejected. The session is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The session is already finished
    SessionFinished,
    /// The cell is already filled (cells are write-once)
    CategoryFilled,
    /// Round 2 only accepts the active row
    WrongRow { expected: Category },
    /// Value exceeds the category ceiling
    ValueTooLarge { max: u32 },
}

impl SubmitError {
    pub fn message(&self) -> String {
        match self {
            SubmitError::SessionFinished => "Game is already finished".to_string(),
            SubmitError::CategoryFilled => "That category is already filled".to_string(),
            SubmitError::WrongRow { expected } => {
                format!("Round 2 is on {}", expected.label())
            }
            SubmitError::ValueTooLarge { max } => format!("Maximum for this category is {}", max),
        }
    }
}

/// A running game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    players: Vec<Player>,
    /// Index-aligned with `players`
    cards: Vec<ScoreCard>,
    phase: Phase,
    current_player: usize,
}

impl GameSession {
    /// Start a fresh session for a pre-validated roster
    /// (see `game::validation::build_roster`).
    pub fn new(players: Vec<Player>) -> Self {
        let cards = players.iter().map(|_| ScoreCard::new()).collect();
        GameSession {
            players,
            cards,
            phase: Phase::Round1,
            current_player: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn cards(&self) -> &[ScoreCard] {
        &self.cards
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// The round currently being played, or None once finished.
    pub fn current_round(&self) -> Option<Round> {
        match self.phase {
            Phase::Round1 => Some(Round::Round1),
            Phase::Round2 { .. } => Some(Round::Round2),
            Phase::Finished => None,
        }
    }

    /// The active row during round 2.
    pub fn current_row(&self) -> Option<Category> {
        match self.phase {
            Phase::Round2 { current_row } => Some(current_row),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Both round totals and the combined total for one player.
    pub fn totals_for(&self, index: usize) -> (u32, u32, u32) {
        let card = &self.cards[index];
        let r1 = card.round_total(Round::Round1);
        let r2 = card.round_total(Round::Round2);
        (r1, r2, r1 + r2)
    }

    /// Submit a score for the current player.
    ///
    /// Round 1 accepts any unfilled category; round 2 only the active row.
    /// On success the turn advances cyclically and round completion is
    /// checked; the returned event says which transition happened.
    pub fn submit(&mut self, category: Category, value: u32) -> Result<TurnEvent, SubmitError> {
        if let Err(max) = validation::check_value(category, value) {
            return Err(SubmitError::ValueTooLarge { max });
        }
        match self.phase {
            Phase::Round1 => self.submit_round1(category, value),
            Phase::Round2 { current_row } => {
                if category != current_row {
                    return Err(SubmitError::WrongRow {
                        expected: current_row,
                    });
                }
                self.submit_round2(current_row, value)
            }
            Phase::Finished => Err(SubmitError::SessionFinished),
        }
    }

    /// Round 1: free category choice, cyclic player order.
    fn submit_round1(&mut self, category: Category, value: u32) -> Result<TurnEvent, SubmitError> {
        if !self.cards[self.current_player].record(Round::Round1, category, value) {
            return Err(SubmitError::CategoryFilled);
        }

        self.current_player = (self.current_player + 1) % self.players.len();

        if round_complete_for_all(&self.cards, Round::Round1) {
            self.phase = Phase::Round2 {
                current_row: Category::ALL[0],
            };
            self.current_player = 0;
            return Ok(TurnEvent::RoundOneComplete);
        }
        Ok(TurnEvent::Advanced)
    }

    /// Round 2: everyone fills the active row before it advances.
    fn submit_round2(&mut self, row: Category, value: u32) -> Result<TurnEvent, SubmitError> {
        if !self.cards[self.current_player].record(Round::Round2, row, value) {
            // Can happen when a resumed session re-enters a row
            return Err(SubmitError::CategoryFilled);
        }

        self.current_player = (self.current_player + 1) % self.players.len();

        // Every player has had a turn on this row; move to the next one.
        // On the last row there is nowhere to go and the completion check
        // below ends the game.
        if self.current_player == 0 {
            if let Some(next_row) = row.next() {
                self.phase = Phase::Round2 {
                    current_row: next_row,
                };
            }
        }

        if round_complete_for_all(&self.cards, Round::Round2) {
            self.phase = Phase::Finished;
            return Ok(TurnEvent::GameFinished);
        }
        Ok(TurnEvent::Advanced)
    }

    /// Final standings, descending by combined total. Pure; callable at any
    /// time, meaningful once finished.
    pub fn standings(&self) -> Vec<Standing> {
        ranking::standings(&self.players, &self.cards)
    }

    /// Per-round standings for the round-winner announcement.
    pub fn round_standings(&self, round: Round) -> Vec<(String, u32)> {
        ranking::round_standings(&self.players, &self.cards, round)
    }

    /// Debug quick-fill: fill every open cell of the running round with a
    /// random legal value except one, and make its owner the current player.
    ///
    /// Returns the player index and category left open (the next submission
    /// target), or None when the session is finished.
    pub fn fill_randomly<R: Rng>(&mut self, rng: &mut R) -> Option<(usize, Category)> {
        let round = self.current_round()?;

        // Prefer keeping the active cell open so play resumes exactly where
        // the session stands.
        let keep = match self.phase {
            Phase::Round2 { current_row }
                if !self.cards[self.current_player].is_filled(Round::Round2, current_row) =>
            {
                Some((self.current_player, current_row))
            }
            _ => self
                .cards
                .iter()
                .enumerate()
                .find_map(|(i, card)| card.first_unfilled(round).map(|c| (i, c))),
        };
        let (keep_player, keep_category) = keep?;

        for (i, card) in self.cards.iter_mut().enumerate() {
            for category in Category::ALL {
                if i == keep_player && category == keep_category {
                    continue;
                }
                if !card.is_filled(round, category) {
                    let value = rng.random_range(0..=category.max_value());
                    card.record(round, category, value);
                }
            }
        }

        self.current_player = keep_player;
        if round == Round::Round2 {
            self.phase = Phase::Round2 {
                current_row: keep_category,
            };
        }
        Some((keep_player, keep_category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::validation::build_roster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(names: &[&str]) -> GameSession {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        GameSession::new(build_roster(&names).unwrap())
    }

    /// Drive a session through all of round 1 with a constant value.
    fn complete_round1(game: &mut GameSession, value: u32) {
        for category in Category::ALL {
            for _ in 0..game.players().len() {
                game.submit(category, value).unwrap();
            }
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let game = session(&["Ana", "Bruno", "Carla"]);
        assert_eq!(game.phase(), Phase::Round1);
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.current_row(), None);
        for card in game.cards() {
            assert_eq!(card.filled_count(Round::Round1), 0);
            assert_eq!(card.filled_count(Round::Round2), 0);
        }
    }

    #[test]
    fn test_round1_free_choice_advances_turn() {
        // Spec scenario: player A fills wildcard with 23
        let mut game = session(&["Ana", "Bruno"]);
        let event = game.submit(Category::Wildcard, 23).unwrap();
        assert_eq!(event, TurnEvent::Advanced);
        assert_eq!(game.current_player_index(), 1);
        assert_eq!(
            game.cards()[0].entry(Round::Round1, Category::Wildcard),
            Some(23)
        );
        // Nobody else's card was touched
        assert_eq!(game.cards()[1].filled_count(Round::Round1), 0);
    }

    #[test]
    fn test_round1_turn_order_is_cyclic() {
        let mut game = session(&["Ana", "Bruno", "Carla"]);
        game.submit(Category::One, 3).unwrap();
        assert_eq!(game.current_player_index(), 1);
        game.submit(Category::Six, 18).unwrap();
        assert_eq!(game.current_player_index(), 2);
        game.submit(Category::Full, 25).unwrap();
        assert_eq!(game.current_player_index(), 0);
    }

    #[test]
    fn test_round1_any_category_order() {
        let mut game = session(&["Ana", "Bruno"]);
        // Ana starts from the bottom of the sheet, Bruno from the top
        game.submit(Category::Wildcard, 12).unwrap();
        game.submit(Category::One, 2).unwrap();
        game.submit(Category::BigStraight, 30).unwrap();
        assert_eq!(
            game.cards()[0].entry(Round::Round1, Category::BigStraight),
            Some(30)
        );
    }

    #[test]
    fn test_round1_refill_rejected_without_mutation() {
        let mut game = session(&["Ana", "Bruno"]);
        game.submit(Category::Wildcard, 23).unwrap();
        game.submit(Category::Wildcard, 9).unwrap();
        // Back to Ana, whose wildcard is filled
        assert_eq!(
            game.submit(Category::Wildcard, 50),
            Err(SubmitError::CategoryFilled)
        );
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(
            game.cards()[0].entry(Round::Round1, Category::Wildcard),
            Some(23)
        );
    }

    #[test]
    fn test_value_ceiling_boundary() {
        let mut game = session(&["Ana", "Bruno"]);
        assert_eq!(
            game.submit(Category::FiveOfAKind, 121),
            Err(SubmitError::ValueTooLarge { max: 120 })
        );
        // Rejection did not consume the turn
        assert_eq!(game.current_player_index(), 0);
        game.submit(Category::FiveOfAKind, 120).unwrap();
        assert_eq!(
            game.cards()[0].entry(Round::Round1, Category::FiveOfAKind),
            Some(120)
        );

        assert_eq!(
            game.submit(Category::OnePair, 101),
            Err(SubmitError::ValueTooLarge { max: 100 })
        );
    }

    #[test]
    fn test_round1_completion_starts_round2() {
        // Spec scenario: 3 players finish round 1
        let mut game = session(&["Ana", "Bruno", "Carla"]);
        let mut last = TurnEvent::Advanced;
        for category in Category::ALL {
            for _ in 0..3 {
                last = game.submit(category, 10).unwrap();
            }
        }
        assert_eq!(last, TurnEvent::RoundOneComplete);
        assert_eq!(
            game.phase(),
            Phase::Round2 {
                current_row: Category::One
            }
        );
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.current_row(), Some(Category::One));
    }

    #[test]
    fn test_round2_rejects_other_rows() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        assert_eq!(game.current_row(), Some(Category::One));
        assert_eq!(
            game.submit(Category::Wildcard, 10),
            Err(SubmitError::WrongRow {
                expected: Category::One
            })
        );
        // Nothing recorded, turn not consumed
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.cards()[0].filled_count(Round::Round2), 0);
    }

    #[test]
    fn test_round2_row_advances_on_wrap() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);

        game.submit(Category::One, 1).unwrap();
        // Row holds until every player has been through it
        assert_eq!(game.current_row(), Some(Category::One));
        assert_eq!(game.current_player_index(), 1);

        game.submit(Category::One, 2).unwrap();
        assert_eq!(game.current_row(), Some(Category::Two));
        assert_eq!(game.current_player_index(), 0);
    }

    #[test]
    fn test_round2_full_advances_to_small_straight() {
        // Spec scenario C: wrap on the full-house row
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        // Play rows up to and including Full for both players
        for category in Category::ALL {
            if category == Category::SmallStraight {
                break;
            }
            game.submit(category, 4).unwrap();
            game.submit(category, 6).unwrap();
        }
        assert_eq!(game.current_row(), Some(Category::SmallStraight));
        assert_eq!(game.current_player_index(), 0);
    }

    #[test]
    fn test_round2_completion_finishes_game() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);

        let mut last = TurnEvent::Advanced;
        for category in Category::ALL {
            last = game.submit(category, 3).unwrap();
            if game.is_finished() {
                break;
            }
            last = game.submit(category, 7).unwrap();
        }
        assert_eq!(last, TurnEvent::GameFinished);
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.current_round(), None);

        // 15 categories at 5 each in round 1, then 3 / 7 per row in round 2
        let standings = game.standings();
        assert_eq!(standings[0].name, "Bruno");
        assert_eq!(standings[0].round1_total, 75);
        assert_eq!(standings[0].round2_total, 105);
        assert_eq!(standings[0].total, 180);
        assert_eq!(standings[1].name, "Ana");
        assert_eq!(standings[1].total, 120);
    }

    #[test]
    fn test_finished_session_rejects_submissions() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        for category in Category::ALL {
            game.submit(category, 1).unwrap();
            game.submit(category, 2).unwrap();
        }
        assert!(game.is_finished());
        assert_eq!(
            game.submit(Category::One, 1),
            Err(SubmitError::SessionFinished)
        );
    }

    #[test]
    fn test_phase_never_moves_backward() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        assert!(matches!(game.phase(), Phase::Round2 { .. }));
        // No sequence of submissions can return to round 1: every further
        // transition stays in round 2 or ends the game.
        for category in Category::ALL {
            game.submit(category, 0).unwrap();
            assert!(!matches!(game.phase(), Phase::Round1));
            game.submit(category, 0).unwrap();
            assert!(!matches!(game.phase(), Phase::Round1));
        }
        assert_eq!(game.phase(), Phase::Finished);
    }

    #[test]
    fn test_standings_idempotent_on_finished_game() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 2);
        for category in Category::ALL {
            game.submit(category, 8).unwrap();
            game.submit(category, 8).unwrap();
        }
        assert_eq!(game.standings(), game.standings());
    }

    #[test]
    fn test_round_standings_for_winner_announcement() {
        let mut game = session(&["Ana", "Bruno"]);
        game.submit(Category::Wildcard, 40).unwrap();
        game.submit(Category::Wildcard, 10).unwrap();
        let standings = game.round_standings(Round::Round1);
        assert_eq!(standings[0], ("Ana".to_string(), 40));
        assert_eq!(standings[1], ("Bruno".to_string(), 10));
    }

    #[test]
    fn test_fill_randomly_leaves_one_cell() {
        let mut game = session(&["Ana", "Bruno"]);
        let mut rng = StdRng::seed_from_u64(7);

        let (player, category) = game.fill_randomly(&mut rng).unwrap();
        assert_eq!(game.current_player_index(), player);
        assert!(!game.cards()[player].is_filled(Round::Round1, category));

        let filled: usize = game
            .cards()
            .iter()
            .map(|c| c.filled_count(Round::Round1))
            .sum();
        assert_eq!(filled, 2 * 15 - 1);

        // Submitting the held-open cell completes the round
        let event = game.submit(category, 0).unwrap();
        assert_eq!(event, TurnEvent::RoundOneComplete);
    }

    #[test]
    fn test_fill_randomly_respects_ceilings() {
        let mut game = session(&["Ana", "Bruno"]);
        let mut rng = StdRng::seed_from_u64(42);
        game.fill_randomly(&mut rng).unwrap();
        for card in game.cards() {
            for category in Category::ALL {
                if let Some(value) = card.entry(Round::Round1, category) {
                    assert!(value <= category.max_value());
                }
            }
        }
    }

    #[test]
    fn test_fill_randomly_round2_keeps_active_row() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        game.submit(Category::One, 1).unwrap();
        game.submit(Category::One, 2).unwrap();
        game.submit(Category::Two, 3).unwrap();
        assert_eq!(game.current_player_index(), 1);

        let mut rng = StdRng::seed_from_u64(3);
        let (player, category) = game.fill_randomly(&mut rng).unwrap();
        // The active cell (Bruno on the Twos row) stays open
        assert_eq!(player, 1);
        assert_eq!(category, Category::Two);
        assert_eq!(game.current_row(), Some(Category::Two));
    }

    #[test]
    fn test_fill_randomly_none_when_finished() {
        let mut game = session(&["Ana", "Bruno"]);
        complete_round1(&mut game, 5);
        for category in Category::ALL {
            game.submit(category, 1).unwrap();
            game.submit(category, 2).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(game.fill_randomly(&mut rng), None);
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut game = session(&["Ana", "Bruno"]);
        game.submit(Category::Full, 26).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        let restored: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
        assert_eq!(restored.current_player_index(), 1);
    }

    #[test]
    fn test_submit_error_messages() {
        assert!(SubmitError::ValueTooLarge { max: 120 }
            .message()
            .contains("120"));
        assert!(SubmitError::WrongRow {
            expected: Category::SmallStraight
        }
        .message()
        .contains("Small Straight"));
    }
}
