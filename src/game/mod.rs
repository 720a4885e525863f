//! Game rules: categories, score cards, validation, standings

pub mod ranking;
pub mod validation;

use serde::{Deserialize, Serialize};

/// Number of scoring categories on the sheet.
pub const CATEGORY_COUNT: usize = 15;

/// Ceiling for the five-of-a-kind category.
pub const FIVE_OF_A_KIND_MAX: u32 = 120;

/// Ceiling for every other category.
pub const DEFAULT_MAX: u32 = 100;

/// The two scoring rounds of a session.
///
/// Round 1 is free-order: the current player may fill any open category.
/// Round 2 is fixed-order: every player fills the same row before it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    Round1,
    Round2,
}

impl Round {
    pub fn label(&self) -> &'static str {
        match self {
            Round::Round1 => "Round 1",
            Round::Round2 => "Round 2",
        }
    }
}

/// A scoring category on the sheet.
///
/// Declaration order is the score-table row order, which is also the fixed
/// submission order in round 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "onePair")]
    OnePair,
    #[serde(rename = "twoPairs")]
    TwoPairs,
    #[serde(rename = "threeOfAKind")]
    ThreeOfAKind,
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "smallStraight")]
    SmallStraight,
    #[serde(rename = "bigStraight")]
    BigStraight,
    #[serde(rename = "fourOfAKind")]
    FourOfAKind,
    #[serde(rename = "fiveOfAKind")]
    FiveOfAKind,
    #[serde(rename = "wildcard")]
    Wildcard,
}

impl Category {
    /// All categories in row order (the round-2 submission order).
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::One,
        Category::Two,
        Category::Three,
        Category::Four,
        Category::Five,
        Category::Six,
        Category::OnePair,
        Category::TwoPairs,
        Category::ThreeOfAKind,
        Category::Full,
        Category::SmallStraight,
        Category::BigStraight,
        Category::FourOfAKind,
        Category::FiveOfAKind,
        Category::Wildcard,
    ];

    /// Position of this category in row order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Category at the given row position, if in range.
    pub fn from_index(index: usize) -> Option<Category> {
        Category::ALL.get(index).copied()
    }

    /// The row after this one, or None for the last row.
    pub fn next(&self) -> Option<Category> {
        Category::from_index(self.index() + 1)
    }

    /// Largest value accepted for this category.
    pub fn max_value(&self) -> u32 {
        match self {
            Category::FiveOfAKind => FIVE_OF_A_KIND_MAX,
            _ => DEFAULT_MAX,
        }
    }

    /// Display label for the score table.
    pub fn label(&self) -> &'static str {
        match self {
            Category::One => "Ones",
            Category::Two => "Twos",
            Category::Three => "Threes",
            Category::Four => "Fours",
            Category::Five => "Fives",
            Category::Six => "Sixes",
            Category::OnePair => "One Pair",
            Category::TwoPairs => "Two Pairs",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Full => "Full House",
            Category::SmallStraight => "Small Straight",
            Category::BigStraight => "Big Straight",
            Category::FourOfAKind => "Four of a Kind",
            Category::FiveOfAKind => "Five of a Kind",
            Category::Wildcard => "Wildcard",
        }
    }

    /// Score-sheet hint shown next to the row (sum of dice, fixed bonus, or both).
    pub fn hint(&self) -> &'static str {
        match self {
            Category::Full => "20+\u{3a3}",
            Category::SmallStraight => "20",
            Category::BigStraight => "30",
            Category::FourOfAKind => "25+\u{3a3}",
            Category::FiveOfAKind => "30+\u{3a3}",
            _ => "\u{3a3}",
        }
    }
}

/// A player in the session. Created at setup, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
}

/// One player's score sheet: 15 write-once cells per round.
///
/// An unfilled cell is `None`; a cell never changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    round1: [Option<u32>; CATEGORY_COUNT],
    round2: [Option<u32>; CATEGORY_COUNT],
}

impl Default for ScoreCard {
    fn default() -> Self {
        ScoreCard {
            round1: [None; CATEGORY_COUNT],
            round2: [None; CATEGORY_COUNT],
        }
    }
}

impl ScoreCard {
    /// Create an empty card (all 30 cells unfilled).
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self, round: Round) -> &[Option<u32>; CATEGORY_COUNT] {
        match round {
            Round::Round1 => &self.round1,
            Round::Round2 => &self.round2,
        }
    }

    /// The recorded value for a cell, or None if unfilled.
    pub fn entry(&self, round: Round, category: Category) -> Option<u32> {
        self.entries(round)[category.index()]
    }

    /// Whether a cell has been filled.
    pub fn is_filled(&self, round: Round, category: Category) -> bool {
        self.entry(round, category).is_some()
    }

    /// Record a value into a cell. Returns false (and leaves the card
    /// untouched) if the cell is already filled.
    pub fn record(&mut self, round: Round, category: Category, value: u32) -> bool {
        let cell = match round {
            Round::Round1 => &mut self.round1[category.index()],
            Round::Round2 => &mut self.round2[category.index()],
        };
        if cell.is_some() {
            return false;
        }
        *cell = Some(value);
        true
    }

    /// Whether all 15 cells of a round are filled.
    pub fn round_complete(&self, round: Round) -> bool {
        self.entries(round).iter().all(|e| e.is_some())
    }

    /// Sum of the filled cells of a round.
    pub fn round_total(&self, round: Round) -> u32 {
        self.entries(round).iter().flatten().sum()
    }

    /// Number of filled cells in a round.
    pub fn filled_count(&self, round: Round) -> usize {
        self.entries(round).iter().filter(|e| e.is_some()).count()
    }

    /// First unfilled category of a round, in row order.
    pub fn first_unfilled(&self, round: Round) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| !self.is_filled(round, *c))
    }
}

/// Whether every card has all 15 cells of the given round filled.
pub fn round_complete_for_all(cards: &[ScoreCard], round: Round) -> bool {
    cards.iter().all(|card| card.round_complete(round))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_score_table() {
        assert_eq!(Category::ALL[0], Category::One);
        assert_eq!(Category::ALL[5], Category::Six);
        assert_eq!(Category::ALL[9], Category::Full);
        assert_eq!(Category::ALL[10], Category::SmallStraight);
        assert_eq!(Category::ALL[14], Category::Wildcard);
    }

    #[test]
    fn test_category_index_roundtrip() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(Category::from_index(i), Some(*category));
        }
        assert_eq!(Category::from_index(CATEGORY_COUNT), None);
    }

    #[test]
    fn test_category_next_follows_row_order() {
        assert_eq!(Category::One.next(), Some(Category::Two));
        assert_eq!(Category::Six.next(), Some(Category::OnePair));
        // The structural oddity of the sheet: full house comes before
        // four-of-a-kind.
        assert_eq!(Category::Full.next(), Some(Category::SmallStraight));
        assert_eq!(Category::BigStraight.next(), Some(Category::FourOfAKind));
        assert_eq!(Category::Wildcard.next(), None);
    }

    #[test]
    fn test_ceilings() {
        assert_eq!(Category::FiveOfAKind.max_value(), 120);
        for category in Category::ALL {
            if category != Category::FiveOfAKind {
                assert_eq!(category.max_value(), 100);
            }
        }
    }

    #[test]
    fn test_new_card_is_empty() {
        let card = ScoreCard::new();
        for round in [Round::Round1, Round::Round2] {
            assert_eq!(card.filled_count(round), 0);
            for category in Category::ALL {
                assert!(!card.is_filled(round, category));
                assert_eq!(card.entry(round, category), None);
            }
        }
    }

    #[test]
    fn test_record_and_read_back() {
        let mut card = ScoreCard::new();
        assert!(card.record(Round::Round1, Category::Wildcard, 23));
        assert_eq!(card.entry(Round::Round1, Category::Wildcard), Some(23));
        assert!(card.is_filled(Round::Round1, Category::Wildcard));
        // The same cell in the other round is untouched
        assert!(!card.is_filled(Round::Round2, Category::Wildcard));
    }

    #[test]
    fn test_cells_are_write_once() {
        let mut card = ScoreCard::new();
        assert!(card.record(Round::Round2, Category::Full, 28));
        assert!(!card.record(Round::Round2, Category::Full, 99));
        assert_eq!(card.entry(Round::Round2, Category::Full), Some(28));
    }

    #[test]
    fn test_round_complete() {
        let mut card = ScoreCard::new();
        assert!(!card.round_complete(Round::Round1));
        for category in Category::ALL {
            card.record(Round::Round1, category, 10);
        }
        assert!(card.round_complete(Round::Round1));
        assert!(!card.round_complete(Round::Round2));
    }

    #[test]
    fn test_round_total_sums_filled_cells() {
        let mut card = ScoreCard::new();
        card.record(Round::Round1, Category::One, 4);
        card.record(Round::Round1, Category::Full, 26);
        // A zero entry is filled but contributes nothing
        card.record(Round::Round1, Category::Six, 0);
        assert_eq!(card.round_total(Round::Round1), 30);
        assert_eq!(card.round_total(Round::Round2), 0);
        assert_eq!(card.filled_count(Round::Round1), 3);
    }

    #[test]
    fn test_first_unfilled_in_row_order() {
        let mut card = ScoreCard::new();
        assert_eq!(card.first_unfilled(Round::Round2), Some(Category::One));
        card.record(Round::Round2, Category::One, 3);
        card.record(Round::Round2, Category::Three, 9);
        assert_eq!(card.first_unfilled(Round::Round2), Some(Category::Two));
    }

    #[test]
    fn test_round_complete_for_all() {
        let mut a = ScoreCard::new();
        let b = ScoreCard::new();
        for category in Category::ALL {
            a.record(Round::Round1, category, 5);
        }
        assert!(!round_complete_for_all(
            &[a.clone(), b.clone()],
            Round::Round1
        ));
        let mut b = b;
        for category in Category::ALL {
            b.record(Round::Round1, category, 7);
        }
        assert!(round_complete_for_all(&[a, b], Round::Round1));
    }

    #[test]
    fn test_category_serializes_to_sheet_keys() {
        assert_eq!(serde_json::to_string(&Category::One).unwrap(), r#""1""#);
        assert_eq!(
            serde_json::to_string(&Category::FiveOfAKind).unwrap(),
            r#""fiveOfAKind""#
        );
        let parsed: Category = serde_json::from_str(r#""smallStraight""#).unwrap();
        assert_eq!(parsed, Category::SmallStraight);
    }
}
