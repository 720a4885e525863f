//! Standings computation over finished (or in-progress) score cards
//!
//! Pure and idempotent: the same cards always produce the same ordering.
//! Ties keep the original player order (stable sort).

use serde::{Deserialize, Serialize};

use super::{Player, Round, ScoreCard};

/// One player's line in the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    #[serde(rename = "round1Score")]
    pub round1_total: u32,
    #[serde(rename = "round2Score")]
    pub round2_total: u32,
    #[serde(rename = "totalScore")]
    pub total: u32,
}

/// Compute final standings: both round totals per player, sorted descending
/// by combined total.
///
/// `players` and `cards` are index-aligned, as held by the session.
pub fn standings(players: &[Player], cards: &[ScoreCard]) -> Vec<Standing> {
    let mut result: Vec<Standing> = players
        .iter()
        .zip(cards.iter())
        .map(|(player, card)| {
            let round1_total = card.round_total(Round::Round1);
            let round2_total = card.round_total(Round::Round2);
            Standing {
                name: player.name.clone(),
                round1_total,
                round2_total,
                total: round1_total + round2_total,
            }
        })
        .collect();
    result.sort_by(|a, b| b.total.cmp(&a.total));
    result
}

/// Standings for a single round, sorted descending by that round's total.
/// Used for the end-of-round winner announcement.
pub fn round_standings(
    players: &[Player],
    cards: &[ScoreCard],
    round: Round,
) -> Vec<(String, u32)> {
    let mut result: Vec<(String, u32)> = players
        .iter()
        .zip(cards.iter())
        .map(|(player, card)| (player.name.clone(), card.round_total(round)))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}
