use rand::{seq::SliceRandom, Rng};
use strum::IntoEnumIterator;

use crate::{
    card::{Card, CardColor, CardEffect},
    constants::{deck_size, RANK_MAX},
    error::{GameError, Result},
};

/// The draw and discard piles. Both are LIFO stacks with the top at the
/// end of the `Vec`, so "top" operations are O(1) pushes and pops.
///
/// Every card not currently held in a hand lives in exactly one of the
/// two piles.
#[derive(Debug, Default)]
pub struct Deck {
    pub(crate) draw_pile: Vec<Card>,
    pub(crate) discard_pile: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the draw pile with `numeric_per_color` copies of each
    /// (color, rank) pair, `special_per_color` copies of each
    /// (color, effect) pair and `wild_count` wild cards, then shuffles.
    ///
    /// Fails with [`GameError::AlreadyBuilt`] if the deck already holds
    /// any card, and with [`GameError::InvalidConfiguration`] if no
    /// numeric cards were requested.
    pub fn build(
        &mut self,
        numeric_per_color: usize,
        special_per_color: usize,
        wild_count: usize,
        rng: &mut impl Rng,
    ) -> Result<()> {
        if !self.draw_pile.is_empty() || !self.discard_pile.is_empty() {
            return Err(GameError::AlreadyBuilt);
        }
        if numeric_per_color == 0 {
            return Err(GameError::InvalidConfiguration(
                "at least one numeric card per color and rank is required".to_string(),
            ));
        }

        let mut cards =
            Vec::with_capacity(deck_size(numeric_per_color, special_per_color, wild_count));

        for color in CardColor::iter() {
            for _ in 0..numeric_per_color {
                for rank in 0..=RANK_MAX {
                    cards.push(Card::Numeric(color, rank));
                }
            }

            for _ in 0..special_per_color {
                for effect in CardEffect::iter() {
                    cards.push(Card::Special(color, effect));
                }
            }
        }

        for _ in 0..wild_count {
            cards.push(Card::wild());
        }

        cards.shuffle(rng);
        self.draw_pile = cards;

        Ok(())
    }

    /// Removes and returns the top card of the draw pile. The caller is
    /// expected to [`Deck::refresh`] before drawing from an empty pile.
    pub fn draw_one(&mut self) -> Result<Card> {
        self.draw_pile.pop().ok_or(GameError::EmptyDrawPile)
    }

    /// Puts `card` on top of the discard pile. Legality against the
    /// previous top is the turn engine's concern, not the deck's.
    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Peeks at the card currently in play.
    pub fn top_discard(&self) -> Result<&Card> {
        self.discard_pile.last().ok_or(GameError::EmptyDiscardPile)
    }

    pub(crate) fn top_discard_mut(&mut self) -> Result<&mut Card> {
        self.discard_pile
            .last_mut()
            .ok_or(GameError::EmptyDiscardPile)
    }

    /// Rebuilds the draw pile from the discard history: every discard
    /// card except the current top is shuffled into the draw pile, and
    /// the top stays behind as the new singleton discard pile.
    ///
    /// Does nothing unless the draw pile is empty and the discard pile
    /// holds more than the top card.
    pub fn refresh(&mut self, rng: &mut impl Rng) {
        if !self.draw_pile.is_empty() || self.discard_pile.len() <= 1 {
            return;
        }

        if let Some(top) = self.discard_pile.pop() {
            self.draw_pile.append(&mut self.discard_pile);
            self.discard_pile.push(top);
            self.draw_pile.shuffle(rng);
        }
    }

    pub fn draw_count(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn is_draw_pile_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }
}
