use core::fmt;
use std::fmt::Display;

use crate::card::Card;
use crate::error::{GameError, Result};

/// A player and the ordered hand they own. Hand order is insertion
/// order, which is also the scan precedence when several cards are
/// legal to play.
#[derive(Debug)]
pub struct Player {
    name: String,
    pub hand: Vec<Card>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            name,
            hand: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards_count(&self) -> usize {
        self.hand.len()
    }

    pub fn is_hand_empty(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn add_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn card_at(&self, index: usize) -> Result<&Card> {
        if self.hand.is_empty() {
            return Err(GameError::EmptyHand);
        }
        self.hand.get(index).ok_or(GameError::InvalidHandIndex(index))
    }

    pub fn remove_card(&mut self, index: usize) -> Result<Card> {
        if self.hand.is_empty() {
            return Err(GameError::EmptyHand);
        }
        if index >= self.hand.len() {
            return Err(GameError::InvalidHandIndex(index));
        }
        Ok(self.hand.remove(index))
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
