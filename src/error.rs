use std::fmt::Debug;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("invalid card: {0}")]
    InvalidCard(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("the deck has already been built")]
    AlreadyBuilt,
    #[error("the draw pile is empty")]
    EmptyDrawPile,
    #[error("no card has been discarded yet")]
    EmptyDiscardPile,
    #[error("the hand is empty")]
    EmptyHand,
    #[error("no card at hand position {0}")]
    InvalidHandIndex(usize),
    #[error("no player with id {0}")]
    InvalidPlayer(usize),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
