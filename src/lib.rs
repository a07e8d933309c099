//! A single-threaded turn-resolution engine for an Uno-style card game:
//! a shared draw/discard deck, per-player hands and a state machine that
//! resolves one turn at a time, including the special cards that skip,
//! reverse or force draws.
//!
//! The engine has no input/output surface of its own; an external
//! controller drives it through [`game::Game`] and inspects the result.
//! All randomness flows through an injected [`rand::Rng`], so seeded
//! games replay deterministically.

pub mod card;
mod constants;
pub mod deck;
pub mod error;
pub mod game;
pub mod player;
pub mod turn;
