use core::fmt;
use std::fmt::Display;
use std::str::FromStr;

use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::constants::RANK_MAX;
use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, Display, EnumString, EnumCountMacro, EnumIter, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum CardColor {
    Red,
    Yellow,
    Green,
    Blue,
}

#[derive(Clone, Copy, Debug, Display, EnumString, EnumCountMacro, EnumIter, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum CardEffect {
    Skip,
    Reverse,
    #[strum(serialize = "DrawTwo", to_string = "Draw Two")]
    DrawTwo,
}

/// A single Uno card.
///
/// A `Wild` starts without a color; it gains its declared color through
/// [`Card::declare_color`] when it lands on the discard pile and keeps it
/// from then on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Card {
    Numeric(CardColor, u8),
    Special(CardColor, CardEffect),
    Wild(Option<CardColor>),
}

impl Card {
    /// Builds a colored numeric card from its boundary representation.
    /// The color string is matched case-insensitively; the rank must be
    /// in `0..=9`.
    pub fn numeric(color: &str, rank: u8) -> Result<Self> {
        let color = CardColor::from_str(color)
            .map_err(|_| GameError::InvalidCard(format!("unknown color {color:?}")))?;
        if rank > RANK_MAX {
            return Err(GameError::InvalidCard(format!("rank {rank} out of range")));
        }
        Ok(Card::Numeric(color, rank))
    }

    /// Builds a colored special card from its boundary representation.
    /// Both strings are matched case-insensitively.
    pub fn special(color: &str, effect: &str) -> Result<Self> {
        let color = CardColor::from_str(color)
            .map_err(|_| GameError::InvalidCard(format!("unknown color {color:?}")))?;
        let effect = CardEffect::from_str(effect)
            .map_err(|_| GameError::InvalidCard(format!("unknown effect {effect:?}")))?;
        Ok(Card::Special(color, effect))
    }

    /// Builds a wild card with no declared color yet.
    pub fn wild() -> Self {
        Card::Wild(None)
    }

    /// Declares the color of an undeclared wild card. On any other
    /// variant, or on a wild that already has its color, this does
    /// nothing; callers must not rely on it to fail.
    pub fn declare_color(&mut self, color: CardColor) {
        if let Card::Wild(declared @ None) = self {
            *declared = Some(color);
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Card::Numeric(_, _))
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Card::Special(_, _))
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild(_))
    }

    /// The card's effective color; `None` for a wild whose color has not
    /// been declared yet.
    pub fn color(&self) -> Option<CardColor> {
        match self {
            Card::Numeric(color, _) | Card::Special(color, _) => Some(*color),
            Card::Wild(declared) => *declared,
        }
    }

    pub fn rank(&self) -> Option<u8> {
        match self {
            Card::Numeric(_, rank) => Some(*rank),
            _ => None,
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Numeric(color, rank) => write!(f, "{} {}", color, rank),
            Card::Special(color, effect) => write!(f, "{} {}", color, effect),
            Card::Wild(None) => write!(f, "Wild"),
            Card::Wild(Some(color)) => write!(f, "Wild ({})", color),
        }
    }
}
