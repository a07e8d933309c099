use crate::card::Card;
use crate::game::PlayerId;

/// What happened during one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// `player` discarded `card`; the card is reported as it now sits on
    /// the pile, so a wild carries its declared color. `won` is set when
    /// the play emptied the player's hand.
    Played {
        player: PlayerId,
        card: Card,
        won: bool,
    },
    /// `player` had no legal play and the drawn card was not legal
    /// either, so it went into their hand.
    DrewAndKept { player: PlayerId },
    /// The game already ended; nothing was mutated.
    AlreadyOver { winner: PlayerId },
}
