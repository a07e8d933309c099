use strum::EnumCount;

use crate::card::{CardColor, CardEffect};

pub(crate) const RANK_MAX: u8 = 9;
pub(crate) const RANK_COUNT: usize = RANK_MAX as usize + 1;

pub(crate) const MIN_PLAYERS: usize = 2;

/// Total number of cards a deck built with these counts will hold.
pub(crate) fn deck_size(
    numeric_per_color: usize,
    special_per_color: usize,
    wild_count: usize,
) -> usize {
    CardColor::COUNT * numeric_per_color * RANK_COUNT
        + CardColor::COUNT * special_per_color * CardEffect::COUNT
        + wild_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_deck_size_arithmetic() {
        assert_eq!(CardColor::COUNT, 4);
        assert_eq!(CardEffect::COUNT, 3);

        // One copy of each numeric and special card, no wilds.
        assert_eq!(deck_size(1, 1, 0), 52);

        // Two copies of everything plus four wilds.
        assert_eq!(deck_size(2, 2, 4), 108);
    }
}
